// tests/parser_tests.rs

use odata_expr::parser::{parse_filter, parse_orderby, ExprLimits, ParseError, Parser};
use odata_expr::{BinOp, Expr, Model, ResourceType, ScalarType, SortDirection, UnaryOp};

fn sample_model() -> Model {
    Model::new()
        .with_type(
            ResourceType::new("Order_Details")
                .with_primitive("UnitPrice", ScalarType::Decimal)
                .with_primitive("Quantity", ScalarType::Int32)
                .with_primitive("Discount", ScalarType::Single)
                .with_navigation("Order", "Orders")
                .with_navigation("Product", "Products"),
        )
        .with_type(
            ResourceType::new("Orders")
                .with_primitive("OrderID", ScalarType::Int32)
                .with_primitive("OrderDate", ScalarType::DateTime)
                .with_primitive("Freight", ScalarType::Double)
                .with_navigation("Customer", "Customers")
                .with_navigation_collection("Order_Details", "Order_Details"),
        )
        .with_type(
            ResourceType::new("Customers")
                .with_primitive("CustomerID", ScalarType::String)
                .with_primitive("CompanyName", ScalarType::String)
                .with_primitive("CustomerGuid", ScalarType::Guid)
                .with_primitive("Photo", ScalarType::Binary)
                .with_complex("Address", "Address")
                .with_navigation_collection("Orders", "Orders"),
        )
        .with_type(
            ResourceType::new("Products")
                .with_primitive("ProductID", ScalarType::Int32)
                .with_primitive("ProductName", ScalarType::String)
                .with_primitive("Discontinued", ScalarType::Boolean),
        )
        .with_type(
            ResourceType::new("Address")
                .with_primitive("StreetName", ScalarType::String)
                .with_primitive("LineNumber", ScalarType::Int32),
        )
}

// ============================================================================
// Structure and precedence
// ============================================================================

#[test]
fn test_comparison() {
    let model = sample_model();
    let filter = parse_filter("UnitPrice ge 6", &model, "Order_Details", None).unwrap();

    assert!(matches!(
        filter.expression(),
        Expr::Binary { op: BinOp::Ge, .. }
    ));
    assert_eq!(filter.expression().scalar_type(), ScalarType::Boolean);
}

#[test]
fn test_and_binds_tighter_than_or() {
    let model = sample_model();
    let filter = parse_filter(
        "Quantity eq 1 or Quantity eq 2 and UnitPrice ge 6",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    // Should be: Or(eq, And(eq, ge))
    match filter.expression() {
        Expr::Binary {
            op: BinOp::Or,
            right,
            ..
        } => {
            assert!(matches!(**right, Expr::Binary { op: BinOp::And, .. }));
        }
        _ => panic!("Expected or at the root"),
    }
}

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    let model = sample_model();
    let filter = parse_filter(
        "Quantity add Quantity mul 2 eq 30",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    // Left side of eq should be: Add(Quantity, Mul(Quantity, 2))
    match filter.expression() {
        Expr::Binary {
            op: BinOp::Eq,
            left,
            ..
        } => match &**left {
            Expr::Binary {
                op: BinOp::Add,
                right,
                ..
            } => {
                assert!(matches!(**right, Expr::Binary { op: BinOp::Mul, .. }));
            }
            _ => panic!("Expected add below eq"),
        },
        _ => panic!("Expected eq at the root"),
    }
}

#[test]
fn test_parenthesized_grouping() {
    let model = sample_model();
    let filter = parse_filter(
        "(Quantity eq 1 or Quantity eq 2) and UnitPrice ge 6",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    assert!(matches!(
        filter.expression(),
        Expr::Binary { op: BinOp::And, .. }
    ));
}

#[test]
fn test_not_is_unary() {
    let model = sample_model();
    let filter = parse_filter("not Discontinued", &model, "Products", None).unwrap();

    assert!(matches!(
        filter.expression(),
        Expr::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
}

#[test]
fn test_not_binds_tighter_than_comparison() {
    // 'not' applies to the primary term, so a non-boolean operand is a
    // type error without parentheses
    let model = sample_model();
    let result = parse_filter("not ProductID gt 5", &model, "Products", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));

    let ok = parse_filter("not (ProductID gt 5)", &model, "Products", None);
    assert!(ok.is_ok());
}

#[test]
fn test_unary_minus() {
    let model = sample_model();
    let filter = parse_filter("-Quantity le 0", &model, "Order_Details", None).unwrap();

    match filter.expression() {
        Expr::Binary { left, .. } => {
            assert!(matches!(
                **left,
                Expr::Unary {
                    op: UnaryOp::Negate,
                    ty: ScalarType::Int32,
                    ..
                }
            ));
        }
        _ => panic!("Expected comparison at the root"),
    }
}

// ============================================================================
// Property paths
// ============================================================================

#[test]
fn test_property_path_resolution() {
    let model = sample_model();
    let filter = parse_filter(
        "Customer/Address/LineNumber add 4 eq 8",
        &model,
        "Orders",
        None,
    )
    .unwrap();

    match filter.expression() {
        Expr::Binary { left, .. } => match &**left {
            Expr::Binary { left, .. } => match &**left {
                Expr::Property(path) => {
                    assert_eq!(path.segments.len(), 2);
                    assert_eq!(path.segments[0].name, "Customer");
                    assert!(path.segments[0].navigational);
                    assert_eq!(path.segments[1].name, "Address");
                    assert!(!path.segments[1].navigational);
                    assert_eq!(path.name, "LineNumber");
                    assert_eq!(path.ty, ScalarType::Int32);
                }
                _ => panic!("Expected a property access"),
            },
            _ => panic!("Expected add below eq"),
        },
        _ => panic!("Expected eq at the root"),
    }
}

#[test]
fn test_unknown_property() {
    let model = sample_model();
    let result = parse_filter("Bogus eq 1", &model, "Order_Details", None);

    match result {
        Err(ParseError::UnknownProperty {
            property,
            resource_type,
        }) => {
            assert_eq!(property, "Bogus");
            assert_eq!(resource_type, "Order_Details");
        }
        other => panic!("Expected an unknown-property error, got {:?}", other),
    }
}

#[test]
fn test_unknown_property_mid_path() {
    let model = sample_model();
    let result = parse_filter("Customer/Missing eq 1", &model, "Orders", None);

    match result {
        Err(ParseError::UnknownProperty {
            property,
            resource_type,
        }) => {
            assert_eq!(property, "Missing");
            assert_eq!(resource_type, "Customers");
        }
        other => panic!("Expected an unknown-property error, got {:?}", other),
    }
}

#[test]
fn test_primitive_cannot_be_traversed() {
    let model = sample_model();
    let result = parse_filter("UnitPrice/Anything eq 1", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_collection_navigation_is_rejected() {
    let model = sample_model();
    let result = parse_filter("Orders/OrderID eq 1", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_navigation_property_needs_a_terminal() {
    let model = sample_model();
    let result = parse_filter("Order eq null", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_complex_property_needs_a_terminal() {
    let model = sample_model();
    let result = parse_filter("Address eq null", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_secondary_root_fallback() {
    let model = sample_model();
    // CompanyName is not on Products; the secondary root supplies it
    let result = parse_filter("CompanyName eq 'ACME'", &model, "Products", Some("Customers"));
    assert!(result.is_ok());

    let result = parse_filter("CompanyName eq 'ACME'", &model, "Products", None);
    assert!(matches!(result, Err(ParseError::UnknownProperty { .. })));
}

// ============================================================================
// Type checking and promotion
// ============================================================================

#[test]
fn test_numeric_promotion_is_order_independent() {
    let model = sample_model();
    // Int32 vs Int64 type-checks in both operand orders
    assert!(parse_filter("Quantity ge 3000000000L", &model, "Order_Details", None).is_ok());
    assert!(parse_filter("3000000000L ge Quantity", &model, "Order_Details", None).is_ok());
}

#[test]
fn test_arithmetic_result_type_follows_the_ladder() {
    let model = sample_model();
    let filter = parse_filter(
        "Quantity add 2L eq 30L",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    match filter.expression() {
        Expr::Binary { left, .. } => {
            assert_eq!(left.scalar_type(), ScalarType::Int64);
        }
        _ => panic!("Expected eq at the root"),
    }

    // Decimal wins over everything below it
    let filter = parse_filter("UnitPrice mul 2 ge 12", &model, "Order_Details", None).unwrap();
    match filter.expression() {
        Expr::Binary { left, .. } => {
            assert_eq!(left.scalar_type(), ScalarType::Decimal);
        }
        _ => panic!("Expected ge at the root"),
    }
}

#[test]
fn test_incomparable_types() {
    let model = sample_model();
    let result = parse_filter("ProductName gt 5", &model, "Products", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));

    let result = parse_filter("Discontinued eq 'yes'", &model, "Products", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_null_is_only_equality_comparable() {
    let model = sample_model();
    assert!(parse_filter("CompanyName eq null", &model, "Customers", None).is_ok());
    assert!(parse_filter("null ne CompanyName", &model, "Customers", None).is_ok());

    let result = parse_filter("CompanyName gt null", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_binary_values_are_not_comparable() {
    let model = sample_model();
    let result = parse_filter("Photo eq binary'00ff'", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));

    // presence tests still work
    assert!(parse_filter("Photo ne null", &model, "Customers", None).is_ok());
}

#[test]
fn test_logical_operators_require_booleans() {
    let model = sample_model();
    let result = parse_filter("Quantity and UnitPrice ge 6", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_arithmetic_requires_numerics() {
    let model = sample_model();
    let result = parse_filter("CompanyName add 1 eq 2", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_filter_root_must_be_boolean() {
    let model = sample_model();
    let result = parse_filter("UnitPrice add 4", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_guid_and_datetime_comparisons() {
    let model = sample_model();
    assert!(parse_filter(
        "CustomerGuid eq guid'6f9619ff-8b86-d011-b42d-00c04fc964ff'",
        &model,
        "Customers",
        None
    )
    .is_ok());
    assert!(parse_filter(
        "OrderDate lt datetime'2000-01-01T00:00'",
        &model,
        "Orders",
        None
    )
    .is_ok());
}

// ============================================================================
// Function calls
// ============================================================================

#[test]
fn test_unknown_function() {
    let model = sample_model();
    let result = parse_filter("coalesce(CompanyName, 'x') eq 'x'", &model, "Customers", None);

    match result {
        Err(ParseError::UnknownFunction { name }) => assert_eq!(name, "coalesce"),
        other => panic!("Expected an unknown-function error, got {:?}", other),
    }
}

#[test]
fn test_function_arity_mismatch() {
    let model = sample_model();
    let result = parse_filter("length(CompanyName, 'x') eq 1", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_function_argument_type_mismatch() {
    let model = sample_model();
    let result = parse_filter("length(ProductID) eq 1", &model, "Products", None);

    match result {
        Err(ParseError::TypeMismatch { message }) => {
            assert!(message.contains("length"), "message was: {}", message);
            assert!(message.contains("argument 1"), "message was: {}", message);
        }
        other => panic!("Expected a type error, got {:?}", other),
    }
}

#[test]
fn test_substring_overloads() {
    let model = sample_model();
    assert!(parse_filter(
        "substring(CompanyName, 1) eq 'CME'",
        &model,
        "Customers",
        None
    )
    .is_ok());
    assert!(parse_filter(
        "substring(CompanyName, 1, 2) eq 'CM'",
        &model,
        "Customers",
        None
    )
    .is_ok());
}

#[test]
fn test_math_function_overload_selection() {
    let model = sample_model();

    // round over a Decimal picks the Decimal overload
    let filter = parse_filter("round(UnitPrice) eq 6M", &model, "Order_Details", None).unwrap();
    match filter.expression() {
        Expr::Binary { left, .. } => assert_eq!(left.scalar_type(), ScalarType::Decimal),
        _ => panic!("Expected eq at the root"),
    }

    // round over a Double (or anything below it) picks the Double overload
    let filter = parse_filter("round(Freight) eq 3", &model, "Orders", None).unwrap();
    match filter.expression() {
        Expr::Binary { left, .. } => assert_eq!(left.scalar_type(), ScalarType::Double),
        _ => panic!("Expected eq at the root"),
    }
}

#[test]
fn test_date_part_functions() {
    let model = sample_model();
    assert!(parse_filter("year(OrderDate) eq 1997", &model, "Orders", None).is_ok());
    assert!(parse_filter("month(OrderDate) le 6", &model, "Orders", None).is_ok());
}

// ============================================================================
// Syntax errors
// ============================================================================

#[test]
fn test_missing_operand() {
    let model = sample_model();
    let result = parse_filter("UnitPrice ge", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

#[test]
fn test_trailing_tokens() {
    let model = sample_model();
    let result = parse_filter("UnitPrice ge 6 6", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

#[test]
fn test_unbalanced_parentheses() {
    let model = sample_model();
    let result = parse_filter("(UnitPrice ge 6", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::Syntax { .. })));

    let result = parse_filter("UnitPrice ge 6)", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

#[test]
fn test_lex_errors_are_surfaced() {
    let model = sample_model();
    let result = parse_filter("UnitPrice ge 'open", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::Lex(_))));
}

// ============================================================================
// Complexity limits
// ============================================================================

#[test]
fn test_nesting_depth_limit() {
    let model = sample_model();
    let expr = format!("{}UnitPrice ge 6{}", "(".repeat(40), ")".repeat(40));
    let parser = Parser::with_limits(
        &expr,
        &model,
        "Order_Details",
        None,
        ExprLimits::new().with_max_depth(10),
    )
    .unwrap();
    let result = parser.parse_filter();
    assert!(matches!(result, Err(ParseError::ComplexityLimit { .. })));
}

#[test]
fn test_length_limit() {
    let model = sample_model();
    let result = Parser::with_limits(
        "UnitPrice ge 6 and UnitPrice le 100",
        &model,
        "Order_Details",
        None,
        ExprLimits::new().with_max_length(10),
    );
    assert!(matches!(result, Err(ParseError::ComplexityLimit { .. })));
}

#[test]
fn test_default_limits_allow_normal_expressions() {
    let model = sample_model();
    let expr = format!("{}UnitPrice ge 6{}", "(".repeat(30), ")".repeat(30));
    assert!(parse_filter(&expr, &model, "Order_Details", None).is_ok());
}

// ============================================================================
// OrderBy
// ============================================================================

#[test]
fn test_orderby_directions() {
    let model = sample_model();
    let info = parse_orderby("UnitPrice desc, Quantity", &model, "Order_Details", None).unwrap();

    assert_eq!(info.keys().len(), 2);
    assert_eq!(info.keys()[0].direction(), SortDirection::Descending);
    assert_eq!(info.keys()[1].direction(), SortDirection::Ascending);
}

#[test]
fn test_orderby_explicit_asc() {
    let model = sample_model();
    let info = parse_orderby("Quantity asc", &model, "Order_Details", None).unwrap();
    assert_eq!(info.keys()[0].direction(), SortDirection::Ascending);
}

#[test]
fn test_orderby_key_can_be_an_expression() {
    let model = sample_model();
    let info = parse_orderby(
        "UnitPrice mul Quantity desc, Product/ProductName",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    assert_eq!(info.keys().len(), 2);
    assert_eq!(info.keys()[0].expression().scalar_type(), ScalarType::Decimal);
}

#[test]
fn test_orderby_rejects_unorderable_keys() {
    let model = sample_model();
    let result = parse_orderby("Photo", &model, "Customers", None);
    assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
}

#[test]
fn test_orderby_trailing_tokens() {
    let model = sample_model();
    let result = parse_orderby("UnitPrice asc desc", &model, "Order_Details", None);
    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

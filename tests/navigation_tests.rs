// tests/navigation_tests.rs
//
// Navigation-chain extraction: which join hops a compiled expression
// needs, deduplicated, in first-appearance order.

use odata_expr::{parse_filter, parse_orderby, Model, ResourceType, ScalarType};

fn sample_model() -> Model {
    Model::new()
        .with_type(
            ResourceType::new("Order_Details")
                .with_primitive("UnitPrice", ScalarType::Decimal)
                .with_primitive("Quantity", ScalarType::Int32)
                .with_navigation("Order", "Orders")
                .with_navigation("Product", "Products"),
        )
        .with_type(
            ResourceType::new("Orders")
                .with_primitive("OrderID", ScalarType::Int32)
                .with_primitive("OrderDate", ScalarType::DateTime)
                .with_navigation("Customer", "Customers"),
        )
        .with_type(
            ResourceType::new("Customers")
                .with_primitive("CustomerID", ScalarType::String)
                .with_complex("Address", "Address"),
        )
        .with_type(
            ResourceType::new("Products")
                .with_primitive("ProductID", ScalarType::Int32)
                .with_primitive("ProductName", ScalarType::String),
        )
        .with_type(
            ResourceType::new("Address")
                .with_primitive("StreetName", ScalarType::String)
                .with_primitive("LineNumber", ScalarType::Int32),
        )
}

fn chain_names(chains: &[odata_expr::NavigationChain]) -> Vec<Vec<String>> {
    chains.iter().map(|c| c.properties().to_vec()).collect()
}

#[test]
fn test_no_navigation_used() {
    let model = sample_model();
    let filter = parse_filter("UnitPrice ge 6", &model, "Order_Details", None).unwrap();

    assert!(!filter.uses_navigation());
    assert!(filter.navigations_used().is_empty());
}

#[test]
fn test_distinct_chains_in_first_appearance_order() {
    let model = sample_model();
    let filter = parse_filter(
        "Order/Customer/CustomerID eq 'ANU' or Product/ProductID gt 123 and UnitPrice ge 6",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    assert_eq!(
        chain_names(filter.navigations_used()),
        vec![
            vec!["Order".to_string(), "Customer".to_string()],
            vec!["Product".to_string()],
        ]
    );
}

#[test]
fn test_complex_hops_are_not_chains() {
    let model = sample_model();
    let filter = parse_filter(
        "Customer/Address/LineNumber add 4 eq 8",
        &model,
        "Orders",
        None,
    )
    .unwrap();

    // exactly one chain, and Address is not part of it
    assert_eq!(
        chain_names(filter.navigations_used()),
        vec![vec!["Customer".to_string()]]
    );
}

#[test]
fn test_function_arguments_are_scanned() {
    let model = sample_model();
    let filter = parse_filter(
        "replace(Customer/CustomerID, 'LFK', 'RTT') eq 'ARTTI'",
        &model,
        "Orders",
        None,
    )
    .unwrap();

    assert_eq!(
        chain_names(filter.navigations_used()),
        vec![vec!["Customer".to_string()]]
    );
}

#[test]
fn test_repeated_chain_is_recorded_once() {
    let model = sample_model();
    let filter = parse_filter(
        "Customer/CustomerID eq 'ANU' or Customer/CustomerID eq 'ALFKI'",
        &model,
        "Orders",
        None,
    )
    .unwrap();

    assert_eq!(
        chain_names(filter.navigations_used()),
        vec![vec!["Customer".to_string()]]
    );
}

#[test]
fn test_shared_prefix_chains_are_distinct() {
    let model = sample_model();
    let filter = parse_filter(
        "Order/Customer/CustomerID eq 'ANU' and Order/OrderID gt 10",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    assert_eq!(
        chain_names(filter.navigations_used()),
        vec![
            vec!["Order".to_string(), "Customer".to_string()],
            vec!["Order".to_string()],
        ]
    );
}

#[test]
fn test_chain_extraction_is_idempotent() {
    let model = sample_model();
    let expr = "Order/Customer/CustomerID eq 'ANU' or Product/ProductID gt 123 and UnitPrice ge 6";

    let first = parse_filter(expr, &model, "Order_Details", None).unwrap();
    let second = parse_filter(expr, &model, "Order_Details", None).unwrap();

    assert_eq!(
        chain_names(first.navigations_used()),
        chain_names(second.navigations_used())
    );
}

#[test]
fn test_orderby_chains() {
    let model = sample_model();
    let info = parse_orderby(
        "Customer/CustomerID desc, OrderDate",
        &model,
        "Orders",
        None,
    )
    .unwrap();

    assert_eq!(
        chain_names(info.navigations_used()),
        vec![vec!["Customer".to_string()]]
    );
}

#[test]
fn test_chain_display() {
    let model = sample_model();
    let filter = parse_filter(
        "Order/Customer/CustomerID eq 'ANU'",
        &model,
        "Order_Details",
        None,
    )
    .unwrap();

    assert_eq!(filter.navigations_used()[0].to_string(), "Order/Customer");
}

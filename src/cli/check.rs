//! Compile OData expressions and run them against JSON entities

use super::{model_from_json, CliError};
use crate::json;
use crate::metadata::Model;
use crate::value::Value;
use crate::{parse_filter, parse_orderby, EmbeddedNavigation, Evaluator};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The OData expression to compile
    pub expression: String,
    /// JSON model description text
    pub model: String,
    /// Resource type the expression is rooted at
    pub resource_type: String,
    /// JSON entity input (an array or a single entity)
    pub input: Option<String>,
    /// Treat the expression as a $orderby clause instead of a $filter
    pub orderby: bool,
    /// Only validate the expression, don't execute
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// The expression compiled; navigation chains it uses are listed
    Valid { navigations: Vec<String> },
    /// Entities were filtered or sorted successfully
    Success(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let model_json: serde_json::Value = serde_json::from_str(&options.model)?;
    let model = model_from_json(&model_json)?;
    let evaluator = Evaluator::new(&EmbeddedNavigation);

    if options.orderby {
        let info = parse_orderby(&options.expression, &model, &options.resource_type, None)?;
        let navigations = info
            .navigations_used()
            .iter()
            .map(|c| c.to_string())
            .collect();
        if options.syntax_only {
            return Ok(CheckResult::Valid { navigations });
        }

        let mut entities = load_entities(options, &model)?;
        evaluator.sort(&info, &mut entities)?;
        let output = entities.iter().map(json::to_json).collect();
        Ok(CheckResult::Success(serde_json::Value::Array(output)))
    } else {
        let info = parse_filter(&options.expression, &model, &options.resource_type, None)?;
        let navigations = info
            .navigations_used()
            .iter()
            .map(|c| c.to_string())
            .collect();
        if options.syntax_only {
            return Ok(CheckResult::Valid { navigations });
        }

        let entities = load_entities(options, &model)?;
        let mut output = Vec::new();
        for entity in &entities {
            if evaluator.matches(&info, entity)? {
                output.push(json::to_json(entity));
            }
        }
        Ok(CheckResult::Success(serde_json::Value::Array(output)))
    }
}

fn load_entities(options: &CheckOptions, model: &Model) -> Result<Vec<Value>, CliError> {
    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let parsed: serde_json::Value = serde_json::from_str(input)?;
    let entities = match &parsed {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| json::entity_from_json(item, &options.resource_type, model))
            .collect(),
        single => vec![json::entity_from_json(single, &options.resource_type, model)],
    };
    Ok(entities)
}

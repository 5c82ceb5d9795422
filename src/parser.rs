use serde_json::Value;
use thiserror::Error;

use crate::ir::DataModel;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("input is not valid JSON or JSON5: {0}")]
    Syntax(String),
    #[error("data must contain a \"categories\" array")]
    MissingCategories,
    #[error("invalid data model: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Parses data-model text. Strict JSON is tried first, then JSON5.
///
/// Nothing is applied on failure: the caller keeps its previous model and
/// surfaces the single error message.
pub fn parse_data_model(input: &str) -> Result<DataModel, ImportError> {
    let value = match serde_json::from_str::<Value>(input) {
        Ok(value) => value,
        Err(json_err) => match json5::from_str::<Value>(input) {
            Ok(value) => {
                tracing::warn!(error = %json_err, "input is not strict JSON, accepted as JSON5");
                value
            }
            Err(err) => return Err(ImportError::Syntax(err.to_string())),
        },
    };
    data_model_from_value(value)
}

pub fn data_model_from_value(value: Value) -> Result<DataModel, ImportError> {
    if !value.get("categories").is_some_and(Value::is_array) {
        return Err(ImportError::MissingCategories);
    }
    Ok(serde_json::from_value(value)?)
}

/// Canonical two-space-indented form of a model.
pub fn to_json_pretty(model: &DataModel) -> String {
    // Plain structs of strings and vectors always serialize.
    serde_json::to_string_pretty(model).unwrap_or_else(|_| String::from("{\"categories\":[]}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Tier;

    #[test]
    fn parses_strict_json() {
        let model = parse_data_model(
            r#"{"categories":[{"name":"前端","skills":{"comfortable":["React"],"far":["浏览器内核原理"]}}]}"#,
        )
        .unwrap();
        assert_eq!(model.categories.len(), 1);
        assert_eq!(model.categories[0].skills.count(Tier::Comfortable), 1);
        assert_eq!(model.categories[0].skills.count(Tier::Challenging), 0);
    }

    #[test]
    fn falls_back_to_json5() {
        let model = parse_data_model(
            "{ categories: [ { name: 'A', skills: { near: ['x', 'y',], } }, ], // trailing\n }",
        )
        .unwrap();
        assert_eq!(model.categories[0].skills.near, vec!["x", "y"]);
    }

    #[test]
    fn rejects_missing_categories() {
        assert!(matches!(
            parse_data_model(r#"{"cats": []}"#),
            Err(ImportError::MissingCategories)
        ));
        assert!(matches!(
            parse_data_model(r#"{"categories": {}}"#),
            Err(ImportError::MissingCategories)
        ));
    }

    #[test]
    fn rejects_garbage_and_bad_shapes() {
        assert!(matches!(parse_data_model("not json"), Err(ImportError::Syntax(_))));
        assert!(matches!(
            parse_data_model(r#"{"categories":[{"name":1}]}"#),
            Err(ImportError::Shape(_))
        ));
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = parse_data_model(r#"{"categories":[{"name":"A","skills":{"near":null}},{"name":"B"}]}"#)
            .unwrap();
        let second = parse_data_model(&to_json_pretty(&first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(to_json_pretty(&first), to_json_pretty(&second));
    }
}

//! Typed access to the `arguments` map of a `tools/call` request.
//!
//! Arguments arrive as an arbitrary JSON object. Handlers read them through
//! accessors that apply the schema default when a key is absent or `null`
//! and fail with [`ToolError::InvalidArgument`] when a key holds the wrong
//! JSON type.

use crate::error::{ToolError, json_type_name};
use serde_json::{Map, Value};

/// Arguments passed to a tool handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    inner: Map<String, Value>,
}

impl TryFrom<Value> for ToolArguments {
    type Error = ToolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            other => Err(ToolError::ArgumentsNotObject {
                found: json_type_name(&other),
            }),
        }
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

impl ToolArguments {
    /// Raw value for `key`; `null` counts as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key).filter(|v| !v.is_null())
    }

    /// Arguments as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.inner.clone())
    }

    /// String argument, or `default`
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, ToolError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(invalid(key, "a string", other)),
        }
    }

    /// Boolean argument, or `default`
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ToolError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(invalid(key, "a boolean", other)),
        }
    }

    /// Non-negative integer argument, or `default`
    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64, ToolError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| invalid(key, "a non-negative integer", value)),
        }
    }

    /// Array argument, empty when absent
    pub fn array(&self, key: &str) -> Result<&[Value], ToolError> {
        match self.get(key) {
            None => Ok(&[][..]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(invalid(key, "an array", other)),
        }
    }

    /// Object argument, if supplied
    pub fn object(&self, key: &str) -> Result<Option<&Map<String, Value>>, ToolError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(invalid(key, "an object", other)),
        }
    }

    /// Array-of-strings argument, or `default`
    pub fn string_list_or(&self, key: &str, default: &[&str]) -> Result<Vec<String>, ToolError> {
        let Some(value) = self.get(key) else {
            return Ok(default.iter().map(|s| (*s).to_string()).collect());
        };
        let Value::Array(items) = value else {
            return Err(invalid(key, "an array of strings", value));
        };
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(invalid(key, "an array of strings", other)),
            })
            .collect()
    }

    /// String argument restricted to `allowed`, or `default`
    pub fn choice_or(
        &self,
        key: &str,
        allowed: &[&'static str],
        default: &'static str,
    ) -> Result<&'static str, ToolError> {
        let value = self.str_or(key, default)?;
        allowed
            .iter()
            .copied()
            .find(|candidate| *candidate == value)
            .ok_or_else(|| ToolError::InvalidArgument {
                name: key.to_string(),
                expected: "one of the enumerated values",
                found: format!("{value:?}"),
            })
    }
}

fn invalid(key: &str, expected: &'static str, found: &Value) -> ToolError {
    ToolError::InvalidArgument {
        name: key.to_string(),
        expected,
        found: json_type_name(found).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArguments {
        ToolArguments::try_from(value).unwrap()
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        for value in [json!(null), json!([]), json!("x"), json!(3)] {
            assert!(matches!(
                ToolArguments::try_from(value),
                Err(ToolError::ArgumentsNotObject { .. })
            ));
        }
    }

    #[test]
    fn test_defaults_apply_for_absent_and_null() {
        let a = args(json!({"app_type": null}));
        assert_eq!(a.str_or("app_type", "Web Application").unwrap(), "Web Application");
        assert_eq!(a.str_or("missing", "x").unwrap(), "x");
        assert!(a.bool_or("internet_facing", true).unwrap());
        assert_eq!(a.u64_or("max_depth", 3).unwrap(), 3);
        assert!(a.array("threats").unwrap().is_empty());
        assert!(a.object("scoring_guidance").unwrap().is_none());
        assert_eq!(
            a.string_list_or("authentication_methods", &["Username/Password"]).unwrap(),
            vec!["Username/Password".to_string()]
        );
    }

    #[test]
    fn test_supplied_values_win() {
        let a = args(json!({
            "app_type": "Mobile",
            "internet_facing": false,
            "max_depth": 5,
            "threats": [{"id": "T1"}],
            "sections": ["threats"]
        }));
        assert_eq!(a.str_or("app_type", "Web Application").unwrap(), "Mobile");
        assert!(!a.bool_or("internet_facing", true).unwrap());
        assert_eq!(a.u64_or("max_depth", 3).unwrap(), 5);
        assert_eq!(a.array("threats").unwrap().len(), 1);
        assert_eq!(a.string_list_or("sections", &[]).unwrap(), vec!["threats".to_string()]);
    }

    #[test]
    fn test_wrong_types_fail() {
        let a = args(json!({"threats": "T1", "max_depth": -1, "list": ["a", 1]}));
        assert!(matches!(
            a.array("threats"),
            Err(ToolError::InvalidArgument { expected: "an array", .. })
        ));
        assert!(a.u64_or("max_depth", 3).is_err());
        assert!(a.string_list_or("list", &[]).is_err());
        assert!(a.str_or("threats", "").is_ok());
    }

    #[test]
    fn test_choice() {
        let allowed = ["initial", "deep_dive", "validation"];
        assert_eq!(args(json!({})).choice_or("stage", &allowed, "initial").unwrap(), "initial");
        assert_eq!(
            args(json!({"stage": "validation"})).choice_or("stage", &allowed, "initial").unwrap(),
            "validation"
        );
        let err = args(json!({"stage": "bogus"}))
            .choice_or("stage", &allowed, "initial")
            .unwrap_err();
        assert!(err.to_string().contains("stage"));
    }
}

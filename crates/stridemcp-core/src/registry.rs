//! Tool registry.
//!
//! The registry is assembled once through [`ToolRegistryBuilder`] and is
//! immutable afterwards; it is shared behind an `Arc` by every request.

use crate::arguments::ToolArguments;
use crate::error::{CallError, ToolError};
use crate::types::{Tool, ToolOutput};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A tool implementation.
///
/// Handlers must be pure: the same arguments always produce the same output.
pub trait ToolHandler: Send + Sync {
    /// Run the tool
    fn call(&self, arguments: &ToolArguments) -> Result<ToolOutput, ToolError>;
}

impl<F> ToolHandler for F
where
    F: Fn(&ToolArguments) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    fn call(&self, arguments: &ToolArguments) -> Result<ToolOutput, ToolError> {
        self(arguments)
    }
}

/// Registry construction failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two tools share a name
    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),
}

struct RegisteredTool {
    descriptor: Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Ordered, immutable catalogue of tools
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    descriptors: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Start building a registry
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Descriptors in registration order
    pub fn list_tools(&self) -> &[Tool] {
        &self.descriptors
    }

    /// Tool names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|tool| tool.name.as_str())
    }

    /// Descriptor for `name`
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&i| &self.tools[i].descriptor)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the tool `name` with `arguments`.
    ///
    /// Unknown names and missing required arguments are reported before the
    /// handler runs. A non-object `arguments` value, and anything the handler
    /// returns as an error, comes back as [`CallError::Execution`].
    pub fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput, CallError> {
        let Some(tool) = self.index.get(name).map(|&i| &self.tools[i]) else {
            return Err(CallError::UnknownTool(name.to_string()));
        };

        if let Value::Object(map) = &arguments {
            let missing = tool
                .descriptor
                .input_schema
                .required
                .iter()
                .find(|required| map.get(required.as_str()).is_none_or(Value::is_null));
            if let Some(argument) = missing {
                return Err(CallError::MissingArgument {
                    tool: name.to_string(),
                    argument: argument.clone(),
                });
            }
        }

        tracing::debug!(tool = name, "calling tool");
        ToolArguments::try_from(arguments)
            .and_then(|arguments| tool.handler.call(&arguments))
            .map_err(|source| CallError::Execution {
                tool: name.to_string(),
                source,
            })
    }
}

/// Builder for [`ToolRegistry`]
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<RegisteredTool>,
}

impl fmt::Debug for ToolRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistryBuilder")
            .field("tools", &self.tools.len())
            .finish()
    }
}

impl ToolRegistryBuilder {
    /// Register a tool; order of calls is the order of `tools/list`
    #[must_use]
    pub fn tool(mut self, descriptor: Tool, handler: impl ToolHandler + 'static) -> Self {
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Arc::new(handler),
        });
        self
    }

    /// Freeze the registry
    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.tools.len());
        for (i, tool) in self.tools.iter().enumerate() {
            if index.insert(tool.descriptor.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateTool(tool.descriptor.name.clone()));
            }
        }
        let descriptors = self.tools.iter().map(|t| t.descriptor.clone()).collect();
        Ok(ToolRegistry {
            tools: self.tools,
            descriptors,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolInputSchema;
    use serde_json::json;

    fn echo(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::Structured(args.to_value()))
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::builder()
            .tool(
                Tool::new(
                    "echo",
                    "Echo arguments",
                    ToolInputSchema::empty().required_property("text", json!({"type": "string"})),
                ),
                echo,
            )
            .tool(
                Tool::new("fail", "Always fails", ToolInputSchema::empty()),
                |_: &ToolArguments| -> Result<ToolOutput, ToolError> {
                    Err(anyhow::anyhow!("storage offline at /var/lib/db").into())
                },
            )
            .tool(
                Tool::new("report", "Markdown", ToolInputSchema::empty()),
                |_: &ToolArguments| -> Result<ToolOutput, ToolError> {
                    Ok(ToolOutput::Markdown("# Report".into()))
                },
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_registration_order_is_list_order() {
        let names: Vec<_> = registry().names().map(str::to_owned).collect();
        assert_eq!(names, ["echo", "fail", "report"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ToolRegistry::builder()
            .tool(Tool::new("a", "", ToolInputSchema::empty()), echo)
            .tool(Tool::new("a", "", ToolInputSchema::empty()), echo)
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("a".into()));
    }

    #[test]
    fn test_call_known_tool() {
        let output = registry().call_tool("echo", json!({"text": "hi"})).unwrap();
        assert_eq!(output, ToolOutput::Structured(json!({"text": "hi"})));
        let output = registry().call_tool("report", json!({})).unwrap();
        assert_eq!(output, ToolOutput::Markdown("# Report".into()));
    }

    #[test]
    fn test_unknown_tool() {
        let err = registry().call_tool("bogus", json!({})).unwrap_err();
        assert!(matches!(err, CallError::UnknownTool(ref name) if name == "bogus"));
        assert!(err.is_expected());
    }

    #[test]
    fn test_missing_required_argument() {
        for args in [json!({}), json!({"text": null})] {
            let err = registry().call_tool("echo", args).unwrap_err();
            assert!(matches!(
                err,
                CallError::MissingArgument { ref argument, .. } if argument == "text"
            ));
        }
    }

    #[test]
    fn test_non_object_arguments_is_execution_failure() {
        let err = registry().call_tool("report", Value::Null).unwrap_err();
        assert!(matches!(
            err,
            CallError::Execution {
                source: ToolError::ArgumentsNotObject { found: "null" },
                ..
            }
        ));
    }

    #[test]
    fn test_handler_failure_is_execution_failure() {
        let err = registry().call_tool("fail", json!({})).unwrap_err();
        assert!(!err.is_expected());
    }
}

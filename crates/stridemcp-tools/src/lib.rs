//! # STRIDE MCP Tools
//!
//! The threat-modeling tool catalogue. Every tool returns static reference
//! material (STRIDE categories, DREAD rubric, attack-tree and test templates)
//! together with the caller's own context echoed back, so the client model
//! can do the actual analysis. No tool derives anything from the threats it
//! is given.
//!
//! ```rust
//! let registry = stridemcp_tools::catalog()?;
//! assert_eq!(registry.len(), 8);
//! assert_eq!(registry.names().next(), Some("get_stride_threat_framework"));
//! # Ok::<(), stridemcp_core::RegistryError>(())
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![recursion_limit = "512"]

pub mod attack_trees;
pub mod coverage;
pub mod mitigations;
pub mod report;
pub mod repository_guide;
pub mod risk_scores;
pub mod stride_framework;

use stridemcp_core::{RegistryError, ToolRegistry};

/// Names of all tools, in `tools/list` order
pub const TOOL_NAMES: [&str; 8] = [
    stride_framework::NAME,
    mitigations::NAME,
    attack_trees::NAME,
    risk_scores::NAME,
    security_tests::NAME,
    report::NAME,
    coverage::NAME,
    repository_guide::NAME,
];

/// Build the registry holding every tool.
pub fn catalog() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::builder()
        .tool(stride_framework::descriptor(), stride_framework::call)
        .tool(mitigations::descriptor(), mitigations::call)
        .tool(attack_trees::descriptor(), attack_trees::call)
        .tool(risk_scores::descriptor(), risk_scores::call)
        .tool(security_tests::descriptor(), security_tests::call)
        .tool(report::descriptor(), report::call)
        .tool(coverage::descriptor(), coverage::call)
        .tool(repository_guide::descriptor(), repository_guide::call)
        .build()
}

/// Schema fragment for an array of free-form threat objects
pub(crate) fn object_array(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": {
            "type": "object",
            "additionalProperties": true
        },
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_names() {
        let registry = catalog().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, TOOL_NAMES);
    }

    #[test]
    fn test_every_descriptor_has_object_schema() {
        for tool in catalog().unwrap().list_tools() {
            assert_eq!(tool.input_schema.schema_type, "object", "{}", tool.name);
            assert!(!tool.description.is_empty(), "{}", tool.name);
            for required in &tool.input_schema.required {
                assert!(
                    tool.input_schema.properties.contains_key(required),
                    "{}: {required}",
                    tool.name
                );
            }
        }
    }
}

//! `create_threat_attack_trees`: attack-tree structure, common patterns and
//! rendering templates.

use crate::object_array;
use serde_json::{Value, json};
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "create_threat_attack_trees";

const DEFAULT_MAX_DEPTH: u64 = 3;

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Generate application-wide attack tree showing common attack vectors",
        ToolInputSchema::empty()
            .required_property(
                "threats",
                object_array("Array of threat objects (used for context)"),
            )
            .property(
                "max_depth",
                json!({
                    "type": "integer",
                    "description": "Maximum tree depth",
                    "default": DEFAULT_MAX_DEPTH
                }),
            )
            .property(
                "output_format",
                json!({
                    "type": "string",
                    "description": "Output format",
                    "default": "both"
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let threats = args.array("threats")?;
    let max_depth = args.u64_or("max_depth", DEFAULT_MAX_DEPTH)?;
    let output_format = args.str_or("output_format", "both")?;

    Ok(ToolOutput::Structured(json!({
        "attack_tree_framework": {
            "structure": {
                "root_goal": "The attacker's ultimate objective, e.g. 'Exfiltrate customer data'",
                "sub_goals": "Intermediate objectives that each contribute to the root goal, combined with AND or OR",
                "attack_methods": "Leaf nodes: concrete techniques an attacker uses to reach a sub-goal"
            },
            "node_types": {
                "OR": "Any one child is sufficient to achieve the parent",
                "AND": "All children are required to achieve the parent"
            },
            "common_patterns": common_patterns(),
            "output_formats": ["text", "mermaid", "json", "both"]
        },
        "output_formats": output_formats(),
        "threat_context": threats,
        "max_depth": max_depth,
        "output_format": output_format,
        "requested_format": output_format,
        "analysis_guidance": {
            "approach": "Pick root goals from the highest-risk threats, decompose each into sub-goals, and stop at concrete attack methods",
            "depth_limit": format!("Do not nest deeper than {max_depth} levels below the root goal"),
            "quality_criteria": [
                "Every leaf is an actionable technique, not a category",
                "Leaves reference the threats they come from",
                "AND/OR relationships are explicit"
            ]
        }
    })))
}

fn common_patterns() -> Value {
    json!({
        "credential_compromise": {
            "root_goal": "Gain access to a user account",
            "sub_goals": ["Obtain valid credentials", "Bypass authentication", "Hijack an active session"],
            "attack_methods": ["Credential stuffing", "Phishing", "Session token theft through XSS", "Password reset abuse"]
        },
        "data_exfiltration": {
            "root_goal": "Extract sensitive data",
            "sub_goals": ["Access the data store directly", "Abuse an application query path", "Intercept data in transit"],
            "attack_methods": ["SQL injection", "Insecure direct object reference", "Misconfigured storage bucket", "TLS downgrade"]
        },
        "privilege_escalation": {
            "root_goal": "Obtain administrative capabilities",
            "sub_goals": ["Exploit missing authorisation", "Abuse trusted client input", "Escape the runtime sandbox"],
            "attack_methods": ["Forced browsing to admin endpoints", "Role parameter tampering", "Container breakout"]
        },
        "service_disruption": {
            "root_goal": "Make the service unavailable",
            "sub_goals": ["Exhaust compute or memory", "Exhaust connections", "Corrupt critical state"],
            "attack_methods": ["Request floods", "Deeply nested payloads", "Slow-read connections", "Cache poisoning"]
        }
    })
}

fn output_formats() -> Value {
    json!({
        "text": {
            "description": "Indented outline, one node per line",
            "template": "Root Goal: <goal>\n  [OR] Sub-goal: <sub-goal>\n    - Method: <technique> (threat: <id>)"
        },
        "mermaid": {
            "description": "Mermaid flowchart for rendering in markdown viewers",
            "template": "graph TD\n    A[Root Goal] --> B[Sub-goal 1]\n    A --> C[Sub-goal 2]\n    B --> D[Attack method]"
        },
        "json": {
            "description": "Nested JSON for programmatic use",
            "template": {
                "goal": "<root goal>",
                "type": "OR",
                "children": [
                    {"goal": "<sub-goal>", "type": "AND", "children": [{"method": "<technique>", "threat_id": "<id>"}]}
                ]
            }
        },
        "both": {
            "description": "Text outline followed by the Mermaid diagram"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: Value) -> Value {
        match call(&ToolArguments::try_from(args).unwrap()).unwrap() {
            ToolOutput::Structured(value) => value,
            ToolOutput::Markdown(_) => panic!("expected structured output"),
        }
    }

    #[test]
    fn test_structure() {
        let result = run(json!({"threats": []}));
        let structure = &result["attack_tree_framework"]["structure"];
        for key in ["root_goal", "sub_goals", "attack_methods"] {
            assert!(structure.get(key).is_some(), "{key}");
        }
        assert!(
            !result["attack_tree_framework"]["common_patterns"]
                .as_object()
                .unwrap()
                .is_empty()
        );
        for key in ["text", "mermaid", "json", "both"] {
            assert!(result["output_formats"].get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_parameters_echoed() {
        let result = run(json!({"threats": [], "max_depth": 5, "output_format": "mermaid"}));
        assert_eq!(result["max_depth"], 5);
        assert_eq!(result["output_format"], "mermaid");
        assert_eq!(result["requested_format"], "mermaid");

        let result = run(json!({"threats": [{"id": "T1"}]}));
        assert_eq!(result["max_depth"], 3);
        assert_eq!(result["output_format"], "both");
        assert_eq!(result["requested_format"], "both");
        assert_eq!(result["threat_context"], json!([{"id": "T1"}]));
    }

    #[test]
    fn test_negative_depth_fails() {
        let args = ToolArguments::try_from(json!({"threats": [], "max_depth": -2})).unwrap();
        assert!(call(&args).is_err());
    }
}

//! `generate_threat_mitigations`: preventive, detective and corrective
//! control framework for a set of threats.

use crate::object_array;
use serde_json::json;
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "generate_threat_mitigations";

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Generate actionable security mitigations for identified threats",
        ToolInputSchema::empty()
            .required_property("threats", object_array("Array of threat objects"))
            .property(
                "priority_filter",
                json!({
                    "type": "string",
                    "description": "Filter by priority",
                    "default": "all"
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let threats = args.array("threats")?;
    let priority_filter = args.str_or("priority_filter", "all")?;

    Ok(ToolOutput::Structured(json!({
        "mitigation_framework": {
            "categories": {
                "Preventive": {
                    "description": "Controls that stop the threat from being realised",
                    "examples": [
                        "Input validation and output encoding",
                        "Strong authentication and authorisation checks",
                        "Encryption of data at rest and in transit"
                    ]
                },
                "Detective": {
                    "description": "Controls that reveal an attack in progress or after the fact",
                    "examples": [
                        "Security event logging and alerting",
                        "Anomaly detection on authentication and traffic patterns",
                        "File and configuration integrity monitoring"
                    ]
                },
                "Corrective": {
                    "description": "Controls that limit damage and restore normal operation",
                    "examples": [
                        "Incident response runbooks",
                        "Credential and key rotation procedures",
                        "Tested backup and restore"
                    ]
                }
            },
            "control_types": {
                "preventive": "Blocks the attack path before exploitation",
                "detective": "Identifies exploitation attempts and successful attacks",
                "corrective": "Recovers from an incident and removes the root cause"
            },
            "difficulty_levels": {
                "Easy": "Configuration change or library upgrade; hours to days",
                "Medium": "Code change in one component with testing; days to weeks",
                "Hard": "Architectural change across components; weeks to months"
            },
            "mitigation_format": {
                "threat_id": "Identifier of the threat addressed",
                "control_type": "preventive, detective or corrective",
                "mitigation": "Concrete action to take",
                "implementation": "Where and how to implement it in this application",
                "difficulty": "Easy, Medium or Hard",
                "priority": "high, medium or low"
            }
        },
        "threat_context": threats,
        "priority_filter": priority_filter,
        "analysis_guidance": {
            "approach": "Propose at least one preventive control per threat, then add detective and corrective controls for high-impact threats",
            "priority_filter_usage": "When priority_filter is not 'all', only produce mitigations for threats at that priority",
            "quality_criteria": [
                "Mitigations name the specific component, library or configuration to change",
                "Each mitigation states which threat it addresses",
                "Defense in depth: no high-impact threat relies on a single control"
            ]
        },
        "implementation_guidance": {
            "sequencing": [
                "Quick wins: Easy mitigations for high-priority threats",
                "Planned work: Medium mitigations scheduled into upcoming iterations",
                "Roadmap: Hard mitigations tracked as architectural initiatives"
            ],
            "verification": "Pair each mitigation with a security test from generate_security_tests"
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(args: Value) -> Value {
        match call(&ToolArguments::try_from(args).unwrap()).unwrap() {
            ToolOutput::Structured(value) => value,
            ToolOutput::Markdown(_) => panic!("expected structured output"),
        }
    }

    #[test]
    fn test_framework_structure() {
        let result = run(json!({"threats": []}));
        let framework = &result["mitigation_framework"];
        for key in ["Preventive", "Detective", "Corrective"] {
            assert!(framework["categories"].get(key).is_some(), "{key}");
        }
        for key in ["preventive", "detective", "corrective"] {
            assert!(framework["control_types"].get(key).is_some(), "{key}");
        }
        for key in ["Easy", "Medium", "Hard"] {
            assert!(framework["difficulty_levels"].get(key).is_some(), "{key}");
        }
        assert!(result.get("implementation_guidance").is_some());
        assert!(result.get("analysis_guidance").is_some());
    }

    #[test]
    fn test_echoes() {
        let threats = json!([{"id": "T1", "category": "S", "description": "Test threat"}]);
        let result = run(json!({"threats": threats.clone(), "priority_filter": "high"}));
        assert_eq!(result["threat_context"], threats);
        assert_eq!(result["priority_filter"], "high");

        let result = run(json!({"threats": []}));
        assert_eq!(result["priority_filter"], "all");
    }
}

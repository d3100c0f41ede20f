//! `validate_threat_coverage`: STRIDE coverage checklist and common gaps.

use crate::object_array;
use serde_json::json;
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "validate_threat_coverage";

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Validate STRIDE coverage completeness and suggest threat model enhancements",
        ToolInputSchema::empty()
            .required_property(
                "threat_model",
                object_array("Array of threat objects to validate"),
            )
            .required_property(
                "app_context",
                json!({
                    "type": "object",
                    "additionalProperties": true,
                    "description": "Application context information"
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let threat_model = args.array("threat_model")?;
    let app_context = args.object("app_context")?;

    Ok(ToolOutput::Structured(json!({
        "coverage_framework": {
            "stride_categories": {
                "S": "Spoofing: every authentication point and service identity",
                "T": "Tampering: every write path, message and stored artifact",
                "R": "Repudiation: every security-relevant action that must be attributable",
                "I": "Information Disclosure: every store, channel and error path holding sensitive data",
                "D": "Denial of Service: every resource an unauthenticated caller can consume",
                "E": "Elevation of Privilege: every authorisation decision"
            },
            "validation_criteria": {
                "completeness": "Each STRIDE category has threats or an explicit rationale for why it does not apply",
                "specificity": "Threats reference concrete components, endpoints or data flows of this application",
                "actionability": "Each threat can be mapped to at least one mitigation and one test",
                "risk_alignment": "The threats with the most attention are the ones with the highest impact and likelihood"
            },
            "common_gaps": {
                "trust_boundaries": "Threats at boundaries between tenants, between services, and between the application and third parties",
                "data_flows": "Threats on data in transit through queues, caches, backups and logs",
                "privileged_operations": "Threats to admin interfaces, deployment pipelines and key management"
            }
        },
        "threat_model": threat_model,
        "app_context": app_context,
        "threat_count": threat_model.len(),
        "analysis_guidance": {
            "approach": "Check the threat model against each validation criterion, then list missing categories and gaps with suggested additional threats",
            "output_format": {
                "coverage_by_category": "Count of threats per STRIDE category",
                "missing_categories": "Categories with no threats and no rationale",
                "gaps": "Common gaps that apply to this application",
                "suggested_threats": "Additional threats to add, in the usual threat format",
                "overall_assessment": "Ready, needs minor additions, or needs significant work"
            }
        }
    })))
}

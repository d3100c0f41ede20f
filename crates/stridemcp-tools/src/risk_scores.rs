//! `calculate_threat_risk_scores`: DREAD scoring rubric, calibration notes
//! and worked examples. Scores are illustrative; nothing is computed from
//! the supplied threats.

use crate::object_array;
use serde_json::{Value, json};
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "calculate_threat_risk_scores";

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Calculate DREAD risk scores to prioritize threats by severity",
        ToolInputSchema::empty()
            .required_property("threats", object_array("Array of threat objects"))
            .property(
                "scoring_guidance",
                json!({
                    "type": "object",
                    "additionalProperties": true,
                    "description": "Optional guidance for scoring adjustments"
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let threats = args.array("threats")?;
    let scoring_guidance = args.object("scoring_guidance")?;

    Ok(ToolOutput::Structured(json!({
        "dread_framework": {
            "scoring_criteria": scoring_criteria(),
            "risk_levels": {
                "Critical": {"range": "40-50", "action": "Fix immediately; block release"},
                "High": {"range": "25-39", "action": "Fix before the next release"},
                "Medium": {"range": "11-24", "action": "Schedule within the next few iterations"},
                "Low": {"range": "5-10", "action": "Accept or fix opportunistically"}
            },
            "calculation": "Score each factor 1-10 and sum the five factors for a total between 5 and 50",
            "examples": [
                "SQL injection in a public login form typically lands in Critical",
                "Verbose error pages on an internal admin tool typically land in Medium"
            ]
        },
        "threats": threats,
        "scoring_guidance": scoring_guidance,
        "calibration_guidance": {
            "damage": "Score 8-10 only when the worst case is full data compromise, financial loss or safety impact",
            "reproducibility": "Score 8-10 when the attack works every time without special timing or state",
            "exploitability": "Score 8-10 when an unauthenticated attacker with public tools can perform it",
            "affected_users": "Score 8-10 when all or most users are affected, 1-3 for a single user",
            "discoverability": "Score 8-10 when the weakness is visible in normal use or already public"
        },
        "scoring_examples": scoring_examples(),
        "analysis_guidance": {
            "approach": "Score every threat on all five factors, justify each score in one sentence, then rank by total",
            "output_format": {
                "threat_id": "Identifier of the scored threat",
                "damage": "1-10",
                "reproducibility": "1-10",
                "exploitability": "1-10",
                "affected_users": "1-10",
                "discoverability": "1-10",
                "total": "Sum of the five factors",
                "risk_level": "Critical, High, Medium or Low",
                "justification": "Short rationale per factor"
            },
            "consistency": "Calibrate against scoring_examples so similar threats receive similar scores"
        }
    })))
}

fn scoring_criteria() -> Value {
    json!({
        "Damage": {
            "description": "How much harm results if the threat is realised",
            "scale": {"1-3": "Minor, limited to a single non-sensitive record", "4-7": "Significant data exposure or service degradation", "8-10": "Complete compromise, major data breach or financial loss"}
        },
        "Reproducibility": {
            "description": "How reliably the attack can be repeated",
            "scale": {"1-3": "Requires rare conditions or race windows", "4-7": "Works with some setup or timing", "8-10": "Works every time"}
        },
        "Exploitability": {
            "description": "How much skill and access the attack requires",
            "scale": {"1-3": "Requires insider access or advanced expertise", "4-7": "Requires authentication or moderate skill", "8-10": "Unauthenticated, scriptable with public tools"}
        },
        "Affected_Users": {
            "description": "What proportion of users is impacted",
            "scale": {"1-3": "Individual users", "4-7": "A group or tenant", "8-10": "All users"}
        },
        "Discoverability": {
            "description": "How easily the weakness can be found",
            "scale": {"1-3": "Requires source access or deep analysis", "4-7": "Found by targeted probing", "8-10": "Obvious or publicly documented"}
        }
    })
}

fn scoring_examples() -> Value {
    json!([
        {
            "threat": "SQL injection in the public search endpoint",
            "dread_breakdown": {
                "damage": 9,
                "reproducibility": 9,
                "exploitability": 8,
                "affected_users": 10,
                "discoverability": 8
            },
            "total": 44,
            "risk_level": "Critical"
        },
        {
            "threat": "Missing audit log for role changes",
            "dread_breakdown": {
                "damage": 5,
                "reproducibility": 8,
                "exploitability": 4,
                "affected_users": 6,
                "discoverability": 3
            },
            "total": 26,
            "risk_level": "High"
        },
        {
            "threat": "Stack trace returned on malformed input",
            "dread_breakdown": {
                "damage": 3,
                "reproducibility": 10,
                "exploitability": 6,
                "affected_users": 1,
                "discoverability": 7
            },
            "total": 27,
            "risk_level": "High"
        }
    ])
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
    fn test_basic_sections() {
        let result = run(json!({"threats": []}));
        for key in ["dread_framework", "threats", "analysis_guidance", "calibration_guidance"] {
            assert!(result.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_criteria_and_levels() {
        let result = run(json!({"threats": []}));
        let criteria = &result["dread_framework"]["scoring_criteria"];
        for key in ["Damage", "Reproducibility", "Exploitability", "Affected_Users", "Discoverability"] {
            assert!(criteria[key]["description"].is_string(), "{key}");
            assert!(criteria[key]["scale"].is_object(), "{key}");
        }
        let levels = &result["dread_framework"]["risk_levels"];
        for key in ["Critical", "High", "Medium", "Low"] {
            assert!(levels.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_examples_sum_to_total() {
        let result = run(json!({"threats": []}));
        let examples = result["scoring_examples"].as_array().unwrap();
        assert!(!examples.is_empty());
        for example in examples {
            let sum: u64 = example["dread_breakdown"]
                .as_object()
                .unwrap()
                .values()
                .filter_map(Value::as_u64)
                .sum();
            assert_eq!(Some(sum), example["total"].as_u64(), "{}", example["threat"]);
        }
    }

    #[test]
    fn test_calibration_keys() {
        let result = run(json!({"threats": []}));
        for key in ["damage", "reproducibility", "exploitability", "affected_users", "discoverability"] {
            assert!(result["calibration_guidance"][key].is_string(), "{key}");
        }
    }

    #[test]
    fn test_echoes() {
        let threats = json!([{"id": "T1"}]);
        let guidance = json!({"weight_damage": 2});
        let result = run(json!({"threats": threats.clone(), "scoring_guidance": guidance.clone()}));
        assert_eq!(result["threats"], threats);
        assert_eq!(result["scoring_guidance"], guidance);

        let result = run(json!({"threats": []}));
        assert_eq!(result["scoring_guidance"], Value::Null);
    }
}

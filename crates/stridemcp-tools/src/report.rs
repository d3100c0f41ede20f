//! `generate_threat_report`: markdown report skeleton.
//!
//! The only tool that answers with markdown rather than JSON. Sections are
//! emitted in a fixed order and filtered by `include_sections`; the content
//! depends only on the number of threats, mitigations, scores and trees
//! supplied.

use crate::object_array;
use serde_json::json;
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "generate_threat_report";

const DEFAULT_SECTIONS: &[&str] = &["executive_summary", "threats", "mitigations", "risk_scores"];

const STRIDE_SECTIONS: [(&str, &str); 6] = [
    (
        "Spoofing",
        "Threats where an attacker impersonates a user, service or component.",
    ),
    (
        "Tampering",
        "Threats where data or code is modified without authorisation.",
    ),
    (
        "Repudiation",
        "Threats where actions cannot be attributed to the actor who performed them.",
    ),
    (
        "Information Disclosure",
        "Threats where data is exposed to parties not authorised to see it.",
    ),
    (
        "Denial of Service",
        "Threats where legitimate users lose access to the service.",
    ),
    (
        "Elevation of Privilege",
        "Threats where an actor gains capabilities beyond those granted.",
    ),
];

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Format complete threat analysis as professional markdown report",
        ToolInputSchema::empty()
            .required_property("threat_model", object_array("Array of threat objects"))
            .property(
                "mitigations",
                object_array("Optional array of mitigation strategies"),
            )
            .property("dread_scores", object_array("Optional array of DREAD scores"))
            .property("attack_trees", object_array("Optional array of attack trees"))
            .property(
                "include_sections",
                json!({
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Sections to include in report",
                    "default": DEFAULT_SECTIONS
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let counts = Counts {
        threats: args.array("threat_model")?.len(),
        mitigations: args.array("mitigations")?.len(),
        dread_scores: args.array("dread_scores")?.len(),
        attack_trees: args.array("attack_trees")?.len(),
    };
    let sections = args.string_list_or("include_sections", DEFAULT_SECTIONS)?;
    let wants = |name: &str| sections.iter().any(|s| s == name);
    tracing::debug!(
        threats = counts.threats,
        sections = ?sections,
        "Rendering threat model report"
    );

    let mut report = String::from("# STRIDE Threat Model Report\n");
    if wants("executive_summary") {
        report.push_str(&executive_summary(&counts));
        report.push_str(APPLICATION_OVERVIEW);
    }
    if wants("threats") {
        report.push_str(&threat_analysis());
    }
    if wants("risk_scores") {
        report.push_str(&risk_assessment(counts.dread_scores));
    }
    if wants("mitigations") {
        report.push_str(&recommended_mitigations(counts.mitigations));
    }
    if wants("attack_trees") {
        report.push_str(&attack_trees(counts.attack_trees));
    }

    Ok(ToolOutput::Markdown(report))
}

struct Counts {
    threats: usize,
    mitigations: usize,
    dread_scores: usize,
    attack_trees: usize,
}

fn executive_summary(counts: &Counts) -> String {
    format!(
        "\n## Executive Summary\n\n\
         This report documents the STRIDE threat model for the application, the risk \
         rating of each identified threat and the mitigations recommended to address them.\n\n\
         - **Total Threats Identified:** {}\n\
         - **Mitigations Documented:** {}\n\
         - **Threats Risk-Scored:** {}\n\
         - **Attack Trees:** {}\n",
        counts.threats, counts.mitigations, counts.dread_scores, counts.attack_trees
    )
}

const APPLICATION_OVERVIEW: &str = "\n## Application Overview\n\n\
    Describe the application's purpose, architecture, main components, data stores and \
    external integrations. List the trust boundaries and the sensitive data that crosses them.\n";

fn threat_analysis() -> String {
    let mut out = String::from(
        "\n## Threat Analysis\n\n\
         Threats are grouped by STRIDE category. Each entry should state the affected \
         component, the attack scenario and its impact.\n",
    );
    for (category, description) in STRIDE_SECTIONS {
        out.push_str(&format!(
            "\n### {category} Threats\n\n{description}\n\n\
             | ID | Threat | Affected Components | Impact |\n\
             |----|--------|---------------------|--------|\n"
        ));
    }
    out
}

fn risk_assessment(scored: usize) -> String {
    format!(
        "\n## Risk Assessment\n\n\
         Threats are rated with DREAD (Damage, Reproducibility, Exploitability, Affected \
         Users, Discoverability), each factor scored 1-10. DREAD scores supplied: {scored}.\n\n\
         | Threat | D | R | E | A | D | Total | Risk Level |\n\
         |--------|---|---|---|---|---|-------|------------|\n\n\
         Risk levels: Critical (40-50), High (25-39), Medium (11-24), Low (5-10).\n"
    )
}

fn recommended_mitigations(documented: usize) -> String {
    format!(
        "\n## Recommended Mitigations\n\n\
         Mitigations supplied: {documented}. Order them by the risk level of the threats \
         they address.\n\n\
         | Threat | Control Type | Mitigation | Difficulty | Priority |\n\
         |--------|--------------|------------|------------|----------|\n"
    )
}

fn attack_trees(trees: usize) -> String {
    format!(
        "\n## Attack Trees\n\n\
         Attack trees supplied: {trees}. Render each tree as an outline or Mermaid diagram \
         beneath its root goal.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(args: Value) -> String {
        match call(&ToolArguments::try_from(args).unwrap()).unwrap() {
            ToolOutput::Markdown(text) => text,
            ToolOutput::Structured(_) => panic!("expected markdown output"),
        }
    }

    #[test]
    fn test_default_sections() {
        let report = run(json!({"threat_model": []}));
        assert!(report.starts_with("# STRIDE Threat Model Report"));
        for heading in [
            "## Executive Summary",
            "## Application Overview",
            "## Threat Analysis",
            "## Risk Assessment",
            "## Recommended Mitigations",
        ] {
            assert!(report.contains(heading), "{heading}");
        }
        assert!(!report.contains("## Attack Trees"));
        assert!(report.len() > 100);
    }

    #[test]
    fn test_stride_subsections() {
        let report = run(json!({"threat_model": []}));
        for category in [
            "Spoofing",
            "Tampering",
            "Repudiation",
            "Information Disclosure",
            "Denial of Service",
            "Elevation of Privilege",
        ] {
            assert!(report.contains(&format!("### {category} Threats")), "{category}");
        }
    }

    #[test]
    fn test_threat_count() {
        let report = run(json!({"threat_model": [{"id": "T1"}, {"id": "T2"}, {"id": "T3"}]}));
        assert!(report.contains("**Total Threats Identified:** 3"));
    }

    #[test]
    fn test_include_sections_filters() {
        let report = run(json!({"threat_model": [], "include_sections": ["threats"]}));
        assert!(report.contains("## Threat Analysis"));
        assert!(!report.contains("## Executive Summary"));
        assert!(!report.contains("## Risk Assessment"));

        let report = run(json!({
            "threat_model": [],
            "attack_trees": [{}, {}],
            "include_sections": ["attack_trees", "unknown_section"]
        }));
        assert!(report.contains("Attack trees supplied: 2"));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let report = run(json!({
            "threat_model": [],
            "include_sections": ["mitigations", "executive_summary"]
        }));
        let summary = report.find("## Executive Summary").unwrap();
        let mitigations = report.find("## Recommended Mitigations").unwrap();
        assert!(summary < mitigations);
    }
}

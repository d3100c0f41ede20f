//! `get_stride_threat_framework`: STRIDE categories and extended threat
//! domains, with the caller's application context echoed back.

use serde_json::{Value, json};
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "get_stride_threat_framework";

const DEFAULT_APP_TYPE: &str = "Web Application";
const DEFAULT_AUTH_METHODS: &[&str] = &["Username/Password"];
const DEFAULT_SENSITIVE_DATA: &[&str] = &["User Data"];

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Get comprehensive STRIDE threat modeling framework and guidance for threat analysis",
        ToolInputSchema::empty()
            .required_property(
                "app_description",
                json!({
                    "type": "string",
                    "description": "Detailed description of the application architecture and functionality"
                }),
            )
            .property(
                "app_type",
                json!({
                    "type": "string",
                    "description": "Type of application",
                    "default": DEFAULT_APP_TYPE
                }),
            )
            .property(
                "authentication_methods",
                json!({
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of authentication methods used",
                    "default": DEFAULT_AUTH_METHODS
                }),
            )
            .property(
                "internet_facing",
                json!({
                    "type": "boolean",
                    "description": "Whether the application is accessible from the internet",
                    "default": true
                }),
            )
            .property(
                "sensitive_data_types",
                json!({
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Types of sensitive data handled",
                    "default": DEFAULT_SENSITIVE_DATA
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let app_description = args.str_or("app_description", "")?;
    let app_type = args.str_or("app_type", DEFAULT_APP_TYPE)?;
    let authentication_methods =
        args.string_list_or("authentication_methods", DEFAULT_AUTH_METHODS)?;
    let internet_facing = args.bool_or("internet_facing", true)?;
    let sensitive_data_types = args.string_list_or("sensitive_data_types", DEFAULT_SENSITIVE_DATA)?;

    let mut priority_focus = Vec::new();
    if internet_facing {
        priority_focus.push(
            "Internet-facing: prioritise Spoofing and Denial of Service threats on every public entry point",
        );
    }
    if !sensitive_data_types.is_empty() {
        priority_focus.push(
            "Sensitive data present: prioritise Information Disclosure threats for data at rest, in transit and in logs",
        );
    }
    if authentication_methods.len() > 1 {
        priority_focus.push(
            "Multiple authentication methods: check each flow separately for Spoofing and session fixation",
        );
    }

    Ok(ToolOutput::Structured(json!({
        "stride_framework": {
            "categories": categories(),
            "extended_threat_domains": extended_threat_domains()
        },
        "application_context": {
            "app_description": app_description,
            "app_type": app_type,
            "authentication_methods": authentication_methods,
            "internet_facing": internet_facing,
            "sensitive_data_types": sensitive_data_types
        },
        "analysis_guidance": {
            "approach": "Walk every STRIDE category against each component, data flow and trust boundary of the application",
            "threat_format": {
                "id": "Unique identifier such as T1",
                "category": "One of S, T, R, I, D, E",
                "title": "Short threat name",
                "description": "Attack scenario written from the attacker's point of view",
                "affected_components": "Components or data flows involved",
                "impact": "Consequence if the threat is realised",
                "likelihood": "High, Medium or Low with a one-line justification"
            },
            "quality_criteria": [
                "Each threat names a concrete component and attacker capability",
                "Scenarios are specific to this application, not generic checklists",
                "Every category is either covered or explicitly ruled out with a reason",
                "Trust boundaries crossed by each threat are identified"
            ],
            "priority_focus": priority_focus
        },
        "next_steps": [
            "Identify threats per STRIDE category using the framework above",
            "Call generate_threat_mitigations with the identified threats",
            "Call calculate_threat_risk_scores to prioritise by DREAD score",
            "Call create_threat_attack_trees for the highest-risk threats",
            "Call validate_threat_coverage to find gaps",
            "Call generate_threat_report to produce the final document"
        ]
    })))
}

fn categories() -> Value {
    json!({
        "S": {
            "name": "Spoofing",
            "description": "Pretending to be something or someone other than yourself",
            "security_property": "Authentication",
            "threat_examples": [
                "Credential stuffing against the login endpoint",
                "Forged or replayed session tokens",
                "Phishing pages that capture user credentials",
                "Spoofed service identity between internal components"
            ],
            "common_mitigations": [
                "Multi-factor authentication",
                "Short-lived signed tokens with audience checks",
                "Mutual TLS between services"
            ]
        },
        "T": {
            "name": "Tampering",
            "description": "Modifying data or code without authorisation",
            "security_property": "Integrity",
            "threat_examples": [
                "SQL or NoSQL injection altering stored records",
                "Parameter manipulation changing prices or identifiers",
                "Unsigned software updates or dependencies",
                "Man-in-the-middle modification of traffic"
            ],
            "common_mitigations": [
                "Parameterised queries and strict input validation",
                "Message signing and integrity checks",
                "Signed artifacts and dependency pinning"
            ]
        },
        "R": {
            "name": "Repudiation",
            "description": "Claiming not to have performed an action",
            "security_property": "Non-repudiation",
            "threat_examples": [
                "Missing audit trail for administrative actions",
                "Log entries that can be altered or deleted by users",
                "Shared accounts hiding who performed an action"
            ],
            "common_mitigations": [
                "Tamper-evident, append-only audit logs",
                "Per-user credentials for privileged operations",
                "Synchronised, trusted timestamps"
            ]
        },
        "I": {
            "name": "Information Disclosure",
            "description": "Exposing information to someone not authorised to see it",
            "security_property": "Confidentiality",
            "threat_examples": [
                "Verbose error messages revealing stack traces or paths",
                "Insecure direct object references exposing other users' data",
                "Unencrypted sensitive data at rest or in transit",
                "Secrets committed to source control or written to logs"
            ],
            "common_mitigations": [
                "Encryption at rest and TLS in transit",
                "Object-level authorisation checks",
                "Generic error messages with server-side correlation ids"
            ]
        },
        "D": {
            "name": "Denial of Service",
            "description": "Denying or degrading service to legitimate users",
            "security_property": "Availability",
            "threat_examples": [
                "Request floods exhausting connection pools",
                "Oversized or deeply nested payloads exhausting memory",
                "Expensive queries triggered by unauthenticated users",
                "Account lockout abused to block legitimate users"
            ],
            "common_mitigations": [
                "Rate limiting and quotas",
                "Payload size and complexity limits",
                "Timeouts and circuit breakers"
            ]
        },
        "E": {
            "name": "Elevation of Privilege",
            "description": "Gaining capabilities without proper authorisation",
            "security_property": "Authorisation",
            "threat_examples": [
                "Missing function-level access control on admin endpoints",
                "Role or tenant identifiers trusted from client input",
                "Container escape or host privilege escalation",
                "Deserialization of untrusted data leading to code execution"
            ],
            "common_mitigations": [
                "Deny-by-default authorisation enforced server-side",
                "Least-privilege service accounts",
                "Sandboxing and hardened runtime configuration"
            ]
        }
    })
}

fn extended_threat_domains() -> Value {
    json!({
        "traditional_web": {
            "focus_areas": ["Session management", "Injection", "Cross-site scripting", "Cross-site request forgery"],
            "key_questions": [
                "Where is user input rendered or interpreted?",
                "How are sessions created, rotated and invalidated?"
            ]
        },
        "cloud_infrastructure": {
            "focus_areas": ["IAM misconfiguration", "Public storage buckets", "Metadata service abuse", "Cross-tenant isolation"],
            "key_questions": [
                "Which identities can assume which roles?",
                "Which resources are reachable from the internet?"
            ]
        },
        "ai_ml_systems": {
            "focus_areas": ["Prompt injection", "Training data poisoning", "Model extraction", "Sensitive data in model outputs"],
            "key_questions": [
                "Can untrusted content reach the model's instructions?",
                "What actions can model output trigger without human review?"
            ]
        },
        "iot_embedded": {
            "focus_areas": ["Firmware integrity", "Default credentials", "Physical access", "Insecure update channels"],
            "key_questions": [
                "How are devices authenticated to the backend?",
                "Can firmware be extracted or replaced?"
            ]
        },
        "mobile_applications": {
            "focus_areas": ["Insecure local storage", "Certificate pinning", "Deep link abuse", "Reverse engineering"],
            "key_questions": [
                "What secrets are stored on the device?",
                "Does the backend trust anything the client asserts?"
            ]
        },
        "api_microservices": {
            "focus_areas": ["Broken object-level authorisation", "Service-to-service trust", "Excessive data exposure", "Rate limiting"],
            "key_questions": [
                "How does each service authenticate its callers?",
                "Which responses return more fields than the client needs?"
            ]
        }
    })
}

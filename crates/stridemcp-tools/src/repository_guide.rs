//! `get_repository_analysis_guide`: staged guidance for extracting
//! threat-modeling inputs from a source repository.
//!
//! Three stages: `initial` (quick scan), `deep_dive` (security-relevant
//! code paths) and `validation` (readiness check). Only the block for the
//! requested stage is returned, alongside the always-present output template
//! and GitHub MCP examples.

use serde_json::{Map, Value, json};
use stridemcp_core::{Tool, ToolArguments, ToolError, ToolInputSchema, ToolOutput};

/// Tool name
pub const NAME: &str = "get_repository_analysis_guide";

const STAGES: [&str; 3] = ["initial", "deep_dive", "validation"];

/// Descriptor for `tools/list`
pub fn descriptor() -> Tool {
    Tool::new(
        NAME,
        "Get structured framework for extracting threat modeling inputs from repository analysis using GitHub MCP or similar tools",
        ToolInputSchema::empty()
            .property(
                "analysis_stage",
                json!({
                    "type": "string",
                    "description": "Analysis stage: 'initial' (quick scan), 'deep_dive' (detailed security analysis), or 'validation' (readiness check)",
                    "enum": STAGES,
                    "default": "initial"
                }),
            )
            .property(
                "repository_context",
                json!({
                    "type": "object",
                    "description": "Optional context about the repository",
                    "properties": {
                        "primary_language": {
                            "type": "string",
                            "description": "Primary programming language detected"
                        },
                        "framework_detected": {
                            "type": "string",
                            "description": "Primary framework or platform detected"
                        },
                        "repository_type": {
                            "type": "string",
                            "description": "Type of repository",
                            "enum": ["application", "library", "infrastructure", "unknown"]
                        }
                    }
                }),
            ),
    )
}

/// Run the tool
pub fn call(args: &ToolArguments) -> Result<ToolOutput, ToolError> {
    let stage = args.choice_or("analysis_stage", &STAGES, "initial")?;
    let repository_context = args
        .object("repository_context")?
        .cloned()
        .unwrap_or_default();

    let mut result = Map::new();
    result.insert("analysis_framework".into(), analysis_framework());
    result.insert("current_stage".into(), json!(stage));
    result.insert(
        "analysis_guidance".into(),
        json!({
            "approach": "Work through the stages in order; each stage narrows the files read and deepens the analysis",
            "principle": "Record facts observed in the code, not assumptions; cite file paths for every finding"
        }),
    );

    match stage {
        "deep_dive" => {
            result.insert("deep_dive_analysis".into(), deep_dive_analysis());
            result.insert(
                "technology_specific_guides".into(),
                technology_specific_guides(&repository_context),
            );
        }
        "validation" => {
            result.insert("validation_checklist".into(), validation_checklist());
        }
        _ => {
            result.insert("initial_reconnaissance".into(), initial_reconnaissance());
        }
    }

    result.insert("output_template".into(), output_template());
    result.insert("github_mcp_integration".into(), github_mcp_integration());
    result.insert("repository_context".into(), Value::Object(repository_context));
    result.insert("next_steps".into(), next_steps(stage));

    Ok(ToolOutput::Structured(Value::Object(result)))
}

fn analysis_framework() -> Value {
    json!({
        "stages": {
            "initial": {
                "goal": "Understand what the repository is, how it is deployed and where its entry points are",
                "effort": "Read 5-10 files"
            },
            "deep_dive": {
                "goal": "Trace authentication, authorisation, data handling and trust boundaries through the code",
                "effort": "Follow the security-relevant code paths identified in the initial stage"
            },
            "validation": {
                "goal": "Confirm the collected inputs are sufficient for get_stride_threat_framework",
                "effort": "Review the draft threat modeling input against the checklist"
            }
        }
    })
}

fn initial_reconnaissance() -> Value {
    json!({
        "files_to_examine_first": [
            "README and architecture documents",
            "Dependency manifests (Cargo.toml, package.json, requirements.txt, go.mod, pom.xml)",
            "Deployment descriptors (Dockerfile, docker-compose, Kubernetes manifests, Terraform)",
            "Application entry points and route definitions",
            "Configuration files and environment variable templates",
            "CI/CD workflow definitions"
        ],
        "questions_to_answer": [
            "What does the application do and who uses it?",
            "Which components exist and how do they communicate?",
            "Which parts are internet-facing?",
            "Which data stores and third-party services are used?"
        ]
    })
}

fn deep_dive_analysis() -> Value {
    json!({
        "trust_boundaries": [
            "Client to API gateway or web server",
            "Service to service calls",
            "Application to database and cache",
            "Application to third-party APIs and webhooks",
            "CI/CD pipeline to production environment"
        ],
        "authentication": "Locate login, token issuance and validation, session handling and password reset flows",
        "authorisation": "Locate where permissions are checked and whether checks run on every sensitive route",
        "data_handling": "Identify sensitive fields, where they are stored, encrypted, logged and returned",
        "input_handling": "Find parsers, deserializers, file uploads, query builders and template rendering",
        "secrets_management": "Check how credentials and keys are loaded and whether any are committed"
    })
}

fn technology_specific_guides(repository_context: &Map<String, Value>) -> Value {
    let guides = json!({
        "express": ["Middleware order for auth and validation", "helmet and CORS configuration", "Template engine escaping"],
        "fastapi": ["Dependency-injected auth on each router", "Pydantic model strictness", "CORS middleware origins"],
        "django": ["DEBUG and ALLOWED_HOSTS settings", "CSRF middleware coverage", "Raw SQL and extra() usage"],
        "spring": ["Spring Security filter chain", "Actuator endpoint exposure", "Jackson polymorphic deserialization"],
        "rails": ["Strong parameters", "protect_from_forgery", "Mass assignment and raw SQL fragments"],
        "axum": ["Extractor-based auth on every route", "Body size limits", "Error responses that leak internals"],
        "general": ["Framework auth defaults", "Serialization of untrusted input", "Security headers and CORS"]
    });

    let detected = ["framework_detected", "primary_language"]
        .iter()
        .filter_map(|key| repository_context.get(*key).and_then(Value::as_str))
        .map(str::to_lowercase)
        .find(|name| guides.get(name.as_str()).is_some());

    json!({
        "recommended": detected.unwrap_or_else(|| "general".to_string()),
        "guides": guides
    })
}

fn validation_checklist() -> Value {
    json!([
        "Application description covers purpose, users and main components",
        "Application type and deployment model are identified",
        "All authentication methods are listed",
        "Internet exposure is known for each component",
        "Sensitive data types are listed with where they are stored",
        "Trust boundaries are enumerated",
        "Third-party integrations are listed",
        "Every finding cites the file it came from"
    ])
}

fn output_template() -> Value {
    json!({
        "threat_modeling_input": {
            "app_description": "Architecture and functionality summary assembled from the analysis",
            "app_type": "Web Application, API, Mobile Application, Desktop Application, IoT, or Cloud Service",
            "authentication_methods": ["Methods found in the code"],
            "internet_facing": "true or false",
            "sensitive_data_types": ["Data types found in models, schemas and storage"]
        },
        "usage": "Pass threat_modeling_input as the arguments of get_stride_threat_framework"
    })
}

fn github_mcp_integration() -> Value {
    json!({
        "initial_stage_examples": [
            {"tool": "get_file_contents", "purpose": "Read README.md and dependency manifests"},
            {"tool": "search_code", "purpose": "Find route definitions, e.g. 'router' or '@app.route'"}
        ],
        "deep_dive_examples": [
            {"tool": "search_code", "purpose": "Locate auth checks, e.g. 'authorize' or 'permission'"},
            {"tool": "get_file_contents", "purpose": "Read middleware, models and configuration files"},
            {"tool": "search_code", "purpose": "Find secrets patterns such as 'API_KEY' or 'password'"}
        ]
    })
}

fn next_steps(stage: &str) -> Value {
    match stage {
        "deep_dive" => json!([
            "Fill in the output template with the findings",
            "Call get_repository_analysis_guide with analysis_stage 'validation'"
        ]),
        "validation" => json!([
            "Resolve any unchecked checklist items",
            "Call get_stride_threat_framework with the completed threat_modeling_input"
        ]),
        _ => json!([
            "Answer the reconnaissance questions",
            "Call get_repository_analysis_guide with analysis_stage 'deep_dive'"
        ]),
    }
}

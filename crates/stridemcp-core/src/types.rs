//! MCP result and descriptor types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MCP protocol revision announced by `initialize`
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Server name reported to clients
pub const SERVER_NAME: &str = "STRIDE GPT MCP Server";

/// Server version reported to clients
pub const SERVER_VERSION: &str = "0.1.0";

/// One-line description used by the GET capability summary
pub const SERVER_DESCRIPTION: &str =
    "Professional threat modeling server using the STRIDE methodology";

/// Instructions returned by `initialize`
pub const SERVER_INSTRUCTIONS: &str =
    "Professional threat modeling server using the STRIDE methodology.";

/// Server identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        }
    }
}

/// `tools` capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server emits `tools/list_changed` notifications
    pub list_changed: bool,
}

/// Capabilities advertised by `initialize`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool support
    pub tools: ToolsCapability,
}

/// Result of `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol revision
    pub protocol_version: String,
    /// Server capabilities
    pub capabilities: ServerCapabilities,
    /// Server identity
    pub server_info: ServerInfo,
    /// Usage instructions for the client
    pub instructions: String,
}

impl InitializeResult {
    /// Build the fixed `initialize` result for a server
    pub fn new(server_info: &ServerInfo) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: server_info.clone(),
            instructions: SERVER_INSTRUCTIONS.to_string(),
        }
    }
}

/// JSON Schema describing a tool's arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    /// Always `"object"`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property schemas, in declaration order
    pub properties: Map<String, Value>,
    /// Required property names
    pub required: Vec<String>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".into(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }
}

impl ToolInputSchema {
    /// Schema with no properties
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add an optional property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a required property
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Declared `default` of a property, if any
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)?.get("default")
    }
}

/// Tool descriptor returned by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Machine-readable name
    pub name: String,
    /// What the tool returns
    pub description: String,
    /// Argument schema
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

impl Tool {
    /// Create a descriptor
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: ToolInputSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// What a tool handler produces
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// JSON document, sent pretty-printed
    Structured(Value),
    /// Markdown text, sent verbatim
    Markdown(String),
}

impl ToolOutput {
    /// Text carried in the `content` entry.
    ///
    /// Structured output is pretty-printed with two-space indentation.
    pub fn into_text(self) -> Result<String, serde_json::Error> {
        match self {
            Self::Structured(value) => serde_json::to_string_pretty(&value),
            Self::Markdown(text) => Ok(text),
        }
    }
}

/// One content block of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text block
    Text {
        /// Text payload
        text: String,
    },
}

impl Content {
    /// Text block
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Result of `tools/call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Content blocks
    pub content: Vec<Content>,
}

impl CallToolResult {
    /// Result holding a single text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
        }
    }
}

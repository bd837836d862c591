//! MCP server handler implementation.
//!
//! Implements `rmcp::ServerHandler` to expose the operation catalog as MCP
//! tools. The catalog is a 65-entry table rather than a handful of typed
//! methods, so `list_tools` and `call_tool` are implemented directly instead
//! of going through the `#[tool_router]` macro: listing maps every catalog
//! entry to a generated schema, and calls route through the bridge
//! dispatcher.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorCode, Implementation, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ErrorData as McpError;

use grbridge_core::{BridgeError, Dispatcher, OpGroup, RExecutor};

use super::config::BridgeConfig;
use super::schema;

/// The grbridge MCP server handler.
#[derive(Clone)]
pub struct GrBridgeHandler {
    /// Server configuration.
    config: BridgeConfig,
    /// Bridge dispatcher owning the catalog and the interpreter.
    dispatcher: Arc<Dispatcher>,
}

impl GrBridgeHandler {
    /// Create a new handler with the given configuration.
    pub fn new(config: BridgeConfig) -> anyhow::Result<Self> {
        let executor = RExecutor::new(config.executor_config())?;
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(executor)));
        Ok(Self { config, dispatcher })
    }

    /// Fail-fast bridge initialization; must succeed before serving.
    pub async fn initialize(&self) -> anyhow::Result<()> {
        self.dispatcher.initialize().await?;
        Ok(())
    }

    /// Remove the scratch directory and release interpreter state.
    pub async fn close(&self) {
        self.dispatcher.close().await;
    }

    /// The configured server name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// All catalog entries as MCP tools.
    fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .catalog()
            .iter()
            .map(|op| Tool::new(op.name, op.description, Arc::new(schema::input_schema(op))))
            .collect()
    }

    fn instructions(&self) -> String {
        let catalog = self.dispatcher.catalog();
        let groups = [
            OpGroup::Convert,
            OpGroup::Range,
            OpGroup::Overlap,
            OpGroup::List,
            OpGroup::Aggregate,
            OpGroup::Operator,
            OpGroup::Util,
        ];
        let breakdown: Vec<String> = groups
            .iter()
            .map(|g| format!("• {} — {} tools", g.label(), catalog.group_len(*g)))
            .collect();
        format!(
            "grbridge — genomic interval operations backed by the gUtils/GenomicRanges \
             R ecosystem.\n\n\
             Every tool takes JSON arguments (ranges as arrays of \
             {{seqnames, start, end, strand, metadata}} objects, 1-based inclusive \
             coordinates) and runs one R command in a fresh interpreter process. \
             {} tools:\n{}\n\n\
             Results come back as JSON: range collections with derived widths, \
             labeled collections, tables, or plain values.",
            catalog.len(),
            breakdown.join("\n")
        )
    }
}

impl rmcp::ServerHandler for GrBridgeHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();

        match self.dispatcher.dispatch(&request.name, arguments).await {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value.to_json())
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(BridgeError::NotFound(op)) => Err(McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("Tool {op} not found"),
                None,
            )),
            Err(err @ BridgeError::InvalidArgs { .. }) => {
                Err(McpError::invalid_params(err.to_string(), None))
            }
            Err(err) => Err(McpError::internal_error(err.to_string(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::ServerHandler;
    use tempfile::TempDir;

    fn handler() -> (GrBridgeHandler, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = BridgeConfig {
            scratch_dir: Some(dir.path().join("scratch")),
            ..Default::default()
        };
        (
            GrBridgeHandler::new(config).expect("handler creation failed"),
            dir,
        )
    }

    #[test]
    fn test_handler_creation() {
        let (handler, _dir) = handler();
        assert_eq!(handler.name(), "grbridge");
    }

    #[test]
    fn test_get_info() {
        let (handler, _dir) = handler();
        let info = handler.get_info();
        let instructions = info.instructions.expect("instructions set");
        assert!(instructions.contains("gUtils"));
        assert!(instructions.contains("65 tools"));
    }

    #[test]
    fn tools_cover_the_whole_catalog() {
        let (handler, _dir) = handler();
        let tools = handler.tools();
        assert_eq!(tools.len(), 65);

        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 65, "tool names must be unique");
        assert!(names.contains(&"gutils_gr_reduce"));
        assert!(names.contains(&"gutils_rrbind"));
    }

    #[test]
    fn tool_schemas_are_objects_with_properties() {
        let (handler, _dir) = handler();
        for tool in handler.tools() {
            let schema = tool.input_schema.as_ref();
            assert_eq!(
                schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "{}",
                tool.name
            );
            assert!(schema.contains_key("properties"), "{}", tool.name);
        }
    }
}

//! MCP request dispatch, grounded in
//! `vestige-mcp::server::McpServer`'s method-routing shape but trimmed to
//! the single `agenr_recall` tool this system exposes.

use agenr_core::config::AgenrConfig;
use agenr_core::traits::{EmbeddingProvider, EntryStore};
use tracing::{debug, warn};

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_VERSION};
use crate::tool;

pub struct McpServer<'a> {
    store: &'a dyn EntryStore,
    embedder: Option<&'a dyn EmbeddingProvider>,
    config: AgenrConfig,
    initialized: bool,
}

impl<'a> McpServer<'a> {
    pub fn new(store: &'a dyn EntryStore, embedder: Option<&'a dyn EmbeddingProvider>, config: AgenrConfig) -> Self {
        Self { store, embedder, config, initialized: false }
    }

    /// Dispatch one request. Returns `None` for notifications, which get
    /// no response line on the wire.
    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "handling MCP request");

        if !self.initialized && request.method != "initialize" && request.method != "notifications/initialized" {
            warn!(method = %request.method, "rejecting request before initialize");
            return Some(JsonRpcResponse::error(request.id, JsonRpcError::server_not_initialized()));
        }

        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "notifications/initialized" => return None,
            "tools/list" => Ok(serde_json::json!({ "tools": [tool::description()] })),
            "tools/call" => self.handle_tools_call(request.params),
            "ping" => Ok(serde_json::json!({})),
            method => {
                warn!(method, "unknown MCP method");
                Err(JsonRpcError::method_not_found(method))
            }
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(err) => JsonRpcResponse::error(request.id, err),
        })
    }

    fn handle_initialize(&mut self) -> serde_json::Value {
        self.initialized = true;
        tracing::info!(protocol_version = MCP_VERSION, "MCP session initialized");
        serde_json::json!({
            "protocolVersion": MCP_VERSION,
            "serverInfo": { "name": "agenr", "version": env!("CARGO_PKG_VERSION") },
            "capabilities": { "tools": { "listChanged": false } }
        })
    }

    fn handle_tools_call(&mut self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        if name != tool::TOOL_NAME {
            return Err(JsonRpcError::method_not_found(name));
        }

        let args = params.get("arguments").cloned();
        let query = tool::parse_args(args).map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        let response = agenr_retrieval::recall(self.store, self.embedder, &self.config, &query)
            .map_err(|e| JsonRpcError::internal_error(e.to_string()))?;
        let text = agenr_retrieval::format_with_rowids(&response);

        Ok(serde_json::json!({
            "content": [{ "type": "text", "text": text }],
            "isError": false
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenr_core::models::{Entry, EntryType, Expiry, Scope};
    use agenr_storage::StorageEngine;

    fn request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(serde_json::json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn calls_before_initialize_are_rejected() {
        let store = StorageEngine::open_in_memory().unwrap();
        let mut server = McpServer::new(&store, None, AgenrConfig::default());

        let resp = server.handle_request(request("tools/list", None)).unwrap();
        assert_eq!(resp.error.unwrap().code, -32003);
    }

    #[test]
    fn tools_list_exposes_agenr_recall_after_initialize() {
        let store = StorageEngine::open_in_memory().unwrap();
        let mut server = McpServer::new(&store, None, AgenrConfig::default());
        server.handle_request(request("initialize", None));

        let resp = server.handle_request(request("tools/list", None)).unwrap();
        let tools = resp.result.unwrap();
        assert_eq!(tools["tools"][0]["name"], tool::TOOL_NAME);
    }

    #[test]
    fn tools_call_recalls_a_stored_entry() {
        let store = StorageEngine::open_in_memory().unwrap();
        let mut entry = Entry::new(
            EntryType::Fact,
            "Duke's vet",
            "Duke sees Dr. Alvarez every spring for a checkup",
            7,
            Expiry::Permanent,
            Scope::Private,
            vec!["pet".into()],
        );
        store.insert_entry(&mut entry).unwrap();

        let mut server = McpServer::new(&store, None, AgenrConfig::default());
        server.handle_request(request("initialize", None));

        let resp = server
            .handle_request(request(
                "tools/call",
                Some(serde_json::json!({ "name": tool::TOOL_NAME, "arguments": { "limit": 5 } })),
            ))
            .unwrap();

        let text = resp.result.unwrap()["content"][0]["text"].as_str().unwrap().to_string();
        assert!(text.contains("Duke's vet"));
    }

    #[test]
    fn unknown_method_is_reported() {
        let store = StorageEngine::open_in_memory().unwrap();
        let mut server = McpServer::new(&store, None, AgenrConfig::default());
        server.handle_request(request("initialize", None));

        let resp = server.handle_request(request("bogus/method", None)).unwrap();
        assert_eq!(resp.error.unwrap().code, -32601);
    }
}

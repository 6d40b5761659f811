//! JSON-RPC 2.0 front end exposing the tool router to a single client.

use crate::core::tools::{error_call_result, ToolRouter};
use crate::domain::ports::Transport;
use crate::utils::error::{Result, WeatherError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "mini weather database MCP server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Request {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Response {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl Response {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, err: &WeatherError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(RpcError {
                code: err.rpc_code(),
                message: err.to_string(),
            }),
        }
    }
}

pub struct McpServer {
    router: ToolRouter,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(router: ToolRouter, info: ServerInfo) -> Self {
        Self { router, info }
    }

    /// Serves frames from `transport` until the peer closes it.
    pub async fn run<T: Transport>(&self, transport: &mut T) -> Result<()> {
        tracing::info!("Serving '{}' v{}", self.info.name, self.info.version);

        let mut replies = 0usize;
        while let Some(frame) = transport.recv().await? {
            if let Some(reply) = self.handle_bytes(&frame) {
                transport.send(&reply).await?;
                replies += 1;
            }
        }

        tracing::info!("Client disconnected after {} replies", replies);
        Ok(())
    }

    /// Like [`McpServer::handle_frame`], for frames that may not be valid UTF-8.
    pub fn handle_bytes(&self, frame: &[u8]) -> Option<String> {
        match std::str::from_utf8(frame) {
            Ok(text) => self.handle_frame(text),
            Err(e) => {
                let err = WeatherError::ParseError {
                    message: format!("frame is not valid UTF-8: {}", e),
                };
                tracing::warn!("{}", err);
                serialize(&Response::failure(Value::Null, &err))
            }
        }
    }

    /// Handles one frame. Returns the serialized reply, or `None` for
    /// notifications and blank frames.
    pub fn handle_frame(&self, frame: &str) -> Option<String> {
        if frame.trim().is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(frame) {
            Ok(value) => self.handle_value(value)?,
            Err(e) => {
                let err = WeatherError::ParseError {
                    message: e.to_string(),
                };
                tracing::warn!("{}", err);
                Response::failure(Value::Null, &err)
            }
        };

        serialize(&response)
    }

    fn handle_value(&self, value: Value) -> Option<Response> {
        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        // only an absent id makes a notification; "id": null still gets a reply
        let has_id = value.get("id").is_some();

        if !value.is_object() {
            let err = WeatherError::InvalidRequest {
                message: "request must be a JSON object".to_string(),
            };
            tracing::warn!("{}", err);
            return Some(Response::failure(id_hint, &err));
        }

        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                let err = WeatherError::InvalidRequest {
                    message: e.to_string(),
                };
                tracing::warn!("{}", err);
                return Some(Response::failure(id_hint, &err));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let err = WeatherError::InvalidRequest {
                message: format!("unsupported jsonrpc version '{}'", request.jsonrpc),
            };
            return Some(Response::failure(id_hint, &err));
        }

        if !has_id {
            self.handle_notification(&request.method);
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match self.dispatch(&request.method, request.params) {
            Ok(result) => Response::success(id, result),
            Err(err) => {
                tracing::warn!(method = %request.method, "{}", err);
                Response::failure(id, &err)
            }
        };
        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => tracing::info!("Client initialized"),
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "initialize" => Ok(self.initialize(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.router.definitions() })),
            "tools/call" => self.call_tool(params),
            other => Err(WeatherError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let protocol_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": self.info,
        })
    }

    fn call_tool(&self, params: Option<Value>) -> Result<Value> {
        let mut params = match params {
            Some(Value::Object(map)) => map,
            _ => {
                return Err(WeatherError::InvalidRequest {
                    message: "tools/call expects an object with 'name' and 'arguments'".to_string(),
                })
            }
        };

        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => {
                return Err(WeatherError::InvalidRequest {
                    message: "tools/call is missing the tool 'name'".to_string(),
                })
            }
        };

        let arguments = match params.remove("arguments") {
            Some(Value::Object(arguments)) => arguments,
            None | Some(Value::Null) => Map::new(),
            Some(_) => {
                return Err(WeatherError::InvalidRequest {
                    message: "tools/call 'arguments' must be an object".to_string(),
                })
            }
        };

        match self.router.call(&name, &arguments) {
            Ok(output) => Ok(output.into_call_result()),
            // The tool exists but rejected its input; that is reported inside the result.
            Err(err @ WeatherError::InvalidArguments { .. }) => {
                tracing::warn!("{}", err);
                Ok(error_call_result(&err.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

fn serialize(response: &Response) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(reply) => Some(reply),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            None
        }
    }
}

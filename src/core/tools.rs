//! Name-to-handler dispatch table for the tools the server exposes.

use crate::domain::ports::TemperatureStore;
use crate::utils::error::{Result, WeatherError};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub const GET_WEATHER: &str = "get_weather";
pub const SET_WEATHER: &str = "set_weather";

type Handler = fn(&dyn TemperatureStore, &Map<String, Value>) -> Result<ToolOutput>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Number(f64),
    Text(String),
}

impl ToolOutput {
    /// Result payload of a successful `tools/call`.
    pub fn into_call_result(self) -> Value {
        let (text, structured) = match self {
            ToolOutput::Number(value) => (format!("{:?}", value), json!(value)),
            ToolOutput::Text(text) => (text.clone(), json!(text)),
        };

        json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": { "result": structured },
            "isError": false,
        })
    }
}

/// `tools/call` payload for a call that reached the tool but could not run.
pub fn error_call_result(message: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": message }],
        "isError": true,
    })
}

struct ToolEntry {
    definition: ToolDefinition,
    handler: Handler,
}

pub struct ToolRouter {
    store: Arc<dyn TemperatureStore>,
    tools: Vec<ToolEntry>,
}

impl ToolRouter {
    pub fn new(store: Arc<dyn TemperatureStore>) -> Self {
        let tools = vec![
            ToolEntry {
                definition: ToolDefinition {
                    name: GET_WEATHER,
                    description: "Retrieves the temperature for a specified city.",
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "city": {
                                "type": "string",
                                "description": "The name of the city for which to retrieve weather data."
                            }
                        },
                        "required": ["city"]
                    }),
                },
                handler: get_weather,
            },
            ToolEntry {
                definition: ToolDefinition {
                    name: SET_WEATHER,
                    description: "Sets the temperature for a specified city.",
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "city": {
                                "type": "string",
                                "description": "The name of the city for which to set the weather data."
                            },
                            "temp": {
                                "type": "number",
                                "description": "The temperature to associate with the city."
                            }
                        },
                        "required": ["city", "temp"]
                    }),
                },
                handler: set_weather,
            },
        ];

        Self { store, tools }
    }

    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|entry| &entry.definition).collect()
    }

    pub fn call(&self, name: &str, arguments: &Map<String, Value>) -> Result<ToolOutput> {
        let entry = self
            .tools
            .iter()
            .find(|entry| entry.definition.name == name)
            .ok_or_else(|| WeatherError::UnknownTool {
                name: name.to_string(),
            })?;

        tracing::debug!(tool = name, "dispatching tool call");
        (entry.handler)(self.store.as_ref(), arguments)
    }
}

fn get_weather(store: &dyn TemperatureStore, args: &Map<String, Value>) -> Result<ToolOutput> {
    let city = string_arg(GET_WEATHER, args, "city")?;
    Ok(ToolOutput::Number(store.get_temperature(city)))
}

fn set_weather(store: &dyn TemperatureStore, args: &Map<String, Value>) -> Result<ToolOutput> {
    let city = string_arg(SET_WEATHER, args, "city")?;
    let temp = number_arg(SET_WEATHER, args, "temp")?;
    let ack = store.set_temperature(city, temp);
    Ok(ToolOutput::Text(ack.to_string()))
}

fn string_arg<'a>(tool: &str, args: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match args.get(name) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(invalid_argument(tool, name, "a string", other)),
        None => Err(missing_argument(tool, name)),
    }
}

fn number_arg(tool: &str, args: &Map<String, Value>, name: &str) -> Result<f64> {
    match args.get(name) {
        Some(value @ Value::Number(number)) => number
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| invalid_argument(tool, name, "a finite number", value)),
        // "21.5" is accepted as well as 21.5
        Some(value @ Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| invalid_argument(tool, name, "a finite number", value)),
        Some(other) => Err(invalid_argument(tool, name, "a finite number", other)),
        None => Err(missing_argument(tool, name)),
    }
}

fn missing_argument(tool: &str, name: &str) -> WeatherError {
    WeatherError::InvalidArguments {
        tool: tool.to_string(),
        message: format!("missing required argument '{}'", name),
    }
}

fn invalid_argument(tool: &str, name: &str, expected: &str, got: &Value) -> WeatherError {
    WeatherError::InvalidArguments {
        tool: tool.to_string(),
        message: format!("argument '{}' must be {}, got {}", name, expected, got),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::WeatherRegistry;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn router() -> (Arc<WeatherRegistry>, ToolRouter) {
        let registry = Arc::new(WeatherRegistry::default());
        let router = ToolRouter::new(registry.clone());
        (registry, router)
    }

    #[test]
    fn test_definitions_in_registration_order() {
        let (_, router) = router();
        let names: Vec<_> = router.definitions().iter().map(|d| d.name).collect();
        assert_eq!(names, vec![GET_WEATHER, SET_WEATHER]);

        let serialized = serde_json::to_value(router.definitions()[1]).unwrap();
        assert_eq!(serialized["inputSchema"]["required"], json!(["city", "temp"]));
    }

    #[test]
    fn test_get_weather_returns_seed() {
        let (_, router) = router();
        let output = router
            .call(GET_WEATHER, &args(json!({ "city": " Berlin " })))
            .unwrap();
        assert_eq!(output, ToolOutput::Number(20.0));
    }

    #[test]
    fn test_set_weather_writes_through_to_registry() {
        let (registry, router) = router();
        let output = router
            .call(SET_WEATHER, &args(json!({ "city": "Lisbon", "temp": 26 })))
            .unwrap();
        assert_eq!(output, ToolOutput::Text("OK".to_string()));
        assert_eq!(registry.recorded("lisbon"), Some(26.0));
    }

    #[test]
    fn test_set_weather_accepts_numeric_string() {
        let (registry, router) = router();
        router
            .call(SET_WEATHER, &args(json!({ "city": "Cairo", "temp": "31.5" })))
            .unwrap();
        assert_eq!(registry.recorded("cairo"), Some(31.5));
    }

    #[test]
    fn test_unknown_tool() {
        let (_, router) = router();
        let err = router.call("get_rain", &Map::new()).unwrap_err();
        assert!(matches!(err, WeatherError::UnknownTool { ref name } if name == "get_rain"));
    }

    #[test]
    fn test_invalid_arguments() {
        let (registry, router) = router();

        let missing = router.call(GET_WEATHER, &Map::new()).unwrap_err();
        assert!(matches!(missing, WeatherError::InvalidArguments { .. }));

        let wrong_type = router
            .call(SET_WEATHER, &args(json!({ "city": "Rome", "temp": "warm" })))
            .unwrap_err();
        assert!(wrong_type.to_string().contains("temp"));
        assert_eq!(registry.recorded("rome"), None);

        let city_not_string = router
            .call(GET_WEATHER, &args(json!({ "city": 42 })))
            .unwrap_err();
        assert!(matches!(city_not_string, WeatherError::InvalidArguments { .. }));
    }

    #[test]
    fn test_call_result_shape() {
        let result = ToolOutput::Number(20.0).into_call_result();
        assert_eq!(result["content"][0]["text"], "20.0");
        assert_eq!(result["structuredContent"]["result"], json!(20.0));
        assert_eq!(result["isError"], false);

        let ack = ToolOutput::Text("OK".to_string()).into_call_result();
        assert_eq!(ack["content"][0]["text"], "OK");

        let failed = error_call_result("boom");
        assert_eq!(failed["isError"], true);
    }
}

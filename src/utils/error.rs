use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}

impl WeatherError {
    /// JSON-RPC error code reported to the caller for this error.
    pub fn rpc_code(&self) -> i64 {
        match self {
            WeatherError::ParseError { .. } | WeatherError::SerializationError(_) => -32700,
            WeatherError::InvalidRequest { .. } => -32600,
            WeatherError::MethodNotFound { .. } => -32601,
            WeatherError::UnknownTool { .. } | WeatherError::InvalidArguments { .. } => -32602,
            _ => -32603,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            WeatherError::ConfigError { .. }
                | WeatherError::ConfigValidationError { .. }
                | WeatherError::InvalidConfigValueError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WeatherError::IoError(e) => format!("Could not read or write a file or stream: {}", e),
            WeatherError::ConfigError { message } => format!("Configuration problem: {}", message),
            WeatherError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is not valid: {}", field, message)
            }
            WeatherError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Setting '{}' has an invalid value '{}': {}", field, value, reason),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WeatherError::IoError(_) => "Check that the file exists and is readable",
            WeatherError::ConfigError { .. } | WeatherError::ConfigValidationError { .. } => {
                "Check the TOML syntax and section names in the config file"
            }
            WeatherError::InvalidConfigValueError { .. } => {
                "Fix the highlighted value in the config file or on the command line"
            }
            _ => "Check the request sent by the client",
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes() {
        let parse = WeatherError::ParseError {
            message: "eof".to_string(),
        };
        let unknown = WeatherError::UnknownTool {
            name: "get_rain".to_string(),
        };
        let method = WeatherError::MethodNotFound {
            method: "resources/list".to_string(),
        };
        let config = WeatherError::ConfigError {
            message: "bad".to_string(),
        };

        assert_eq!(parse.rpc_code(), -32700);
        assert_eq!(unknown.rpc_code(), -32602);
        assert_eq!(method.rpc_code(), -32601);
        assert_eq!(config.rpc_code(), -32603);
        assert!(config.is_config_error());
        assert!(!unknown.is_config_error());
    }

    #[test]
    fn test_user_friendly_message_names_field() {
        let err = WeatherError::InvalidConfigValueError {
            field: "seeds.berlin".to_string(),
            value: "inf".to_string(),
            reason: "Temperature must be a finite number".to_string(),
        };
        assert!(err.user_friendly_message().contains("seeds.berlin"));
    }
}

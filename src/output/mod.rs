pub mod human;

use serde_json::{Value, json};

/// Standard JSON envelope written by every command.
pub fn success(command: &str, data: Value) -> Value {
    json!({
        "status": "ok",
        "command": command,
        "data": data,
        "error": null
    })
}

pub fn error(command: &str, code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "command": command,
        "data": null,
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Error code for the envelope: typed input errors are distinguished from
/// everything else.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<crate::error::Error>() {
        Some(crate::error::Error::InvalidInput(_)) => "invalid_input",
        None => "general_error",
    }
}

// RouterOS REST wire types
//
// Every menu entry comes back as a flat JSON object whose values are all
// strings (`"port": "3799"`, `"accept": "false"`). List members carry their
// internal id under `.id`. Typing happens in `tikform-core`.

use serde::Deserialize;

/// A single RouterOS record, keys in the router's kebab-case form.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Key RouterOS uses for the internal id of list members (`*1`, `*A`, ...).
pub const ID_KEY: &str = ".id";

/// Error body returned with 4xx/5xx statuses.
///
/// ```json
/// {"error": 400, "message": "Bad Request", "detail": "invalid value for argument address"}
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: u16,
    pub message: String,
    #[serde(default)]
    pub detail: Option<String>,
}

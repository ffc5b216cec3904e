//! The uniform result envelope for tool-facing operations.

use serde::{Deserialize, Serialize};

/// Tagged result envelope returned by every tool-facing operation.
///
/// Serializes as `{"success": true, ...payload}` on success and
/// `{"success": false, "error": "..."}` on failure, so a tool-calling
/// harness or UI can branch on `success` without exception handling.
/// Failures stay inside the envelope; nothing in the tool surface throws.
///
/// # Examples
///
/// ```
/// use fabula_interface::ToolOutcome;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Payload { count: usize }
///
/// let ok = ToolOutcome::ok(Payload { count: 3 });
/// let json = serde_json::to_value(&ok).unwrap();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["count"], 3);
///
/// let err: ToolOutcome<Payload> = ToolOutcome::err("Story not found");
/// let json = serde_json::to_value(&err).unwrap();
/// assert_eq!(json["success"], false);
/// assert_eq!(json["error"], "Story not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Operation payload, flattened into the envelope on success
    #[serde(flatten)]
    pub payload: Option<T>,
    /// Error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ToolOutcome<T> {
    /// Successful outcome carrying a payload.
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    /// Failed outcome carrying an error message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(message.into()),
        }
    }

    /// Borrow the payload, if any.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Borrow the error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_success_flattens_payload() {
        let outcome = ToolOutcome::ok(Named { name: "A".into() });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["name"], "A");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_carries_error_only() {
        let outcome: ToolOutcome<Named> = ToolOutcome::err("Chapter not found");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Chapter not found");
        assert!(json.get("name").is_none());
    }
}

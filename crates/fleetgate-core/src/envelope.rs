//! Tool result envelope construction.
//!
//! Every tool invocation returns one of: a textual/JSON success result, a
//! blocked-tool error, or an `APPROVAL_REQUIRED: <json>` text body. These
//! builders centralize the wire shape so every component produces the
//! same envelope instead of hand-rolling JSON at each call site.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::GatingError;
use crate::types::ApprovalTicket;

/// A single content block in a tool result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A plain text block.
    Text {
        /// The text payload. JSON results are serialized into this field
        /// as a string, not nested as a JSON value.
        text: String,
    },
}

/// The envelope every tool call returns.
#[derive(Debug, Clone, Serialize)]
pub struct ToolEnvelope {
    /// Content blocks returned to the model.
    pub content: Vec<ContentBlock>,
    /// Present and `true` only for error results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolEnvelope {
    /// A successful textual result.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: body.into() }],
            is_error: None,
        }
    }

    /// A successful result carrying a JSON payload, serialized into the
    /// text field.
    pub fn json<T: Serialize>(value: &T) -> Self {
        let text = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
        Self {
            content: vec![ContentBlock::Text { text }],
            is_error: None,
        }
    }

    /// An `APPROVAL_REQUIRED: <json>` text body.
    pub fn approval_required(ticket: &ApprovalTicket, extra_fields: Value) -> Self {
        let mut payload = json!({
            "type": "approval_required",
            "approval_id": ticket.id.to_string(),
            "how_to_approve": "re-invoke this tool with the approval_id as pre-approval",
            "do_not_retry": true,
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut payload, extra_fields) {
            for (k, v) in extra {
                base.insert(k, v);
            }
        }
        let text = format!(
            "APPROVAL_REQUIRED: {}",
            serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string())
        );
        Self {
            content: vec![ContentBlock::Text { text }],
            is_error: None,
        }
    }

    /// A blocked-tool error envelope.
    pub fn error(err: &GatingError) -> Self {
        let details = json!({
            "error_code": err.error_code(),
            "message": err.to_string(),
            "auto_recoverable": err.auto_recoverable(),
            "recovery_hint": err.recovery_hint(),
        });
        let details = match err {
            GatingError::RoutingMismatch {
                target_host,
                more_specific_ids,
                ..
            } => {
                let mut d = details;
                if let Value::Object(map) = &mut d {
                    map.insert("target_resource_id".to_string(), json!(target_host));
                    map.insert(
                        "more_specific_resource_ids".to_string(),
                        json!(more_specific_ids),
                    );
                }
                d
            }
            _ => details,
        };
        Self {
            content: vec![ContentBlock::Text {
                text: serde_json::to_string(&details).unwrap_or_else(|_| "{}".to_string()),
            }],
            is_error: Some(true),
        }
    }
}

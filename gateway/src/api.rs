use assistant_core::{ErrorKind, Reply, Source, ToolResult};
use serde::{Deserialize, Serialize};

// Input: What the user sends us
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub input: String,
}

// Output: What we send back
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub source: Source,
    pub ok: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub elapsed_ms: u64,
    pub formatted: String,
}

impl From<Reply> for AskResponse {
    fn from(reply: Reply) -> Self {
        let text = match &reply.result {
            ToolResult::Success { text, .. } => text.clone(),
            ToolResult::Failure { message, .. } => message.clone(),
        };
        Self {
            source: reply.source,
            ok: reply.result.is_success(),
            text,
            error_kind: reply.result.error_kind(),
            elapsed_ms: reply.result.elapsed_ms(),
            formatted: reply.render(),
        }
    }
}

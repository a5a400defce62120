use serde_json::Value;

use crate::error::ProviderError;

/// One request to a language-model provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub system: String,
    pub prompt: String,
    /// JSON schema for structured output. `None` for raw completions.
    pub schema: Option<Value>,
    pub schema_name: String,
}

/// The language-model backend the pipeline talks to.
///
/// Implementations own transport, auth and timeouts; the pipeline only sees
/// the two call shapes below.
#[async_trait::async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Structured-output mode: the provider enforces `request.schema` and
    /// returns the parsed JSON value.
    async fn parse_structured(&self, request: &ProviderRequest) -> Result<Value, ProviderError>;

    /// Plain completion; the caller recovers JSON from the text.
    async fn complete_raw(&self, request: &ProviderRequest) -> Result<String, ProviderError>;
}

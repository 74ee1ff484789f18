use crate::error::TransportError;

/// One outbound generation call. The credential travels with the request so the
/// caller decides which value is used.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub credential: String,
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt_len", &self.prompt.len())
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Blocking access to a generative model. Called from the analysis worker thread.
pub trait ModelClient: Send + Sync {
    /// Returns the raw text the model produced.
    fn generate(&self, request: &GenerationRequest) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_credential() {
        let request = GenerationRequest {
            prompt: "explain".to_string(),
            credential: "secret-key".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("redacted"));
    }
}

use thiserror::Error;

/// Errors raised by the collaborators around the answer cache
/// (embedding and chat providers, retrieval, configuration).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Retrieval error: {message}")]
    Retrieval { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("openai", "HTTP 401: unauthorized");
        assert_eq!(
            error.to_string(),
            "Provider error: openai - HTTP 401: unauthorized"
        );
    }

    #[test]
    fn test_retrieval_error() {
        let error = DomainError::retrieval("store is empty");
        assert_eq!(error.to_string(), "Retrieval error: store is empty");
    }
}

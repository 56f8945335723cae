//! Location and credentials of an OpenAI-compatible API

pub(crate) const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Base URL plus bearer token shared by the chat and embedding providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiEndpoint {
    base_url: String,
    authorization: String,
}

impl OpenAiEndpoint {
    /// `base_url` defaults to the public OpenAI API; a trailing slash is ignored
    pub fn new(api_key: &str, base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            authorization: format!("Bearer {}", api_key),
        }
    }

    /// Full URL of an API path such as `/v1/embeddings`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.authorization.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let endpoint = OpenAiEndpoint::new("sk-test", None);

        assert_eq!(
            endpoint.url("/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(endpoint.headers()[0], ("Authorization", "Bearer sk-test"));
    }

    #[test]
    fn test_custom_base_url_drops_trailing_slash() {
        let endpoint = OpenAiEndpoint::new("k", Some("http://localhost:8080/"));

        assert_eq!(endpoint.url("/v1/embeddings"), "http://localhost:8080/v1/embeddings");
    }
}

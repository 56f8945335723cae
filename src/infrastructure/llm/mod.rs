//! Chat provider implementations

mod endpoint;
mod factory;
mod http_client;
mod openai;

pub use endpoint::OpenAiEndpoint;
pub use factory::ProviderFactory;
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;

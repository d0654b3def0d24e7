use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Builder for [`OpenAIConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpenAIConfigBuilder {
    base_url: Option<String>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
}

impl OpenAIConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the sampling temperature sent with every request.
    #[inline]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets a timeout for the whole request, from connecting until the
    /// body has been read.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> OpenAIConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        OpenAIConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}

/// Configuration for the OpenAI-compatible provider.
///
/// The credential and model are not part of the configuration, they
/// travel with each request.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenAIConfig {
    pub(crate) base_url: String,
    pub(crate) temperature: Option<f32>,
    pub(crate) timeout: Option<Duration>,
}

impl OpenAIConfig {
    /// Returns the endpoint that completions are posted to.
    #[inline]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

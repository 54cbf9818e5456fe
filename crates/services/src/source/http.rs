use std::env;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;
use url::form_urlencoded::byte_serialize;

use super::QuizSource;
use super::wire::{QuizPayload, parse_payload};
use crate::error::FetchError;

/// Where to download the quiz document from.
///
/// With a proxy prefix the request goes to `{prefix}{percent-encoded source}`,
/// the shape expected by CORS proxies such as `https://api.allorigins.win/get?url=`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSourceConfig {
    source_url: Url,
    proxy_prefix: Option<String>,
}

impl QuizSourceConfig {
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `source_url` does not parse.
    pub fn new(source_url: &str) -> Result<Self, FetchError> {
        let source_url = parse_url(source_url)?;
        Ok(Self {
            source_url,
            proxy_prefix: None,
        })
    }

    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the prefix is not an absolute URL.
    pub fn with_proxy(mut self, prefix: &str) -> Result<Self, FetchError> {
        let prefix = prefix.trim();
        parse_url(prefix)?;
        self.proxy_prefix = Some(prefix.to_string());
        Ok(self)
    }

    /// Read `QUIZ_SOURCE_URL` and the optional `QUIZ_PROXY_URL`.
    ///
    /// Returns `Ok(None)` when no source URL is set.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if either variable holds a malformed URL.
    pub fn from_env() -> Result<Option<Self>, FetchError> {
        let Some(source) = non_empty_var("QUIZ_SOURCE_URL") else {
            return Ok(None);
        };
        let config = Self::new(&source)?;
        match non_empty_var("QUIZ_PROXY_URL") {
            Some(proxy) => config.with_proxy(&proxy).map(Some),
            None => Ok(Some(config)),
        }
    }

    #[must_use]
    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    #[must_use]
    pub fn proxy_prefix(&self) -> Option<&str> {
        self.proxy_prefix.as_deref()
    }

    /// URL actually requested.
    #[must_use]
    pub fn request_url(&self) -> String {
        match &self.proxy_prefix {
            Some(prefix) => {
                let encoded: String = byte_serialize(self.source_url.as_str().as_bytes()).collect();
                format!("{prefix}{encoded}")
            }
            None => self.source_url.to_string(),
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw.trim()).map_err(|_| FetchError::InvalidUrl {
        raw: raw.to_string(),
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Downloads the quiz document over HTTP.
#[derive(Clone, Debug)]
pub struct HttpQuizSource {
    client: Client,
    config: QuizSourceConfig,
}

impl HttpQuizSource {
    #[must_use]
    pub fn new(config: QuizSourceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizSourceConfig {
        &self.config
    }
}

#[async_trait]
impl QuizSource for HttpQuizSource {
    async fn fetch(&self) -> Result<QuizPayload, FetchError> {
        let url = self.config.request_url();
        debug!(%url, "requesting quiz");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        parse_payload(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_without_proxy_is_source() {
        let config = QuizSourceConfig::new("https://api.jsonserve.com/Uw5CrX").unwrap();
        assert_eq!(config.request_url(), "https://api.jsonserve.com/Uw5CrX");
        assert_eq!(config.proxy_prefix(), None);
    }

    #[test]
    fn request_url_with_proxy_encodes_source() {
        let config = QuizSourceConfig::new("https://api.jsonserve.com/Uw5CrX")
            .unwrap()
            .with_proxy("https://api.allorigins.win/get?url=")
            .unwrap();
        assert_eq!(
            config.request_url(),
            "https://api.allorigins.win/get?url=https%3A%2F%2Fapi.jsonserve.com%2FUw5CrX"
        );
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(matches!(
            QuizSourceConfig::new("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
        let config = QuizSourceConfig::new("https://example.com/quiz.json").unwrap();
        assert!(matches!(
            config.with_proxy("/relative"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}

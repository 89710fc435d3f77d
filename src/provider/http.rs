//! Recipes from a remote template service.
//!
//! The service exposes `<base>/list`, a comma and newline delimited list of
//! options, and `<base>/<opt1,opt2,...>`, the generated content for those
//! options wrapped in banner comments.
use crate::error::{Error, Result};
use crate::provider::{validate_options, Mapping, Provider, Source};
use log::debug;
use regex::Regex;
use reqwest::StatusCode;
use url::Url;

/// Banner and footer lines the service adds around generated content.
const SANITIZER_PATTERN: &str = r"(?m)^# (?:Created by|Edit at|End of) https?://\S*[ \t]*\r?\n?";

/// Status and body of a completed GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Transport used by the HTTP provider to issue GET requests.
pub trait Fetcher {
    /// Performs a GET request.
    ///
    /// # Errors
    /// * `Error::RetrievalError` if the request cannot be completed
    fn get(&self, url: &Url) -> Result<FetchResponse>;
}

/// Blocking reqwest-based fetcher.
pub struct ReqwestFetcher {
    client: reqwest::blocking::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self { client: reqwest::blocking::Client::new() }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        ReqwestFetcher::new()
    }
}

impl Fetcher for ReqwestFetcher {
    fn get(&self, url: &Url) -> Result<FetchResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| Error::RetrievalError(format!("request to '{url}' failed: {e}")))?;
        let status = response.status();
        let body = response.text().map_err(|e| {
            Error::RetrievalError(format!("failed to read body from '{url}': {e}"))
        })?;

        Ok(FetchResponse { status, body })
    }
}

/// Provider querying a remote template service.
pub struct HttpProvider {
    base_url: Url,
    fetcher: Box<dyn Fetcher>,
    sanitizer: Regex,
}

impl HttpProvider {
    /// Creates a new HttpProvider for the service at `base_url`.
    ///
    /// # Errors
    /// * `Error::ConfigError` if `base_url` is not a valid base URL
    pub fn new(base_url: &str, fetcher: Box<dyn Fetcher>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::ConfigError(format!("invalid service URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::ConfigError(format!(
                "service URL '{base_url}' cannot be used as a base"
            )));
        }
        let sanitizer = Regex::new(SANITIZER_PATTERN)
            .map_err(|e| Error::ConfigError(format!("invalid sanitizer pattern: {e}")))?;

        Ok(Self { base_url, fetcher, sanitizer })
    }

    fn endpoint(&self, segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }

    fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Requesting '{url}'.");
        let response = self.fetcher.get(url)?;
        if !response.status.is_success() {
            return Err(Error::RetrievalError(format!(
                "HTTP error {} from '{url}'",
                response.status
            )));
        }
        Ok(response.body)
    }

    fn sanitize(&self, content: &str) -> String {
        self.sanitizer.replace_all(content, "").trim().to_string()
    }
}

impl Provider for HttpProvider {
    fn name(&self) -> &str {
        "remote service"
    }

    fn list(&self) -> Result<Vec<String>> {
        let body = self.fetch(&self.endpoint("list"))?;

        Ok(body
            .lines()
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn generate(&self, options: &[String]) -> Result<String> {
        let valid_options = self.list()?;
        validate_options(&valid_options, options)?;

        let body = self.fetch(&self.endpoint(&options.join(",")))?;
        Ok(self.sanitize(&body))
    }

    fn as_source(&self) -> Option<&dyn Source> {
        Some(self)
    }
}

impl Source for HttpProvider {
    /// Generates every listed option individually.
    fn source(&self) -> Result<Mapping> {
        let options = self.list().map_err(|e| {
            Error::RetrievalError(format!("unable to retrieve list of options: {e}"))
        })?;

        let mut mapping = Mapping::new();
        for option in options {
            let content = self.generate(std::slice::from_ref(&option)).map_err(|e| {
                Error::RetrievalError(format!("unable to generate data for {option}: {e}"))
            })?;
            mapping.insert(option, content);
        }

        debug!("Sourced {} recipes from '{}'.", mapping.len(), self.base_url);
        Ok(mapping)
    }
}

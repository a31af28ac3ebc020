//! Blocking HTTP execution over `reqwest`.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderName, HeaderValue};
use std::time::Duration;
use tracing::debug;

use super::request::{Method, Request};

/// Client settings taken from the config file.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::HTTP_TIMEOUT_SECS_DEFAULT),
            user_agent: format!("ytool/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// What came back from the server, fully read.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `HTTP <code> <reason>` followed by one line per header.
    pub fn head_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("HTTP {} {}", self.status, self.reason)];
        lines.extend(self.headers.iter().map(|(k, v)| format!("{k}: {v}")));
        lines
    }
}

pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .context("build http client")?;
        Ok(Self { http })
    }

    /// Build the request without sending it.
    pub fn prepare(&self, method: Method, req: &Request) -> Result<RequestBuilder> {
        let url = req.validated_url()?;
        let m = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.http.request(m, url);
        for h in &req.headers {
            let name = HeaderName::from_bytes(h.key.as_bytes())
                .with_context(|| format!("invalid header name '{}'", h.key))?;
            let value = HeaderValue::from_str(&h.value)
                .with_context(|| format!("invalid value for header '{}'", h.key))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = &req.body {
            builder = builder.body(body.clone());
        }
        Ok(builder)
    }

    /// Send the request and read the whole response body.
    pub fn send(&self, method: Method, req: &Request) -> Result<HttpReply> {
        let builder = self.prepare(method, req)?;
        let url = req.url.clone().unwrap_or_default();
        debug!(%method, %url, headers = req.headers.len(), "sending request");
        let resp = builder.send().with_context(|| format!("{method} {url}"))?;
        read_reply(resp).with_context(|| format!("read response from {url}"))
    }
}

fn read_reply(resp: Response) -> Result<HttpReply> {
    let status = resp.status();
    let headers = resp
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let body = resp.text()?;
    debug!(status = status.as_u16(), bytes = body.len(), "response received");
    Ok(HttpReply {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
        headers,
        body,
    })
}

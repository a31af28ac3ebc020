//! Minimal curl: GET/POST a URL, optionally seeded from a saved curl command.

mod client;
mod curlfile;
mod request;

pub use client::{HttpClient, HttpReply, HttpSettings};
pub use curlfile::{load_curl_file, parse_curl_command};
pub use request::{Header, Method, Request};

use anyhow::Result;
use std::path::Path;

/// Inputs of one `ytool curl get|post` invocation.
#[derive(Debug, Clone, Default)]
pub struct CurlInvocation<'a> {
    pub url: Option<&'a str>,
    pub body: Option<&'a str>,
    pub load: Option<&'a Path>,
    pub headers: Vec<Header>,
}

/// Assemble the request: curl file first (if any), CLI values on top.
pub fn build_request(inv: &CurlInvocation<'_>) -> Result<Request> {
    let mut req = match inv.load {
        Some(p) => load_curl_file(p)?,
        None => Request::default(),
    };
    req.apply_overrides(inv.url, inv.body, &inv.headers);
    req.validated_url()?;
    Ok(req)
}

/// Build and send the request with `method`.
pub fn execute(method: Method, inv: &CurlInvocation<'_>, settings: &HttpSettings) -> Result<HttpReply> {
    let req = build_request(inv)?;
    if let Some(from_file) = req.method
        && from_file != method
    {
        tracing::warn!(file = %from_file, sending = %method, "curl file method differs from subcommand; using subcommand");
    }
    HttpClient::new(settings)?.send(method, &req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("c.txt");
        std::fs::write(&p, "curl http://file/ -H 'A: 1' -d from=file").unwrap();
        let inv = CurlInvocation {
            url: Some("http://cli/"),
            body: None,
            load: Some(&p),
            headers: vec!["B: 2".parse().unwrap()],
        };
        let req = build_request(&inv).unwrap();
        assert_eq!(req.url.as_deref(), Some("http://cli/"));
        assert_eq!(req.body.as_deref(), Some("from=file"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn missing_url_fails_before_sending() {
        let err = build_request(&CurlInvocation::default()).unwrap_err();
        assert!(err.to_string().contains("no URL"));
    }
}

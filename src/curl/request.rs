//! Request model shared by the curl-file parser and the HTTP client.

use anyhow::{anyhow, bail, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl FromStr for Header {
    type Err = anyhow::Error;

    /// Parse `Key: Value`. The `": "` separator is required and the key must be
    /// non-empty; the value may be empty (`"X-Empty: "`).
    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s
            .split_once(": ")
            .ok_or_else(|| anyhow!("header '{s}' is not of the form 'Key: Value'"))?;
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            bail!("header '{s}' has an invalid name");
        }
        Ok(Header {
            key: key.to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// A request assembled from a curl file and/or CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Method found in a curl file (`-X`); the CLI subcommand decides what is sent.
    pub method: Option<Method>,
    pub url: Option<String>,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

impl Request {
    /// Layer CLI values over this request: url/body replace, headers append.
    pub fn apply_overrides(&mut self, url: Option<&str>, body: Option<&str>, headers: &[Header]) {
        if let Some(u) = url {
            self.url = Some(u.to_string());
        }
        if let Some(b) = body {
            self.body = Some(b.to_string());
        }
        self.headers.extend_from_slice(headers);
    }

    /// Check the request can be sent and return its parsed URL.
    pub fn validated_url(&self) -> Result<Url> {
        let raw = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| anyhow!("no URL given; pass --url or --load a curl file"))?;
        let url = Url::parse(raw.trim()).map_err(|e| anyhow!("invalid URL '{raw}': {e}"))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => bail!("unsupported URL scheme '{other}' (only http and https)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parsing() {
        let h: Header = "Content-Type: application/json".parse().unwrap();
        assert_eq!(h.key, "Content-Type");
        assert_eq!(h.value, "application/json");

        let h: Header = "X-Empty: ".parse().unwrap();
        assert_eq!(h.value, "");

        // a bare colon is not a separator
        assert!("Host:example".parse::<Header>().is_err());
        assert!("X-Empty:".parse::<Header>().is_err());
        let h: Header = "Url: http://h:8080/x".parse().unwrap();
        assert_eq!(h.value, "http://h:8080/x");

        assert!("no separator".parse::<Header>().is_err());
        assert!(": value".parse::<Header>().is_err());
        assert!("Bad Name: v".parse::<Header>().is_err());
    }

    #[test]
    fn overrides_replace_url_body_and_append_headers() {
        let mut req = Request {
            method: Some(Method::Post),
            url: Some("http://a/".into()),
            headers: vec!["A: 1".parse().unwrap()],
            body: Some("old".into()),
        };
        req.apply_overrides(Some("http://b/"), None, &["B: 2".parse().unwrap()]);
        assert_eq!(req.url.as_deref(), Some("http://b/"));
        assert_eq!(req.body.as_deref(), Some("old"));
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.headers[1].key, "B");
    }

    #[test]
    fn url_validation() {
        let mut req = Request::default();
        assert!(req.validated_url().is_err());
        req.url = Some("ftp://example.com/x".into());
        assert!(req.validated_url().unwrap_err().to_string().contains("ftp"));
        req.url = Some("not a url".into());
        assert!(req.validated_url().is_err());
        req.url = Some(" https://example.com/path?q=1 ".into());
        assert_eq!(req.validated_url().unwrap().host_str(), Some("example.com"));
    }

    #[test]
    fn method_parse_and_display() {
        assert_eq!(Method::parse("post"), Some(Method::Post));
        assert_eq!(Method::parse("PUT"), None);
        assert_eq!(Method::Get.to_string(), "GET");
    }
}

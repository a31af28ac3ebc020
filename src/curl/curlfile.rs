//! Loader for saved `curl ...` command lines (e.g. a browser's "Copy as cURL").
//!
//! The text is split shell-style: single quotes, double quotes, `$'...'` strings,
//! backslash escapes and backslash-newline continuations. Recognised options:
//!
//! | option                                   | effect                      |
//! |------------------------------------------|-----------------------------|
//! | first bare `http(s)://` token, `--url`   | URL                         |
//! | `-X`, `--request`                        | method                      |
//! | `-H`, `--header`                         | header `Key: Value`         |
//! | `-d`, `--data`, `--data-raw`, ...        | body (joined with `&`)      |
//! | `-b`, `--cookie`                         | `Cookie` header             |
//! | `-A`, `--user-agent`                     | `User-Agent` header         |
//! | `-e`, `--referer`                        | `Referer` header            |
//!
//! Other options are ignored.

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::request::{Header, Method, Request};
use crate::utils::is_not_blank;

/// Read and parse a curl command file.
pub fn load_curl_file(path: &Path) -> Result<Request> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read curl file '{}'", path.display()))?;
    let req = parse_curl_command(&text)
        .with_context(|| format!("parse curl file '{}'", path.display()))?;
    debug!(
        path = %path.display(),
        url = req.url.as_deref().unwrap_or("<none>"),
        headers = req.headers.len(),
        has_body = req.body.is_some(),
        "loaded curl file"
    );
    Ok(req)
}

/// Parse the text of a curl command into a [`Request`].
pub fn parse_curl_command(text: &str) -> Result<Request> {
    let tokens = tokenize(text)?;
    let mut req = Request::default();
    let mut data: Vec<String> = Vec::new();

    let mut it = tokens.into_iter().peekable();
    if it.peek().map(String::as_str) == Some("curl") {
        it.next();
    }

    while let Some(tok) = it.next() {
        let (flag, inline) = match tok.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (tok.clone(), None),
        };
        let mut value = |name: &str| -> Result<String> {
            match inline.clone() {
                Some(v) => Ok(v),
                None => it.next().ok_or_else(|| anyhow!("option {name} expects a value")),
            }
        };

        match flag.as_str() {
            "-X" | "--request" => {
                let m = value(&flag)?;
                let method = Method::parse(&m).ok_or_else(|| anyhow!("unsupported method '{m}'"))?;
                req.method = Some(method);
            }
            "-H" | "--header" => {
                let h = value(&flag)?;
                if is_not_blank(&h) {
                    req.headers.push(h.parse()?);
                }
            }
            "-d" | "--data" | "--data-raw" | "--data-binary" | "--data-ascii" => {
                data.push(value(&flag)?);
            }
            "-b" | "--cookie" => push_header(&mut req, "Cookie", value(&flag)?),
            "-A" | "--user-agent" => push_header(&mut req, "User-Agent", value(&flag)?),
            "-e" | "--referer" => push_header(&mut req, "Referer", value(&flag)?),
            "--url" => req.url = Some(value(&flag)?),
            _ if tok.starts_with('-') => {
                debug!(option = %tok, "ignoring unsupported curl option");
            }
            _ if req.url.is_none() && looks_like_url(&tok) => req.url = Some(tok),
            _ => debug!(token = %tok, "ignoring stray token"),
        }
    }

    if !data.is_empty() {
        req.body = Some(data.join("&"));
        req.method.get_or_insert(Method::Post);
    }
    Ok(req)
}

fn push_header(req: &mut Request, key: &str, value: String) {
    req.headers.push(Header {
        key: key.to_string(),
        value,
    });
}

fn looks_like_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Shell-style word splitting sufficient for copied curl commands.
fn tokenize(text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut cur = String::new();
    let mut in_token = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '#' if !in_token => {
                // comment to end of line
                for n in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut cur));
                    in_token = false;
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some('\r') if chars.peek() == Some(&'\n') => {
                    chars.next();
                }
                Some(n) => {
                    cur.push(n);
                    in_token = true;
                }
                None => bail!("dangling backslash at end of input"),
            },
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(n) => cur.push(n),
                        None => bail!("unterminated single quote"),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(n @ ('"' | '\\' | '$' | '`')) => cur.push(n),
                            Some('\n') => {}
                            Some(n) => {
                                cur.push('\\');
                                cur.push(n);
                            }
                            None => bail!("unterminated double quote"),
                        },
                        Some(n) => cur.push(n),
                        None => bail!("unterminated double quote"),
                    }
                }
            }
            '$' if chars.peek() == Some(&'\'') => {
                chars.next();
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => cur.push('\n'),
                            Some('t') => cur.push('\t'),
                            Some('r') => cur.push('\r'),
                            Some(n @ ('\\' | '\'' | '"')) => cur.push(n),
                            Some(n) => {
                                cur.push('\\');
                                cur.push(n);
                            }
                            None => bail!("unterminated $'...' string"),
                        },
                        Some(n) => cur.push(n),
                        None => bail!("unterminated $'...' string"),
                    }
                }
            }
            c => {
                cur.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(cur);
    }
    Ok(tokens)
}

//! Exercises `curl::execute` against a one-shot HTTP server on localhost.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use ytool::curl::{execute, CurlInvocation, HttpSettings, Method};

/// Serve exactly one request; return the raw request text through the join handle.
fn one_shot(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap();
            }
            head.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut body_buf = vec![0u8; content_length];
        reader.read_exact(&mut body_buf).unwrap();
        head.push_str(&String::from_utf8_lossy(&body_buf));

        let mut stream = stream;
        write!(
            stream,
            "{status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
        head
    });
    (format!("http://{addr}"), handle)
}

fn settings() -> HttpSettings {
    HttpSettings {
        timeout: Duration::from_secs(10),
        user_agent: "ytool-test".into(),
    }
}

#[test]
fn get_returns_body_and_sends_headers() {
    let (base, server) = one_shot("HTTP/1.1 200 OK", "pong");
    let url = format!("{base}/ping");
    let inv = CurlInvocation {
        url: Some(&url),
        headers: vec!["X-Probe: 1".parse().unwrap()],
        ..Default::default()
    };
    let reply = execute(Method::Get, &inv, &settings()).unwrap();
    assert!(reply.is_success());
    assert_eq!(reply.body, "pong");
    assert_eq!(reply.head_lines()[0], "HTTP 200 OK");

    let seen = server.join().unwrap().to_ascii_lowercase();
    assert!(seen.starts_with("get /ping http/1.1"));
    assert!(seen.contains("x-probe: 1"));
    assert!(seen.contains("user-agent: ytool-test"));
}

#[test]
fn post_from_curl_file_with_cli_body() {
    let (base, server) = one_shot("HTTP/1.1 201 Created", "made");
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("req.curl");
    fs::write(
        &file,
        format!("curl '{base}/items' -H 'Content-Type: application/json' --data-raw '{{\"a\":1}}'"),
    )
    .unwrap();

    let inv = CurlInvocation {
        body: Some("{\"a\":2}"),
        load: Some(&file),
        ..Default::default()
    };
    let reply = execute(Method::Post, &inv, &settings()).unwrap();
    assert_eq!(reply.status, 201);
    assert_eq!(reply.body, "made");

    let seen = server.join().unwrap();
    assert!(seen.starts_with("POST /items HTTP/1.1"));
    assert!(seen.ends_with("{\"a\":2}"));
}

#[test]
fn error_status_is_returned_not_raised() {
    let (base, server) = one_shot("HTTP/1.1 404 Not Found", "missing");
    let inv = CurlInvocation {
        url: Some(&base),
        ..Default::default()
    };
    let reply = execute(Method::Get, &inv, &settings()).unwrap();
    assert!(!reply.is_success());
    assert_eq!(reply.body, "missing");
    server.join().unwrap();
}

#[test]
fn missing_url_fails_before_sending() {
    let inv = CurlInvocation::default();
    let err = execute(Method::Get, &inv, &settings()).unwrap_err();
    assert!(err.to_string().contains("no URL"));
}

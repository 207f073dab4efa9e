//! Minimal HTTP/1.1 media server for transport tests.
//!
//! Serves one static body under a fixed Content-Type and keeps the raw head of
//! every request it receives, so tests can check what actually went on the wire.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, HEAD returns 405.
    pub head_allowed: bool,
    /// If false, Range is ignored and GET always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, `Accept-Ranges: bytes` is never sent.
    pub advertise_ranges: bool,
    /// If true, partial responses carry `Content-Range: bytes a-b/*`.
    pub hide_total: bool,
    pub content_type: &'static str,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            head_allowed: true,
            support_ranges: true,
            advertise_ranges: true,
            hide_total: false,
            content_type: "video/mp4",
        }
    }
}

/// A running server. Lives until the test process exits.
pub struct RangeServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl RangeServer {
    pub fn start(body: Vec<u8>, opts: RangeServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let body = Arc::new(body);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let body = Arc::clone(&body);
                let log = Arc::clone(&log);
                thread::spawn(move || serve(stream, &body, opts, &log));
            }
        });
        Self {
            url: format!("http://127.0.0.1:{port}/media/clip.mp4"),
            requests,
        }
    }

    /// Raw request heads (request line plus headers) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

/// Shorthand for tests that only need the URL.
pub fn start(body: Vec<u8>, opts: RangeServerOptions) -> String {
    RangeServer::start(body, opts).url
}

/// Case-insensitive header lookup in a recorded request head.
pub fn request_header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines()
        .skip(1)
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim())
}

struct Reply {
    status: &'static str,
    headers: Vec<(&'static str, String)>,
    payload: Vec<u8>,
}

impl Reply {
    fn new(status: &'static str, content_type: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            payload: Vec::new(),
        }
    }

    fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    fn write_to(self, stream: &mut TcpStream, with_payload: bool) {
        let mut out = format!("HTTP/1.1 {}\r\n", self.status);
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        out.push_str("Connection: close\r\n\r\n");
        let mut bytes = out.into_bytes();
        if with_payload {
            bytes.extend_from_slice(&self.payload);
        }
        let _ = stream.write_all(&bytes);
    }
}

fn serve(mut stream: TcpStream, body: &[u8], opts: RangeServerOptions, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let text = String::from_utf8_lossy(&buf[..n]);
    let head = text.split("\r\n\r\n").next().unwrap_or_default().to_string();
    if let Ok(mut log) = log.lock() {
        log.push(head.clone());
    }

    let method = head.split_whitespace().next().unwrap_or_default();
    let is_head = method == "HEAD";
    let reply = match method {
        "HEAD" if opts.head_allowed => media_reply(body, opts, None),
        "GET" => media_reply(body, opts, requested_range(&head).filter(|_| opts.support_ranges)),
        _ => Reply::new("405 Method Not Allowed", "text/plain").header("Content-Length", 0),
    };
    reply.write_to(&mut stream, !is_head);
}

fn media_reply(body: &[u8], opts: RangeServerOptions, range: Option<(u64, u64)>) -> Reply {
    let total = body.len() as u64;
    let mut reply = match range {
        Some((first, _)) if first >= total => Reply::new("416 Range Not Satisfiable", opts.content_type)
            .header("Content-Range", format!("bytes */{total}")),
        Some((first, last)) => {
            let end = last.saturating_add(1).min(total);
            let shown_total = if opts.hide_total { "*".to_string() } else { total.to_string() };
            let mut r = Reply::new("206 Partial Content", opts.content_type)
                .header("Content-Range", format!("bytes {first}-{}/{shown_total}", end - 1));
            r.payload = body[first as usize..end as usize].to_vec();
            r
        }
        None => {
            let mut r = Reply::new("200 OK", opts.content_type);
            r.payload = body.to_vec();
            r
        }
    };
    if opts.advertise_ranges && opts.support_ranges {
        reply = reply.header("Accept-Ranges", "bytes");
    }
    // HEAD builds the same reply; the payload is dropped when writing.
    let length = reply.payload.len();
    reply.header("Content-Length", length)
}

/// `Range: bytes=a-b` or `bytes=a-` from a request head.
fn requested_range(head: &str) -> Option<(u64, u64)> {
    let value = request_header(head, "range")?;
    let (first, last) = value.strip_prefix("bytes=")?.split_once('-')?;
    let first = first.trim().parse().ok()?;
    let last = match last.trim() {
        "" => u64::MAX,
        n => n.parse().ok()?,
    };
    Some((first, last))
}

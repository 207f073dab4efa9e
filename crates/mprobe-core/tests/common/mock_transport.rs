//! Scripted in-process transport that records every request it sees.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use mprobe_core::transport::{
    Method, Transport, TransportError, TransportRequest, TransportResponse,
};

/// What the mock does for one request.
pub enum Reply {
    Respond(TransportResponse),
    Fail(TransportError),
    /// Never answers within any sane deadline.
    Hang,
}

type Handler = Box<dyn Fn(&TransportRequest, usize) -> Reply + Send + Sync>;

/// Transport whose behavior is a function of (request, 0-based call index).
pub struct MockTransport {
    handler: Handler,
    calls: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&TransportRequest, usize) -> Reply + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers by method: range GETs, HEADs and plain GETs each get their own reply.
    /// The engine's final GET also carries a Range header, so "range" here
    /// means the first GET of each cycle and "get" every later GET.
    pub fn by_step<R, H, G>(range: R, head: H, get: G) -> Self
    where
        R: Fn() -> Reply + Send + Sync + 'static,
        H: Fn() -> Reply + Send + Sync + 'static,
        G: Fn() -> Reply + Send + Sync + 'static,
    {
        let after_head = Mutex::new(false);
        Self::new(move |req, _| {
            let mut after_head = after_head.lock().unwrap();
            match req.method {
                Method::Head => {
                    *after_head = true;
                    head()
                }
                Method::Get if *after_head => {
                    *after_head = false;
                    get()
                }
                Method::Get => range(),
            }
        })
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn methods(&self) -> Vec<Method> {
        self.calls().iter().map(|c| c.method).collect()
    }
}

impl Transport for MockTransport {
    fn execute(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        let idx = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len() - 1
        };
        let reply = (self.handler)(request, idx);
        async move {
            match reply {
                Reply::Respond(resp) => Ok(resp),
                Reply::Fail(e) => Err(e),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(TransportError::Other("mock hung".to_string()))
                }
            }
        }
    }
}

pub fn respond(status: u16, headers: &[(&str, &str)]) -> Reply {
    let mut resp = TransportResponse::new(status);
    for (k, v) in headers {
        resp = resp.with_header(*k, *v);
    }
    Reply::Respond(resp)
}

pub fn partial(total: u64, content_type: &str) -> Reply {
    let content_range = format!("bytes 0-0/{total}");
    respond(
        206,
        &[
            ("Content-Type", content_type),
            ("Content-Range", content_range.as_str()),
            ("Content-Length", "1"),
        ],
    )
}

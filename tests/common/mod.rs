//! Shared utilities for integration tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::{sleep, Instant};

use status_poller::page::{Page, StaticPage};
use status_poller::poller::{CorrelationId, PollResult, StatusPayload, StatusSource};

/// Request heads received by a programmable backend.
#[allow(dead_code)]
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Start a programmable backend on an ephemeral port.
///
/// `f` receives the request head and returns the status code and JSON body.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        requests.lock().unwrap().push(head.clone());

                        let (status, body) = f(head).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

#[allow(dead_code)]
async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Status source answering from a script, then with a fallback status.
///
/// Each entry carries the time the answer takes to arrive.
#[allow(dead_code)]
pub struct ScriptedSource {
    script: RefCell<VecDeque<(Duration, PollResult<StatusPayload>)>>,
    fallback: &'static str,
    in_flight: Cell<u32>,
    max_in_flight: Cell<u32>,
    issued: RefCell<Vec<Instant>>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(fallback: &'static str) -> Self {
        Self {
            script: RefCell::new(VecDeque::new()),
            fallback,
            in_flight: Cell::new(0),
            max_in_flight: Cell::new(0),
            issued: RefCell::new(Vec::new()),
        }
    }

    pub fn then(self, status: &str) -> Self {
        self.then_after(Duration::ZERO, Ok(StatusPayload::new(status)))
    }

    pub fn then_result(self, result: PollResult<StatusPayload>) -> Self {
        self.then_after(Duration::ZERO, result)
    }

    pub fn then_after(self, latency: Duration, result: PollResult<StatusPayload>) -> Self {
        self.script.borrow_mut().push_back((latency, result));
        self
    }

    pub fn queries(&self) -> usize {
        self.issued.borrow().len()
    }

    /// When each query was issued.
    pub fn issued_at(&self) -> Vec<Instant> {
        self.issued.borrow().clone()
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.get()
    }
}

impl StatusSource for ScriptedSource {
    async fn query(&self, _id: &CorrelationId) -> PollResult<StatusPayload> {
        self.issued.borrow_mut().push(Instant::now());
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));

        let next = self.script.borrow_mut().pop_front();
        let (latency, result) =
            next.unwrap_or_else(|| (Duration::ZERO, Ok(StatusPayload::new(self.fallback))));
        sleep(latency).await;

        self.in_flight.set(self.in_flight.get() - 1);
        result
    }
}

/// Page whose identifier input reads as missing for the first few reads.
#[allow(dead_code)]
pub struct LatePage {
    pub inner: StaticPage,
    field: String,
    hidden_reads: Cell<u32>,
}

#[allow(dead_code)]
impl LatePage {
    pub fn new(inner: StaticPage, field: &str, hidden_reads: u32) -> Self {
        Self {
            inner,
            field: field.to_string(),
            hidden_reads: Cell::new(hidden_reads),
        }
    }
}

impl Page for LatePage {
    fn input_value(&self, name: &str) -> Option<String> {
        if name == self.field && self.hidden_reads.get() > 0 {
            self.hidden_reads.set(self.hidden_reads.get() - 1);
            return None;
        }
        self.inner.input_value(name)
    }

    fn data_attribute(&self, element_id: &str, attribute: &str) -> Option<String> {
        self.inner.data_attribute(element_id, attribute)
    }

    fn set_text(&self, element_id: &str, text: &str) {
        self.inner.set_text(element_id, text)
    }

    fn set_width(&self, element_id: &str, width: &str) {
        self.inner.set_width(element_id, width)
    }
}

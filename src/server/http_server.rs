//! HTTP/1.1 host for a [`Router`], built on `tiny_http`.
//!
//! The router itself never answers unmatched requests. This adapter is the
//! caller that does: when no handler wrote a response it replies with the
//! configured fallback status (404 by default), and an aborted response is
//! answered with 500.

use crate::handler::{BodyChunk, BodyDirective, BodyProcessor};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::Router;
use crate::server::{split_target, BufferedResponse, Request, ResponseWriter};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn};

/// Size of the buffer used to stream request bodies into processors.
const BODY_CHUNK_SIZE: usize = 8 * 1024;

/// Serves a shared [`Router`] over HTTP.
///
/// Registration must be finished before the router is wrapped in an `Arc`
/// and handed over; workers only ever read it.
pub struct HttpServer {
    router: Arc<Router>,
    workers: usize,
    fallback_status: StatusCode,
}

/// Handle to a running [`HttpServer`].
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<tiny_http::Server>,
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    /// Address the server is bound to (useful after binding port 0).
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll the listening socket until it accepts connections.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server is not reachable within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop accepting requests and wait for every worker to exit.
    pub fn stop(self) {
        release_workers(&self.server, &self.shutdown, self.workers);
        info!(addr = %self.addr, "HTTP server stopped");
    }

    /// Block until all workers exit. Without [`stop`](Self::stop) this runs
    /// for the life of the process.
    pub fn join(self) {
        for worker in self.workers {
            if worker.join().is_err() {
                error!(addr = %self.addr, "HTTP worker panicked");
            }
        }
    }
}

impl HttpServer {
    #[must_use]
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            workers: 4,
            fallback_status: StatusCode::NOT_FOUND,
        }
    }

    /// Number of worker threads pulling requests (minimum 1).
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Status sent when no handler wrote a response.
    #[must_use]
    pub fn fallback_status(mut self, status: StatusCode) -> Self {
        self.fallback_status = status;
        self
    }

    /// Bind `addr` and start the worker threads.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not resolve or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let server = tiny_http::Server::http(addr)
            .map_err(|e| io::Error::new(io::ErrorKind::AddrNotAvailable, e.to_string()))?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);
        let server = Arc::new(server);
        let shutdown = Arc::new(AtomicBool::new(false));

        let fallback = self.fallback_status;
        let workers = spawn_workers(self.workers, &server, &shutdown, |worker_id| {
            let server = Arc::clone(&server);
            let shutdown = Arc::clone(&shutdown);
            let router = Arc::clone(&self.router);
            thread::Builder::new()
                .name(format!("segrouter-http-{worker_id}"))
                .spawn(move || worker_loop(&server, &shutdown, &router, fallback))
        })?;

        info!(
            addr = %addr,
            workers = self.workers,
            routes_count = self.router.len(),
            fallback_status = self.fallback_status.as_u16(),
            "HTTP server started"
        );

        Ok(ServerHandle {
            addr,
            server,
            shutdown,
            workers,
        })
    }
}

/// Spawn `count` workers. If any spawn fails, the workers already running are
/// released and joined before the error is returned, so the listener is not
/// left bound.
fn spawn_workers<F>(
    count: usize,
    server: &tiny_http::Server,
    shutdown: &AtomicBool,
    mut spawn: F,
) -> io::Result<Vec<JoinHandle<()>>>
where
    F: FnMut(usize) -> io::Result<JoinHandle<()>>,
{
    let mut workers = Vec::with_capacity(count);
    for worker_id in 0..count {
        match spawn(worker_id) {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                error!(worker_id, error = %err, "Failed to spawn HTTP worker");
                release_workers(server, shutdown, workers);
                return Err(err);
            }
        }
    }
    Ok(workers)
}

fn release_workers(
    server: &tiny_http::Server,
    shutdown: &AtomicBool,
    workers: Vec<JoinHandle<()>>,
) {
    shutdown.store(true, Ordering::SeqCst);
    // each unblock releases exactly one waiting worker
    for _ in &workers {
        server.unblock();
    }
    for worker in workers {
        if worker.join().is_err() {
            error!("HTTP worker panicked");
        }
    }
}

fn worker_loop(
    server: &tiny_http::Server,
    shutdown: &AtomicBool,
    router: &Router,
    fallback: StatusCode,
) {
    loop {
        match server.recv() {
            Ok(request) => serve_request(router, request, fallback),
            Err(_) if shutdown.load(Ordering::SeqCst) => break,
            Err(err) => warn!(error = %err, "Failed to receive request"),
        }
    }
}

fn serve_request(router: &Router, mut raw: tiny_http::Request, fallback: StatusCode) {
    let started = Instant::now();

    let Ok(method) = Method::from_bytes(raw.method().as_str().as_bytes()) else {
        warn!(method = %raw.method(), "Unsupported request method");
        respond(raw, empty_response(StatusCode::BAD_REQUEST));
        return;
    };

    let mut req = {
        let (path, query) = split_target(raw.url());
        let mut req = Request::new(method, path);
        req.query = query.map(str::to_string);
        req
    };
    req.headers = convert_headers(raw.headers());
    req.request_id = RequestId::from_header_or_new(req.header(REQUEST_ID_HEADER));

    let span = info_span!(
        "request",
        request_id = %req.request_id,
        method = %req.method,
        target = %req.target
    );
    let _entered = span.enter();

    let mut res = BufferedResponse::new();
    let mut failed = false;
    // a panicking handler must not take the worker thread down with it
    let directive = match panic::catch_unwind(AssertUnwindSafe(|| router.handle(&req, &mut res))) {
        Ok(directive) => directive,
        Err(_) => {
            error!("Handler panicked");
            failed = true;
            BodyDirective::Discard
        }
    };
    if let BodyDirective::Process(mut processor) = directive {
        let reader = raw.as_reader();
        match panic::catch_unwind(AssertUnwindSafe(|| {
            stream_body(reader, &mut processor, &mut res)
        })) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, "Failed to read request body");
                failed = true;
            }
            Err(_) => {
                error!("Body processor panicked");
                failed = true;
            }
        }
    }

    let failed = failed || res.is_aborted();
    let status = if failed {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        res.status().unwrap_or(fallback)
    };
    let response = if failed || !res.head_written() {
        empty_response(status)
    } else {
        let (_, headers, body) = res.into_parts();
        let mut response = tiny_http::Response::from_data(body).with_status_code(status.as_u16());
        for (name, value) in &headers {
            match tiny_http::Header::from_bytes(name.as_str().as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => debug!(header = %name, "Dropping header tiny_http cannot encode"),
            }
        }
        response
    };

    info!(
        status = status.as_u16(),
        duration_us = started.elapsed().as_micros(),
        "Request completed"
    );
    respond(raw, response);
}

fn stream_body(
    reader: &mut dyn Read,
    processor: &mut BodyProcessor,
    res: &mut dyn ResponseWriter,
) -> io::Result<()> {
    let mut buf = vec![0u8; BODY_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        processor(BodyChunk::Data(&buf[..n]), &mut *res);
    }
    processor(BodyChunk::End, &mut *res);
    Ok(())
}

fn convert_headers(raw: &[tiny_http::Header]) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for header in raw {
        let name = HeaderName::from_bytes(header.field.as_str().as_str().as_bytes());
        let value = HeaderValue::from_str(header.value.as_str());
        if let (Ok(name), Ok(value)) = (name, value) {
            headers.append(name, value);
        }
    }
    headers
}

fn empty_response(status: StatusCode) -> tiny_http::Response<io::Cursor<Vec<u8>>> {
    tiny_http::Response::from_data(Vec::new()).with_status_code(status.as_u16())
}

fn respond<R: Read>(raw: tiny_http::Request, response: tiny_http::Response<R>) {
    if let Err(err) = raw.respond(response) {
        warn!(error = %err, "Failed to write response");
    }
}

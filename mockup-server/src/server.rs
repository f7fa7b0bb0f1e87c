//! HTTP loop: a fixed pool of workers sharing one tiny_http listener.
//!
//! Workers only move bytes; all decisions are made in `routes::handle`.

use anyhow::{anyhow, Context};
use mockup_ai::ImageService;
use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::routes::{handle, ApiResponse};

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

pub fn serve(config: &ServerConfig, service: Arc<dyn ImageService + Send + Sync>) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let server = Server::http(&addr).map_err(|err| anyhow!("bind {addr}: {err}"))?;
    info!("server running on http://{addr}");
    run(Arc::new(server), config.workers, config.max_body_bytes, service)
}

/// Serve on an already bound listener until it is unblocked.
fn run(
    server: Arc<Server>,
    worker_count: usize,
    max_body: usize,
    service: Arc<dyn ImageService + Send + Sync>,
) -> anyhow::Result<()> {
    let mut workers = Vec::with_capacity(worker_count);
    for index in 0..worker_count {
        let server = Arc::clone(&server);
        let service = Arc::clone(&service);
        let handle = thread::Builder::new()
            .name(format!("http-worker-{index}"))
            .spawn(move || worker_loop(&server, service.as_ref(), max_body))
            .with_context(|| format!("spawn http worker {index}"))?;
        workers.push(handle);
    }

    for handle in workers {
        handle
            .join()
            .map_err(|_| anyhow!("http worker panicked"))?;
    }
    Ok(())
}

fn worker_loop(server: &Server, service: &dyn ImageService, max_body: usize) {
    for request in server.incoming_requests() {
        if let Err(err) = respond(request, service, max_body) {
            warn!(error = %err, "failed to write response");
        }
    }
    debug!("listener closed; worker exiting");
}

enum BodyError {
    TooLarge,
    Io(std::io::Error),
}

fn read_body(request: &mut Request, max_body: usize) -> Result<Vec<u8>, BodyError> {
    if request.body_length().is_some_and(|len| len > max_body) {
        return Err(BodyError::TooLarge);
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(max_body as u64 + 1)
        .read_to_end(&mut body)
        .map_err(BodyError::Io)?;

    if body.len() > max_body {
        return Err(BodyError::TooLarge);
    }
    Ok(body)
}

fn respond(mut request: Request, service: &dyn ImageService, max_body: usize) -> std::io::Result<()> {
    let started = Instant::now();
    let method = request.method().to_string().to_ascii_uppercase();
    let url = request.url().to_string();

    let response = match read_body(&mut request, max_body) {
        Ok(body) => handle(service, &method, &url, &body),
        Err(BodyError::TooLarge) => {
            warn!(method = %method, url = %url, max_body, "request body too large");
            ApiResponse::error(413, "Request body too large")
        }
        Err(BodyError::Io(err)) => {
            warn!(method = %method, url = %url, error = %err, "failed to read request body");
            ApiResponse::error(400, "Could not read request body")
        }
    };

    info!(
        method = %method,
        url = %url,
        status = response.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    request.respond(into_http(response))
}

fn into_http(response: ApiResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let bytes = response
        .body
        .map(|body| body.to_string().into_bytes())
        .unwrap_or_default();
    let has_body = !bytes.is_empty();

    let mut http = Response::from_data(bytes).with_status_code(StatusCode(response.status));
    if has_body {
        http = with_header(http, "Content-Type", "application/json");
    }
    for (name, value) in CORS_HEADERS {
        http = with_header(http, name, value);
    }
    http
}

fn with_header<R: Read>(response: Response<R>, name: &str, value: &str) -> Response<R> {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => {
            warn!(name = name, "invalid response header");
            response
        }
    }
}

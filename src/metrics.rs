//! Prometheus metrics for handled chat commands.
//!
//! Exposes:
//! - `sark_command_duration_seconds` (histogram)
//! - `sark_command_total` (counter with status)
//! - `sark_command_inflight` (gauge)
//! - `sark_messages_ignored_total` (counter)
//! - process metrics via `process` collector

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use once_cell::sync::Lazy;
use prometheus::process_collector::ProcessCollector;
use prometheus::{
    default_registry, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, Encoder, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec,
    TextEncoder,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::commands::ChatCommand;

static PROCESS_COLLECTOR: Lazy<()> = Lazy::new(|| {
    if let Err(err) = default_registry().register(Box::new(ProcessCollector::for_self())) {
        warn!("Failed to register process collector: {}", err);
    }
});

static COMMAND_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    // Exponential buckets from 1ms up to ~16 seconds.
    let buckets = prometheus::exponential_buckets(0.001, 2.0, 15)
        .expect("failed to create histogram buckets");
    register_histogram_vec!(
        "sark_command_duration_seconds",
        "Time from receiving a command to sending the reply",
        &["command"],
        buckets
    )
    .expect("failed to register command duration histogram")
});

static COMMAND_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "sark_command_total",
        "Chat commands handled by status",
        &["command", "status"]
    )
    .expect("failed to register command counter")
});

static COMMAND_INFLIGHT: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "sark_command_inflight",
        "Chat commands whose reply is still being sent",
        &["command"]
    )
    .expect("failed to register inflight gauge")
});

static MESSAGES_IGNORED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "sark_messages_ignored_total",
        "Messages that were not a known command"
    )
    .expect("failed to register ignored messages counter")
});

/// Ensure collectors are registered.
fn init_collectors() {
    Lazy::force(&PROCESS_COLLECTOR);
    Lazy::force(&COMMAND_DURATION);
    Lazy::force(&COMMAND_TOTAL);
    Lazy::force(&COMMAND_INFLIGHT);
    Lazy::force(&MESSAGES_IGNORED);
}

/// Tracks one command from receipt to reply.
///
/// Dropping the timer without calling [`CommandTimer::finish`] counts the
/// command as failed.
pub struct CommandTimer {
    command: &'static str,
    started: Instant,
    done: bool,
}

impl CommandTimer {
    pub fn start(command: ChatCommand) -> Self {
        init_collectors();
        let command = command.name();
        COMMAND_INFLIGHT.with_label_values(&[command]).inc();
        Self {
            command,
            started: Instant::now(),
            done: false,
        }
    }

    pub fn finish(mut self, success: bool) {
        self.record(success);
    }

    fn record(&mut self, success: bool) {
        if self.done {
            return;
        }
        self.done = true;
        COMMAND_INFLIGHT.with_label_values(&[self.command]).dec();
        COMMAND_DURATION
            .with_label_values(&[self.command])
            .observe(self.started.elapsed().as_secs_f64());
        COMMAND_TOTAL
            .with_label_values(&[self.command, if success { "ok" } else { "error" }])
            .inc();
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        self.record(false);
    }
}

/// Count a message that did not parse as a command.
pub fn record_ignored_message() {
    init_collectors();
    MESSAGES_IGNORED.inc();
}

async fn metrics_response() -> Result<Response<Full<Bytes>>, Infallible> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    let (status, content_type, body) = match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (StatusCode::OK, encoder.format_type(), Full::from(buffer)),
        Err(err) => {
            error!("Failed to encode metrics: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain",
                Full::from("encode error"),
            )
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Ok(value) = hyper::header::HeaderValue::from_str(content_type) {
        response
            .headers_mut()
            .insert(hyper::header::CONTENT_TYPE, value);
    }
    Ok(response)
}

async fn handle_request(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    match req.uri().path() {
        "/metrics" => metrics_response().await,
        _ => {
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::NOT_FOUND;
            Ok(response)
        }
    }
}

async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Prometheus metrics endpoint started");
    accept_loop(listener).await;
    Ok(())
}

/// Serve connections until the task is dropped. A failed accept is logged
/// and skipped.
async fn accept_loop(listener: TcpListener) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!("Failed to accept metrics connection: {}", err);
                continue;
            }
        };
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service_fn(handle_request))
                .await
            {
                warn!(?peer, "Metrics connection error: {}", err);
            }
        });
    }
}

/// Spawn the metrics HTTP endpoint on the given address.
pub fn spawn_metrics_server(addr: SocketAddr) {
    init_collectors();
    tokio::spawn(async move {
        if let Err(err) = serve(addr).await {
            error!(%addr, "Metrics server failed: {}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn scrape() -> String {
        let response = metrics_response().await.expect("metrics response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect metrics body")
            .to_bytes();
        String::from_utf8(body.to_vec()).expect("utf-8 metrics body")
    }

    // Each test uses its own command label; counters are process-global.

    #[test]
    fn finished_timer_counts_success() {
        let label = ChatCommand::Osticket.name();
        let before = COMMAND_TOTAL.with_label_values(&[label, "ok"]).get();

        let timer = CommandTimer::start(ChatCommand::Osticket);
        assert!(COMMAND_INFLIGHT.with_label_values(&[label]).get() >= 1);
        timer.finish(true);

        assert_eq!(COMMAND_TOTAL.with_label_values(&[label, "ok"]).get(), before + 1);
        assert!(COMMAND_DURATION.with_label_values(&[label]).get_sample_count() >= 1);
    }

    #[test]
    fn dropped_timer_counts_failure() {
        let label = ChatCommand::Wiki.name();
        let before = COMMAND_TOTAL.with_label_values(&[label, "error"]).get();

        {
            let _timer = CommandTimer::start(ChatCommand::Wiki);
        }

        assert_eq!(
            COMMAND_TOTAL.with_label_values(&[label, "error"]).get(),
            before + 1
        );
        assert_eq!(COMMAND_INFLIGHT.with_label_values(&[label]).get(), 0);
    }

    #[test]
    fn finish_records_only_once() {
        let label = ChatCommand::Help.name();
        let ok_before = COMMAND_TOTAL.with_label_values(&[label, "ok"]).get();
        let err_before = COMMAND_TOTAL.with_label_values(&[label, "error"]).get();

        CommandTimer::start(ChatCommand::Help).finish(true);

        assert_eq!(COMMAND_TOTAL.with_label_values(&[label, "ok"]).get(), ok_before + 1);
        assert_eq!(
            COMMAND_TOTAL.with_label_values(&[label, "error"]).get(),
            err_before
        );
    }

    #[test]
    fn ignored_messages_are_counted() {
        record_ignored_message();
        let before = MESSAGES_IGNORED.get();
        record_ignored_message();
        assert!(MESSAGES_IGNORED.get() > before);
    }

    #[tokio::test]
    async fn metrics_response_contains_registered_metrics() {
        CommandTimer::start(ChatCommand::Barcode).finish(true);

        let text = scrape().await;
        assert!(text.contains("sark_command_total"));
        assert!(text.contains("sark_command_duration_seconds"));
        assert!(text.contains("sark_command_inflight"));
        assert!(text.contains("barcode"));
    }

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn accept_loop_keeps_serving_after_aborted_connection() {
        init_collectors();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(accept_loop(listener));

        // a client that hangs up without sending a request
        drop(tokio::net::TcpStream::connect(addr).await.unwrap());

        let first = http_get(addr, "/metrics").await;
        assert!(first.starts_with("HTTP/1.1 200"));
        assert!(first.contains("sark_messages_ignored_total"));

        let missing = http_get(addr, "/nope").await;
        assert!(missing.starts_with("HTTP/1.1 404"));

        assert!(!server.is_finished());
        server.abort();
    }

    #[tokio::test]
    async fn metrics_response_has_text_content_type() {
        let response = metrics_response().await.expect("metrics response");
        let content_type = response
            .headers()
            .get(hyper::header::CONTENT_TYPE)
            .expect("content type header");
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }
}

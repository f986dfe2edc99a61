use actix_web::HttpResponse;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic process-wide counter exported in Prometheus text format
struct Counter {
    name: &'static str,
    help: &'static str,
    value: AtomicU64,
}

impl Counter {
    const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            value: AtomicU64::new(0),
        }
    }

    fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

static HTTP_REQUESTS: Counter =
    Counter::new("http_requests_total", "Total number of HTTP requests");
static HTTP_ERRORS: Counter =
    Counter::new("http_errors_total", "Total number of HTTP 5xx responses");
static DOCUMENTS_SYNCED: Counter = Counter::new(
    "documents_synced_total",
    "Job and portal documents created or modified by sync requests",
);

static COUNTERS: [&Counter; 3] = [&HTTP_REQUESTS, &HTTP_ERRORS, &DOCUMENTS_SYNCED];

pub fn increment_request_count() {
    HTTP_REQUESTS.add(1);
}

pub fn increment_error_count() {
    HTTP_ERRORS.add(1);
}

pub fn add_synced_documents(n: u64) {
    DOCUMENTS_SYNCED.add(n);
}

pub fn request_count() -> u64 {
    HTTP_REQUESTS.get()
}

pub fn error_count() -> u64 {
    HTTP_ERRORS.get()
}

fn render() -> String {
    let mut out = String::new();
    for counter in COUNTERS.iter() {
        let _ = write!(
            out,
            "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n\n",
            name = counter.name,
            help = counter.help,
            value = counter.get()
        );
    }
    out
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render())
}

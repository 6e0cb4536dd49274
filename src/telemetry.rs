//! Request timing exported in the Prometheus text format.

use std::time::{Duration, Instant};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::Error;
use anyhow::Context;
use metrics::histogram;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const REQUEST_DURATION: &str = "directory_http_request_duration_seconds";

/// Installs the global recorder; the handle renders `/metrics`.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("installing prometheus recorder")
}

pub fn record_request(method: &str, route: &str, code: u16, elapsed: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("code", code.to_string()),
    ];
    histogram!(REQUEST_DURATION, &labels).record(elapsed.as_secs_f64());
}

/// Middleware timing every request. Routes are labelled by their pattern so
/// arbitrary paths do not grow the label set.
pub async fn track_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start = Instant::now();
    let method = req.method().to_string();
    let res = next.call(req).await?;
    let route = res
        .request()
        .match_pattern()
        .unwrap_or_else(|| "unmatched".to_string());
    record_request(&method, &route, res.status().as_u16(), start.elapsed());
    Ok(res)
}

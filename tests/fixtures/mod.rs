//! Mock collector and app wiring shared by the HTTP tests.

use std::net::TcpListener;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use directory_api::collector::CollectorClient;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use url::Url;

/// Two entries: a valid named one and an invalid anonymous one.
pub const SAMPLE: &str = r#"[
    {"url": "http://a", "valid": true, "data": {"space": "A"}},
    {"url": "http://b", "valid": false}
]"#;

/// A richer document with every optional field populated somewhere.
pub const FULL: &str = r#"[
    {
        "url": "https://a.example/status.json",
        "valid": true,
        "lastSeen": 1700000000,
        "data": {"space": "Alpha", "state": {"open": true}},
        "validationResult": {"valid": true, "isHttps": true, "httpsForward": true,
            "reachable": true, "cors": true, "contentType": true, "certValid": true}
    },
    {
        "url": "http://b.example/status.json",
        "valid": true,
        "errMsg": ["no https"],
        "validationResult": {"valid": true, "isHttps": false, "reachable": true}
    },
    {"url": "http://c.example/status.json", "valid": true},
    {"url": 17, "valid": true},
    {
        "url": "http://d.example/status.json",
        "valid": false,
        "errMsg": ["unreachable"],
        "data": {"space": "Delta"}
    }
]"#;

/// Serves `body` with `status` for every path on an ephemeral port.
pub fn spawn_collector(status: u16, body: &'static str) -> Url {
    let status = StatusCode::from_u16(status).unwrap();
    let server = HttpServer::new(move || {
        App::new().default_service(web::to(move || async move {
            HttpResponse::build(status)
                .content_type("application/json")
                .body(body)
        }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// A URL nothing listens on.
pub fn dead_collector() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Collector client and metrics handle for the app under test.
pub fn client(collector: Url) -> (CollectorClient, PrometheusHandle) {
    let client = CollectorClient::new(collector, "directory-api-tests", Duration::from_secs(5))
        .expect("collector client");
    (client, PrometheusBuilder::new().build_recorder().handle())
}

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{
    get, middleware, routes, web, App, Error, HttpRequest, HttpResponse, Responder,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use tracing::warn;

use crate::collector::CollectorClient;
use crate::directory::Directory;
use crate::filter::{parse_flag, ValidityFilter};
use crate::projection::{self, DetailOptions};
use crate::telemetry;
use crate::types::Health;

const OPENAPI: &str = include_str!("openapi.json");

/// Query parameters shared by the directory views.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    pub valid: Option<String>,
    pub filter: Option<String>,
    pub include_data: Option<String>,
    pub include_validation_result: Option<String>,
}

impl ViewParams {
    /// A query string that does not decode is treated as empty.
    pub fn from_request(req: &HttpRequest) -> Self {
        match web::Query::<ViewParams>::from_query(req.query_string()) {
            Ok(q) => q.into_inner(),
            Err(e) => {
                warn!(error=%e, query=%req.query_string(), "ignoring undecodable query string");
                Self::default()
            }
        }
    }

    pub fn validity(&self) -> ValidityFilter {
        ValidityFilter::from_param(self.valid.as_deref())
    }

    pub fn detail_options(&self) -> DetailOptions {
        DetailOptions {
            include_data: parse_flag(self.include_data.as_deref()),
            include_validation_result: parse_flag(self.include_validation_result.as_deref()),
        }
    }
}

async fn load(collector: &CollectorClient, params: &ViewParams) -> Directory {
    let document = collector.fetch_document().await;
    Directory::collect(document, params.filter.as_deref())
}

/* ------------------------ / and /v1 ------------------------ */

#[routes]
#[get("/")]
#[get("/v1")]
async fn serve_v1(req: HttpRequest, collector: web::Data<CollectorClient>) -> impl Responder {
    let params = ViewParams::from_request(&req);
    let directory = load(&collector, &params).await;
    let body = projection::by_name(directory.select(params.validity()), &mut rand::rng());
    HttpResponse::Ok().json(body)
}

/* ------------------------ /v2 ------------------------ */

#[get("/v2")]
async fn serve_v2(req: HttpRequest, collector: web::Data<CollectorClient>) -> impl Responder {
    let params = ViewParams::from_request(&req);
    let directory = load(&collector, &params).await;
    let body = projection::detailed(directory.select(params.validity()), params.detail_options());
    HttpResponse::Ok().json(body)
}

/* ------------------------ /cache ------------------------ */

#[get("/cache")]
async fn serve_cache(req: HttpRequest, collector: web::Data<CollectorClient>) -> impl Responder {
    let params = ViewParams::from_request(&req);
    let directory = load(&collector, &params).await;
    HttpResponse::Ok().json(projection::raw(directory.select(params.validity())))
}

#[get("/openapi.json")]
async fn openapi() -> impl Responder {
    HttpResponse::Ok()
        .content_type(header::ContentType::json())
        .body(OPENAPI)
}

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(Health {
        status: "ok".into(),
    })
}

#[get("/metrics")]
async fn serve_metrics(handle: web::Data<PrometheusHandle>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(handle.render())
}

/// Every origin may read the directory.
pub fn cors() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(serve_v1)
        .service(serve_v2)
        .service(serve_cache)
        .service(openapi)
        .service(health)
        .service(serve_metrics);
}

/// The application with its shared clients, middleware and routes.
pub fn app(
    collector: CollectorClient,
    prometheus: PrometheusHandle,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(collector))
        .app_data(web::Data::new(prometheus))
        .wrap(middleware::from_fn(telemetry::track_requests))
        .wrap(cors())
        .configure(configure)
}

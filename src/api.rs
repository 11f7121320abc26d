use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use tracing::info;

use crate::inbox::SignalInbox;
use crate::metrics;
use crate::model::VendorFamily;

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok",
        message: "API active",
    })
}

pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok",
        message: "relay active",
    })
}

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn metrics_endpoint() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::render())
}

/// Hand the pending signal of one category to the execution client, clearing it.
pub async fn take_signal(
    inbox: web::Data<SignalInbox>,
    family: web::Data<VendorFamily>,
) -> impl Responder {
    let family = **family;
    match inbox.take_latest(family) {
        Some(order) => {
            info!(
                vendor = %family,
                signal_id = order.correlation_id.as_deref().unwrap_or("-"),
                "Signal served to execution client"
            );
            metrics::inc_signals_served(family);
            HttpResponse::Ok().json(order)
        }
        None => HttpResponse::NoContent().finish(),
    }
}

// Define scope configuration
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/ping").route(web::get().to(ping)))
        .service(web::resource("/health").route(web::get().to(health_check)))
        .service(web::resource("/metrics").route(web::get().to(metrics_endpoint)));

    for family in VendorFamily::ALL {
        cfg.service(
            web::resource(family.poll_path())
                .app_data(web::Data::new(family))
                .route(web::get().to(take_signal)),
        );
    }
}

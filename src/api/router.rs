use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, booking, contact, customer, health, payment, service};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public catalog + availability
        .route("/api/v1/services", get(service::list_services))
        .route("/api/v1/services/{service_id}", get(service::get_service))
        .route("/api/v1/availability", get(availability::get_availability))

        // Public booking flow
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))
        .route("/api/v1/bookings/{booking_id}/reschedule", post(booking::reschedule_booking))

        // Contact form
        .route("/api/v1/contact", post(contact::create_contact))

        // Payment bridge inbound hook
        .route("/api/v1/payments/outcome", post(payment::payment_outcome))

        // Admin back office
        .route("/api/v1/admin/services", get(service::list_all_services).post(service::create_service))
        .route("/api/v1/admin/services/{service_id}", put(service::update_service))
        .route("/api/v1/admin/bookings", get(booking::list_bookings))
        .route(
            "/api/v1/admin/bookings/{booking_id}",
            get(booking::get_booking)
                .put(booking::update_booking_status)
                .delete(booking::delete_booking),
        )
        .route("/api/v1/admin/bookings/{booking_id}/cancel", post(booking::admin_cancel_booking))
        .route("/api/v1/admin/customers", get(customer::list_customers))
        .route("/api/v1/admin/contacts", get(contact::list_contacts))
        .route("/api/v1/admin/contacts/{contact_id}", put(contact::update_contact_status))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

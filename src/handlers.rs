use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info};

use crate::twilio::TwilioClient;
use crate::types::{ErrorResponse, HealthResponse, SendRequest, SendResponse};

pub struct AppState {
    pub twilio: TwilioClient,
}

fn missing_fields() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            message: "Missing fields".to_string(),
        }),
    )
        .into_response()
}

pub async fn send_sms(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendRequest>,
) -> Response {
    let (Some(phone_list), Some(message)) = (req.phone_list, req.message) else {
        return missing_fields();
    };
    if message.is_empty() {
        return missing_fields();
    }

    let mut results = Vec::with_capacity(phone_list.len());
    for number in &phone_list {
        info!("Sending SMS to {}", number);
        match state.twilio.send_message(number, &message).await {
            Ok(sid) => results.push(sid),
            Err(err) => {
                error!("Send to {} failed: {}", number, err);
                // Remaining numbers are skipped, and the status code stays
                // 200; only the body's success flag reports the failure.
                return (
                    StatusCode::OK,
                    Json(ErrorResponse {
                        success: false,
                        message: err.to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::OK,
        Json(SendResponse {
            success: true,
            results,
        }),
    )
        .into_response()
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = if state.twilio.is_configured() {
        "ok"
    } else {
        "unconfigured"
    };
    Json(HealthResponse {
        status: status.to_string(),
    })
}

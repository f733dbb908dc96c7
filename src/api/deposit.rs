use axum::{Json, extract::State};
use std::sync::Arc;
use tower_sessions::Session;
use uuid::Uuid;

use super::{ApiError, AppState, DepositResponse, auth::require_user};

pub const MIN_DEPOSIT: f64 = 1.0;
pub const MAX_DEPOSIT: f64 = 50_000.0;

/// POST /api/deposit/create
///
/// Creates a PIX payment intent at Mercado Pago and relays the QR payload.
/// The balance is NOT credited here: settlement confirmation (webhook) is an
/// out-of-band collaborator this service does not implement.
pub async fn create_deposit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<DepositResponse>, ApiError> {
    let user = require_user(&session).await?;

    // The amount must be a JSON number; strings like "2500" are rejected.
    let amount = body
        .get("amount")
        .and_then(serde_json::Value::as_f64)
        .filter(|a| a.is_finite() && (MIN_DEPOSIT..=MAX_DEPOSIT).contains(a))
        .ok_or_else(|| {
            ApiError::validation(format!(
                "amount must be a number between {MIN_DEPOSIT} and {MAX_DEPOSIT}"
            ))
        })?;

    let mercado_pago = state
        .mercado_pago()
        .ok_or_else(|| ApiError::internal("Mercado Pago access token is not configured"))?;

    // Fresh key per request; there are no local retries to deduplicate.
    let idempotency_key = Uuid::new_v4().to_string();

    let intent = mercado_pago
        .create_pix_payment(
            amount,
            &format!("Depósito PIX - usuário {}", user.id),
            &idempotency_key,
        )
        .await
        .map_err(ApiError::mercado_pago_error)?;

    tracing::info!("Created PIX deposit intent of {} for user {}", amount, user.id);

    Ok(Json(DepositResponse {
        amount,
        qr_code: intent.qr_code,
        qr_code_base64: intent.qr_code_base64,
    }))
}

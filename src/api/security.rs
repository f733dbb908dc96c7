use axum::{Json, extract::State};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, SecurityInfoResponse, auth::require_user};

/// GET /api/security/info
///
/// Mints the user's security code on first access; the code is stable for
/// the rest of the process lifetime.
pub async fn security_info(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<SecurityInfoResponse>, ApiError> {
    let user = require_user(&session).await?;

    let code = state.ledger().get_or_create_security_code(&user.id).await?;
    let logins = state.ledger().login_history(&user.id).await?;

    Ok(Json(SecurityInfoResponse { code, logins }))
}

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::{IntoResponse, Json, Redirect},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, LogoutResponse, MeResponse, SessionUser};
use crate::ledger::LoginEntry;

pub(super) const OAUTH_STATE_KEY: &str = "oauth_state";
pub(super) const SESSION_USER_KEY: &str = "user";

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /auth/discord
/// Issue a one-time state nonce and redirect to Discord's authorize page.
pub async fn discord_login(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, ApiError> {
    use rand::distr::{Alphanumeric, SampleString};

    let nonce = Alphanumeric.sample_string(&mut rand::rng(), 32);

    session
        .insert(OAUTH_STATE_KEY, &nonce)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store OAuth state: {e}")))?;

    Ok(Redirect::to(&state.discord().authorize_url(&nonce)))
}

/// GET /auth/discord/callback?code&state
///
/// The stored nonce is consumed before anything else, so a replayed or
/// concurrent duplicate callback finds no nonce and is rejected.
pub async fn discord_callback(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let stored_nonce: Option<String> = session
        .remove(OAUTH_STATE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        return Err(ApiError::validation("Missing code or state"));
    };

    if stored_nonce.as_deref() != Some(returned_state.as_str()) {
        return Err(ApiError::validation("Invalid OAuth state"));
    }

    let token = state
        .discord()
        .exchange_code(&code)
        .await
        .map_err(ApiError::discord_error)?;

    let profile = state
        .discord()
        .fetch_user(&token.access_token)
        .await
        .map_err(ApiError::discord_error)?;

    let balance = state.ledger().get_or_init_balance(&profile.id).await?;

    let user = SessionUser {
        id: profile.id.clone(),
        username: profile.display_name(),
        avatar_url: profile.avatar_url(),
        balance,
    };

    session
        .insert(SESSION_USER_KEY, &user)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    state
        .ledger()
        .record_login(
            &profile.id,
            LoginEntry {
                date: Utc::now(),
                user_agent,
            },
        )
        .await?;

    tracing::info!("User {} logged in via Discord", profile.id);

    Ok(Redirect::to("/"))
}

/// GET /api/me
/// Re-reads the ledger balance so out-of-band credits show up without a
/// fresh login.
pub async fn me(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let user: Option<SessionUser> = session
        .get(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let Some(mut user) = user else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(MeResponse {
                logged_in: false,
                user: None,
            }),
        ));
    };

    user.balance = state.ledger().balance(&user.id).await?;

    session
        .insert(SESSION_USER_KEY, &user)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    Ok((
        StatusCode::OK,
        Json(MeResponse {
            logged_in: true,
            user: Some(user),
        }),
    ))
}

/// POST /api/logout
/// Destroys the session; succeeds whether or not anyone was logged in.
pub async fn logout(session: Session) -> Json<LogoutResponse> {
    let _ = session.flush().await;
    Json(LogoutResponse { ok: true })
}

/// Get the session user, returns 401 if not authenticated.
pub(super) async fn require_user(session: &Session) -> Result<SessionUser, ApiError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(ApiError::unauthorized)
}

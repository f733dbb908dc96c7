use serde::{Deserialize, Serialize};

use crate::ledger::LoginEntry;

/// Generic error envelope: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Authenticated user record cached in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub avatar_url: String,
    pub balance: f64,
}

/// Response of `GET /api/me`. Unauthenticated callers get
/// `{"loggedIn": false}` with a 401 rather than an error envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub amount: f64,
    pub qr_code: String,
    pub qr_code_base64: String,
}

#[derive(Debug, Serialize)]
pub struct SecurityInfoResponse {
    pub code: String,
    pub logins: Vec<LoginEntry>,
}

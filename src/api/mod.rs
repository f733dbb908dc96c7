use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use time;

use crate::clients::discord::DiscordClient;
use crate::clients::mercadopago::MercadoPagoClient;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::state::SharedState;

pub mod auth;
mod deposit;
mod error;
mod observability;
mod pages;
mod security;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.shared.ledger
    }

    #[must_use]
    pub fn discord(&self) -> &Arc<DiscordClient> {
        &self.shared.discord
    }

    #[must_use]
    pub fn mercado_pago(&self) -> Option<&Arc<MercadoPagoClient>> {
        self.shared.mercado_pago.as_ref()
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    config.validate()?;
    let shared = Arc::new(SharedState::new(config)?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    // Secret length is enforced by Config::validate before we get here.
    let session_key = Key::from(state.config().session.secret.as_bytes());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        // Known production gap: cookies are not marked Secure.
        .with_secure(false)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)))
        .with_signed(session_key);

    let api_router = Router::new()
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/deposit/create", post(deposit::create_deposit))
        .route("/security/info", get(security::security_info))
        .route("/metrics", get(observability::get_metrics));

    Router::new()
        .route("/", get(pages::index))
        .route("/seguranca", get(pages::security_page))
        .route("/saldo/historico", get(pages::balance_history_page))
        .route("/auth/discord", get(auth::discord_login))
        .route("/auth/discord/callback", get(auth::discord_callback))
        .nest("/api", api_router)
        .nest_service("/static", tower_http::services::ServeDir::new("public"))
        .fallback(pages::not_found)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
}

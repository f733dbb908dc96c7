//! Data-access abstraction over the per-user keyed stores.
//!
//! Route handlers only talk to the [`Ledger`] trait, so the in-memory
//! implementation can be swapped for a persistent backend without touching
//! any HTTP logic.

mod memory;

pub use memory::MemoryLedger;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of login-history entries retained per user.
pub const LOGIN_HISTORY_CAP: usize = 20;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A single successful login, newest entries first in history queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEntry {
    pub date: DateTime<Utc>,

    pub user_agent: String,
}

/// Keyed per-user stores: balance, security code, and login history.
///
/// The three maps are independent; there are no cross-consistency
/// guarantees between them. Lazy initialization may race between
/// concurrent first requests for the same user, which is harmless because
/// the initial values are idempotent (zero balance, any freshly minted
/// code is acceptable).
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Get the user's balance, initializing it to 0 on first sight.
    async fn get_or_init_balance(&self, user_id: &str) -> Result<f64, LedgerError>;

    /// Get the user's current balance without initializing it.
    async fn balance(&self, user_id: &str) -> Result<f64, LedgerError>;

    /// Get the user's security code, minting one on first access.
    /// Once minted the code never changes for that user id.
    async fn get_or_create_security_code(&self, user_id: &str) -> Result<String, LedgerError>;

    /// Prepend a login entry, truncating history to [`LOGIN_HISTORY_CAP`].
    async fn record_login(&self, user_id: &str, entry: LoginEntry) -> Result<(), LedgerError>;

    /// Login history for the user, newest first, at most
    /// [`LOGIN_HISTORY_CAP`] entries.
    async fn login_history(&self, user_id: &str) -> Result<Vec<LoginEntry>, LedgerError>;
}

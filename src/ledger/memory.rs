use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LOGIN_HISTORY_CAP, Ledger, LedgerError, LoginEntry};

/// Process-memory ledger. Everything here is volatile: a restart discards
/// every balance, security code, and login history.
#[derive(Default)]
pub struct MemoryLedger {
    balances: RwLock<HashMap<String, f64>>,
    security_codes: RwLock<HashMap<String, String>>,
    logins: RwLock<HashMap<String, Vec<LoginEntry>>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Generate a security code of the form `SEG-` + 8 uppercase hex chars.
/// `ThreadRng` is a CSPRNG, which is all the "security" this code carries.
fn generate_security_code() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let value: u32 = rng.random();
    format!("SEG-{value:08X}")
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_or_init_balance(&self, user_id: &str) -> Result<f64, LedgerError> {
        let mut balances = self.balances.write().await;
        Ok(*balances.entry(user_id.to_string()).or_insert(0.0))
    }

    async fn balance(&self, user_id: &str) -> Result<f64, LedgerError> {
        let balances = self.balances.read().await;
        Ok(balances.get(user_id).copied().unwrap_or(0.0))
    }

    async fn get_or_create_security_code(&self, user_id: &str) -> Result<String, LedgerError> {
        let mut codes = self.security_codes.write().await;
        Ok(codes
            .entry(user_id.to_string())
            .or_insert_with(generate_security_code)
            .clone())
    }

    async fn record_login(&self, user_id: &str, entry: LoginEntry) -> Result<(), LedgerError> {
        let mut logins = self.logins.write().await;
        let history = logins.entry(user_id.to_string()).or_default();
        history.insert(0, entry);
        history.truncate(LOGIN_HISTORY_CAP);
        Ok(())
    }

    async fn login_history(&self, user_id: &str) -> Result<Vec<LoginEntry>, LedgerError> {
        let logins = self.logins.read().await;
        Ok(logins.get(user_id).cloned().unwrap_or_default())
    }
}

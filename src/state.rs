use std::sync::Arc;

use tracing::warn;

use crate::clients::discord::DiscordClient;
use crate::clients::mercadopago::MercadoPagoClient;
use crate::config::Config;
use crate::ledger::{Ledger, MemoryLedger};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Both outbound clients reuse it to enable connection pooling.
fn build_shared_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("PixWallet/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub ledger: Arc<dyn Ledger>,

    pub discord: Arc<DiscordClient>,

    /// `None` when no Mercado Pago credential is configured.
    pub mercado_pago: Option<Arc<MercadoPagoClient>>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client()?;

        let discord = Arc::new(DiscordClient::with_shared_client(
            http_client.clone(),
            config.discord.clone(),
        ));

        let mercado_pago =
            MercadoPagoClient::with_shared_client(http_client, &config.mercado_pago).map(Arc::new);
        if mercado_pago.is_none() {
            warn!("Mercado Pago access token not configured; POST /api/deposit/create will fail");
        }

        Ok(Self {
            config,
            ledger: Arc::new(MemoryLedger::new()),
            discord,
            mercado_pago,
        })
    }
}

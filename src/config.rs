use anyhow::{Context, Result};

const DISCORD_API_BASE: &str = "https://discord.com/api";
const MERCADO_PAGO_API_BASE: &str = "https://api.mercadopago.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,

    pub session: SessionConfig,

    pub discord: DiscordConfig,

    pub mercado_pago: MercadoPagoConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie. Must be at least 64 bytes.
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub client_id: String,

    pub client_secret: String,

    pub redirect_uri: String,

    /// Overridable so tests can point the client at a local mock.
    pub api_base: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            api_base: DISCORD_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    /// When absent, deposit creation is disabled at startup with a warning.
    pub access_token: Option<String>,

    pub api_base: String,
}

impl Default for MercadoPagoConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base: MERCADO_PAGO_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            discord: DiscordConfig::default(),
            mercado_pago: MercadoPagoConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Required secrets are fatal when missing; the Mercado Pago token is
    /// optional and only degrades deposit creation.
    pub fn from_env() -> Result<Self> {
        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => ServerConfig::default().port,
        };

        let log_level =
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| ServerConfig::default().log_level);

        let secret =
            std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;

        let client_id =
            std::env::var("DISCORD_CLIENT_ID").context("DISCORD_CLIENT_ID must be set")?;
        let client_secret =
            std::env::var("DISCORD_CLIENT_SECRET").context("DISCORD_CLIENT_SECRET must be set")?;
        let redirect_uri = std::env::var("DISCORD_REDIRECT_URI")
            .unwrap_or_else(|_| format!("http://localhost:{port}/auth/discord/callback"));

        // Optional: its absence is reported by SharedState with a warning
        // once the tracing subscriber is up.
        let access_token = std::env::var("MP_ACCESS_TOKEN").ok();

        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let config = Self {
            server: ServerConfig { port, log_level },
            session: SessionConfig { secret },
            discord: DiscordConfig {
                client_id,
                client_secret,
                redirect_uri,
                api_base: DISCORD_API_BASE.to_string(),
            },
            mercado_pago: MercadoPagoConfig {
                access_token,
                api_base: MERCADO_PAGO_API_BASE.to_string(),
            },
            observability: ObservabilityConfig { metrics_enabled },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.secret.len() < 64 {
            anyhow::bail!("SESSION_SECRET must be at least 64 bytes");
        }

        if self.discord.client_id.is_empty() {
            anyhow::bail!("Discord client id cannot be empty");
        }

        if self.discord.client_secret.is_empty() {
            anyhow::bail!("Discord client secret cannot be empty");
        }

        Ok(())
    }
}

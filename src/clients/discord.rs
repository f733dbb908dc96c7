use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::config::DiscordConfig;

const DISCORD_CDN: &str = "https://cdn.discordapp.com";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
}

impl DiscordUser {
    /// Display name from the username/discriminator pair. Accounts migrated
    /// to Discord's unique-username system carry discriminator "0".
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.discriminator.as_deref() {
            Some(discriminator) if discriminator != "0" => {
                format!("{}#{}", self.username, discriminator)
            }
            _ => self.username.clone(),
        }
    }

    /// CDN avatar URL. Animated avatar hashes carry an `a_` prefix and are
    /// served as GIF; users without an avatar get a default embed avatar
    /// derived from the discriminator.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "png" };
                format!("{DISCORD_CDN}/avatars/{}/{hash}.{ext}", self.id)
            }
            None => {
                let index = self
                    .discriminator
                    .as_deref()
                    .and_then(|d| d.parse::<u32>().ok())
                    .map_or(0, |d| d % 5);
                format!("{DISCORD_CDN}/embed/avatars/{index}.png")
            }
        }
    }
}

#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    config: DiscordConfig,
}

impl DiscordClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: DiscordConfig) -> Self {
        Self { client, config }
    }

    /// Authorization endpoint URL carrying the given one-time `state` nonce.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/oauth2/authorize?client_id={}&redirect_uri={}&response_type=code&scope=identify&state={}",
            self.config.api_base,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(state),
        )
    }

    /// Server-to-server authorization_code grant.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let url = format!("{}/oauth2/token", self.config.api_base);
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Discord token exchange failed: {} - {}",
                status,
                body
            ));
        }

        Ok(response.json().await?)
    }

    /// Fetch the authenticated user's profile with the bearer token.
    pub async fn fetch_user(&self, access_token: &str) -> Result<DiscordUser> {
        let url = format!("{}/users/@me", self.config.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Discord profile fetch failed: {} - {}",
                status,
                body
            ));
        }

        Ok(response.json().await?)
    }
}

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::types::{Guild, GuildChannel, GuildMember, Role};

/// Page size for member-list fetches; the platform caps the limit at 1000.
const MEMBER_PAGE_SIZE: usize = 1000;

/// Read-only fetch capabilities against the remote platform.
///
/// Handlers depend on this trait rather than on the concrete client so tests
/// can substitute a double. Every method is a single fallible remote call (or
/// a paginated sequence of them); failures are indiscriminate — not-found,
/// permission-denied, and transport errors all surface as one error whose
/// message text reaches the API response.
#[async_trait]
pub trait GuildFetcher: Send + Sync {
    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild>;
    async fn fetch_members(&self, guild_id: &str) -> Result<Vec<GuildMember>>;
    async fn fetch_roles(&self, guild_id: &str) -> Result<Vec<Role>>;
    async fn fetch_channels(&self, guild_id: &str) -> Result<Vec<GuildChannel>>;
}

/// The process-wide Discord REST session: one HTTP client plus the bot
/// credential, held for the process lifetime. No retries, no caching —
/// every fetch goes to the remote API.
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

#[derive(Deserialize)]
struct CurrentUser {
    id: String,
    username: String,
}

impl DiscordClient {
    /// Open the bot session: build the HTTP client and validate the credential
    /// with `GET /users/@me`. Fails fast on a bad or revoked token.
    pub async fn login(token: &str, api_base: &str) -> Result<Self> {
        let client = Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        };

        let me: CurrentUser = client
            .get_json("/users/@me")
            .await
            .context("Failed to authenticate with the Discord API")?;
        info!(bot_id = %me.id, username = %me.username, "Discord client ready");

        Ok(client)
    }

    /// Issue an authenticated GET and decode the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.api_base, path_and_query);

        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .send()
            .await
            .with_context(|| format!("HTTP request to Discord API {} failed", path_and_query))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Discord API {} returned {}: {}",
                path_and_query,
                status,
                body_text
            ));
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("Failed to decode Discord response from {}", path_and_query))
    }
}

#[async_trait]
impl GuildFetcher for DiscordClient {
    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild> {
        // with_counts=true populates approximate_member_count on the guild.
        self.get_json(&format!("/guilds/{}?with_counts=true", guild_id))
            .await
    }

    async fn fetch_members(&self, guild_id: &str) -> Result<Vec<GuildMember>> {
        let mut members: Vec<GuildMember> = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let path = match &after {
                Some(last_id) => format!(
                    "/guilds/{}/members?limit={}&after={}",
                    guild_id, MEMBER_PAGE_SIZE, last_id
                ),
                None => format!("/guilds/{}/members?limit={}", guild_id, MEMBER_PAGE_SIZE),
            };

            let page: Vec<GuildMember> = self.get_json(&path).await?;
            let full_page = page.len() == MEMBER_PAGE_SIZE;
            after = page.last().map(|m| m.user.id.clone());
            members.extend(page);

            if !full_page {
                break;
            }
        }

        Ok(members)
    }

    async fn fetch_roles(&self, guild_id: &str) -> Result<Vec<Role>> {
        self.get_json(&format!("/guilds/{}/roles", guild_id)).await
    }

    async fn fetch_channels(&self, guild_id: &str) -> Result<Vec<GuildChannel>> {
        self.get_json(&format!("/guilds/{}/channels", guild_id))
            .await
    }
}

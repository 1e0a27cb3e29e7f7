use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::discord::client::GuildFetcher;
use crate::discord::types::{ChannelType, EVERYONE_ROLE};

use super::app_state::AppState;

/// JSON error body shared by all failure responses.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

// ── POST /server ─────────────────────────────────────────────

/// Request fields are Options so a missing identifier yields the documented
/// 403 body instead of a deserialization rejection.
#[derive(Deserialize)]
pub struct ServerQuery {
    pub id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSummary {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub member_count: u64,
    pub bot_count: usize,
    pub role_count: usize,
    pub channel_count: usize,
}

/// POST /server — summarize one guild: name, icon, and member/bot/role/channel
/// counts. Three collection fetches on top of the guild fetch, every request;
/// cost scales with guild size (no caching by design, see DESIGN.md).
pub async fn query_server(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ServerQuery>,
) -> Response {
    let Some(id) = body.id else {
        return error_response(StatusCode::FORBIDDEN, "No ID found!");
    };

    match build_server_summary(state.fetcher.as_ref(), &id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!(error = %e, guild_id = %id, "Failed to summarize server");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// A failure in any sub-fetch fails the whole summary; no partial results.
async fn build_server_summary(
    fetcher: &dyn GuildFetcher,
    id: &str,
) -> anyhow::Result<ServerSummary> {
    let guild = fetcher.fetch_guild(id).await?;
    let members = fetcher.fetch_members(id).await?;
    let bot_count = members.iter().filter(|m| m.user.bot).count();
    let role_count = fetcher.fetch_roles(id).await?.len();
    let channel_count = fetcher.fetch_channels(id).await?.len();

    Ok(ServerSummary {
        id: id.to_string(),
        icon_url: guild.icon_url(),
        name: guild.name,
        member_count: guild.approximate_member_count,
        bot_count,
        role_count,
        channel_count,
    })
}

// ── POST /channels ───────────────────────────────────────────

/// `channel_type` stays a raw JSON value so a non-numeric or out-of-range
/// code reaches the 403 path below instead of an extractor rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsQuery {
    pub guild_id: Option<String>,
    pub channel_type: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Serialize)]
pub struct ChannelsResponse {
    pub id: String,
    pub channels: Vec<ChannelSummary>,
}

/// POST /channels — list a guild's channels of one type. An unrecognized type
/// code is rejected the same way as an absent one.
pub async fn query_channels(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChannelsQuery>,
) -> Response {
    let Some(guild_id) = body.guild_id else {
        return error_response(StatusCode::FORBIDDEN, "No ID found!");
    };
    let Some(requested) = body
        .channel_type
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|code| u8::try_from(code).ok())
        .and_then(ChannelType::from_code)
    else {
        return error_response(StatusCode::FORBIDDEN, "No channel type found!");
    };

    match list_matching_channels(state.fetcher.as_ref(), &guild_id, requested).await {
        Ok(channels) => (
            StatusCode::OK,
            Json(ChannelsResponse {
                id: guild_id,
                channels,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, guild_id = %guild_id, "Failed to list channels");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn list_matching_channels(
    fetcher: &dyn GuildFetcher,
    guild_id: &str,
    requested: ChannelType,
) -> anyhow::Result<Vec<ChannelSummary>> {
    // Guild fetch first so an unknown guild fails before the channel listing.
    fetcher.fetch_guild(guild_id).await?;

    let channels = fetcher
        .fetch_channels(guild_id)
        .await?
        .into_iter()
        .filter(|c| c.kind == requested.code())
        .map(|c| ChannelSummary {
            id: c.id,
            name: c.name,
            kind: c.kind,
        })
        .collect();

    Ok(channels)
}

// ── POST /roles ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolesQuery {
    pub guild_id: Option<String>,
}

#[derive(Serialize)]
pub struct RoleSummary {
    pub id: String,
    pub name: String,
    pub color: u32,
}

#[derive(Serialize)]
pub struct RolesResponse {
    pub id: String,
    pub roles: Vec<RoleSummary>,
}

/// POST /roles — list a guild's assignable roles, excluding integration-managed
/// roles and the default everyone-role.
pub async fn query_roles(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RolesQuery>,
) -> Response {
    let Some(guild_id) = body.guild_id else {
        return error_response(StatusCode::FORBIDDEN, "No ID found!");
    };

    match list_assignable_roles(state.fetcher.as_ref(), &guild_id).await {
        Ok(roles) => (
            StatusCode::OK,
            Json(RolesResponse {
                id: guild_id,
                roles,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, guild_id = %guild_id, "Failed to list roles");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn list_assignable_roles(
    fetcher: &dyn GuildFetcher,
    guild_id: &str,
) -> anyhow::Result<Vec<RoleSummary>> {
    fetcher.fetch_guild(guild_id).await?;

    let roles = fetcher
        .fetch_roles(guild_id)
        .await?
        .into_iter()
        .filter(|r| !r.managed && r.name != EVERYONE_ROLE)
        .map(|r| RoleSummary {
            id: r.id,
            name: r.name,
            color: r.color,
        })
        .collect();

    Ok(roles)
}

use serde::Deserialize;

/// Base URL for guild icon assets on the Discord CDN.
const CDN_BASE: &str = "https://cdn.discordapp.com";

/// A guild as returned by `GET /guilds/{id}`.
///
/// `approximate_member_count` is only populated when the fetch is issued with
/// `with_counts=true`, which the client always does.
#[derive(Debug, Clone, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    /// Icon asset hash; `None` when the guild has no icon set.
    pub icon: Option<String>,
    #[serde(default)]
    pub approximate_member_count: u64,
}

impl Guild {
    /// CDN URL for the guild icon, or `None` when no icon is set.
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|hash| format!("{}/icons/{}/{}.png", CDN_BASE, self.id, hash))
    }
}

/// A guild member row from `GET /guilds/{id}/members`.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildMember {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    /// Set when the account is a bot application rather than a person.
    #[serde(default)]
    pub bot: bool,
}

/// A role row from `GET /guilds/{id}/roles`.
#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    /// Display color as a packed 0xRRGGBB integer; 0 means "no color".
    pub color: u32,
    /// True for roles owned by an integration; these are not manually
    /// assignable and are excluded from role listings.
    #[serde(default)]
    pub managed: bool,
}

/// Name of the default role every guild carries. Excluded from role listings.
pub const EVERYONE_ROLE: &str = "@everyone";

/// A channel row from `GET /guilds/{id}/channels`.
///
/// `kind` is kept as the raw numeric code so channels of types outside the
/// queryable set still decode.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildChannel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

/// Channel types accepted as a `/channels` query input.
///
/// Platform nomenclature:
/// - text: 0
/// - voice: 2
/// - category: 4
/// - announcement: 5
/// - stage: 13
/// - forum: 15
///
/// Thread channels (public: 12, private: 11) exist on the platform but are
/// not queryable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Text,
    Voice,
    Category,
    Announcement,
    Stage,
    Forum,
}

impl ChannelType {
    /// Map a numeric code to a queryable channel type.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Text),
            2 => Some(Self::Voice),
            4 => Some(Self::Category),
            5 => Some(Self::Announcement),
            13 => Some(Self::Stage),
            15 => Some(Self::Forum),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Voice => 2,
            Self::Category => 4,
            Self::Announcement => 5,
            Self::Stage => 13,
            Self::Forum => 15,
        }
    }
}

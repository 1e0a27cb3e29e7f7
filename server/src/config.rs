use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Top-level bridge configuration, loaded from guildgate.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    pub server: ServerSection,
    pub discord: DiscordSection,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct DiscordSection {
    /// Bot token sent in the Authorization header. Required; startup fails
    /// without one.
    pub token: String,
    /// Base URL of the Discord REST API. Overridable for tests.
    pub api_base: String,
}

impl Default for DiscordSection {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: "https://discord.com/api/v10".into(),
        }
    }
}

impl BridgeConfig {
    /// Load config from a TOML file. Falls back to defaults if the file doesn't exist.
    /// Environment variables override TOML values.
    pub fn load(path: &str) -> Self {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read config file {}: {}", path, e));
            toml::from_str(&contents)
                .unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup. Split out from the process
    /// environment so tests can inject values.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Some(v) = lookup("PORT")
            && let Ok(port) = v.parse()
        {
            self.server.port = port;
        }
        if let Some(v) = lookup("TOKEN") {
            self.discord.token = v;
        }
        if let Some(v) = lookup("DISCORD_API_BASE") {
            self.discord.api_base = v;
        }
    }

    /// Socket address string the web listener binds to.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = BridgeConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.discord.token.is_empty());
        assert_eq!(config.discord.api_base, "https://discord.com/api/v10");
        assert_eq!(config.listen_address(), "0.0.0.0:3000");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [discord]
            token = "bot-token"

            [server]
            port = 8081
            "#,
        )
        .unwrap();
        assert_eq!(config.discord.token, "bot-token");
        assert_eq!(config.discord.api_base, "https://discord.com/api/v10");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.bind_address, "0.0.0.0");
    }

    #[test]
    fn env_overrides_win_over_toml_values() {
        let mut config: BridgeConfig = toml::from_str(
            r#"
            [server]
            bind_address = "10.0.0.1"
            port = 8081

            [discord]
            token = "from-toml"
            api_base = "https://toml.example/api"
            "#,
        )
        .unwrap();

        config.apply_overrides_from(|name| match name {
            "BIND_ADDRESS" => Some("127.0.0.1".into()),
            "PORT" => Some("9090".into()),
            "TOKEN" => Some("from-env".into()),
            "DISCORD_API_BASE" => Some("http://localhost:4010".into()),
            _ => None,
        });

        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.discord.token, "from-env");
        assert_eq!(config.discord.api_base, "http://localhost:4010");
    }

    #[test]
    fn unset_variables_leave_toml_values_alone() {
        let mut config: BridgeConfig = toml::from_str(
            r#"
            [discord]
            token = "from-toml"
            "#,
        )
        .unwrap();

        config.apply_overrides_from(|_| None);
        assert_eq!(config.discord.token, "from-toml");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn non_numeric_port_override_is_ignored() {
        let mut config = BridgeConfig::default();
        config.apply_overrides_from(|name| (name == "PORT").then(|| "not-a-port".into()));
        assert_eq!(config.server.port, 3000);
    }
}

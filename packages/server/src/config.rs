//! Server configuration from environment variables.

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Origins allowed to make cross-origin requests. Empty allows any
    /// origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, and `ALLOWED_ORIGINS` (comma-separated),
    /// falling back to defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("BIND_ADDR").ok(),
            std::env::var("PORT").ok(),
            std::env::var("ALLOWED_ORIGINS").ok(),
        )
    }

    fn from_vars(
        bind_addr: Option<String>,
        port: Option<String>,
        allowed_origins: Option<String>,
    ) -> Self {
        let port = match port {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{p}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            bind_addr: bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            allowed_origins: allowed_origins
                .as_deref()
                .map(parse_origins)
                .unwrap_or_default(),
        }
    }
}

fn parse_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ServerConfig::from_vars(None, None, None), ServerConfig::default());
    }

    #[test]
    fn reads_values() {
        let config = ServerConfig::from_vars(
            Some("0.0.0.0".to_string()),
            Some("3000".to_string()),
            Some("https://a.example, ,https://b.example ".to_string()),
        );
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = ServerConfig::from_vars(None, Some("http".to_string()), None);
        assert_eq!(config.port, DEFAULT_PORT);
    }
}

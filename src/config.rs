//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries each cache can hold
    pub cache_capacity: usize,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// TTL in seconds for single user records
    pub user_ttl: u64,
    /// TTL in seconds for single session records
    pub session_ttl: u64,
    /// TTL in seconds for pages of a user's sessions (plain and search)
    pub session_list_ttl: u64,
    /// TTL in seconds for pages of a session's messages
    pub message_list_ttl: u64,
    /// Page size used when a list request gives none
    pub default_page_limit: usize,
    /// Largest page size a list request may ask for
    pub max_page_limit: usize,
}

/// TTL chosen per query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub user: Duration,
    pub session: Duration,
    pub session_list: Duration,
    pub message_list: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_CAPACITY` - Entries per cache (default: 1000)
    /// - `SWEEP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 300)
    /// - `USER_TTL` - User record TTL in seconds (default: 300)
    /// - `SESSION_TTL` - Session record TTL in seconds (default: 60)
    /// - `SESSION_LIST_TTL` - Session page TTL in seconds (default: 30)
    /// - `MESSAGE_LIST_TTL` - Message page TTL in seconds (default: 30)
    /// - `DEFAULT_PAGE_LIMIT` - Page size when none is given (default: 20)
    /// - `MAX_PAGE_LIMIT` - Upper bound on page size (default: 50)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_capacity: env_or("CACHE_CAPACITY", defaults.cache_capacity),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            user_ttl: env_or("USER_TTL", defaults.user_ttl),
            session_ttl: env_or("SESSION_TTL", defaults.session_ttl),
            session_list_ttl: env_or("SESSION_LIST_TTL", defaults.session_list_ttl),
            message_list_ttl: env_or("MESSAGE_LIST_TTL", defaults.message_list_ttl),
            default_page_limit: env_or("DEFAULT_PAGE_LIMIT", defaults.default_page_limit),
            max_page_limit: env_or("MAX_PAGE_LIMIT", defaults.max_page_limit),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            user: Duration::from_secs(self.user_ttl),
            session: Duration::from_secs(self.session_ttl),
            session_list: Duration::from_secs(self.session_list_ttl),
            message_list: Duration::from_secs(self.message_list_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_capacity: 1000,
            sweep_interval: 300,
            user_ttl: 300,
            session_ttl: 60,
            session_list_ttl: 30,
            message_list_ttl: 30,
            default_page_limit: 20,
            max_page_limit: 50,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
        assert_eq!(config.default_page_limit, 20);
        assert_eq!(config.max_page_limit, 50);
    }

    #[test]
    fn test_ttls_per_query_shape() {
        let ttls = Config::default().ttls();
        assert_eq!(ttls.user, Duration::from_secs(300));
        assert_eq!(ttls.session, Duration::from_secs(60));
        assert_eq!(ttls.session_list, Duration::from_secs(30));
        assert_eq!(ttls.message_list, Duration::from_secs(30));
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("CHAT_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("CHAT_CACHE_TEST_GARBAGE", 7u64), 7);

        env::set_var("CHAT_CACHE_TEST_VALUE", "42");
        assert_eq!(env_or("CHAT_CACHE_TEST_VALUE", 7u64), 42);

        assert_eq!(env_or("CHAT_CACHE_TEST_UNSET", 9usize), 9);
    }
}

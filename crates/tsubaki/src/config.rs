//! Environment-based configuration loading.
//!
//! Channel credentials come from `LINE_`-prefixed environment variables,
//! layered over the schema defaults:
//!
//! - `LINE_CHANNEL_ID` → `channel_id`
//! - `LINE_CHANNEL_SECRET` → `channel_secret`
//! - `LINE_CHANNEL_ACCESS_TOKEN` → `channel_access_token`
//! - `LINE_VERIFY` → `verify`
//! - `LINE_API_BASE` → `api_base`
//!
//! A missing secret or token is not an error at load time; operations that
//! need one enforce it at the point of use.

use figment::Figment;
use figment::providers::{Env, Serialized};
use thiserror::Error;

use tsubaki_core::ChannelConfig;

/// Prefix of the environment variables [`load_config`] reads.
pub const ENV_PREFIX: &str = "LINE_";

/// Errors loading the channel configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value had the wrong shape.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Loads the channel configuration from the environment.
pub fn load_config() -> Result<ChannelConfig, ConfigError> {
    Figment::from(Serialized::defaults(ChannelConfig::default()))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))
}

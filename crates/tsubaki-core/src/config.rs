//! Channel configuration schema.

use serde::{Deserialize, Serialize};

/// Credentials and switches for one messaging channel.
///
/// Every field has a default, so a config can be built up from partial
/// sources. A missing secret or token is allowed here; operations that
/// need one enforce its presence at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Numeric channel ID. Informational; no operation requires it.
    #[serde(default)]
    pub channel_id: Option<i64>,

    /// Shared secret used to sign and verify webhook bodies.
    #[serde(default)]
    pub channel_secret: Option<String>,

    /// Bearer token for outbound API calls.
    #[serde(default)]
    pub channel_access_token: Option<String>,

    /// Whether inbound requests must carry a valid signature.
    #[serde(default = "default_verify")]
    pub verify: bool,

    /// Base URL for the messaging API, without a trailing slash.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            channel_secret: None,
            channel_access_token: None,
            verify: default_verify(),
            api_base: default_api_base(),
        }
    }
}

fn default_verify() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.line.me/v2/bot".to_string()
}

use serde::{Deserialize, Serialize};

/// Request-time settings that shape the install plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    /// Download from a peer on the local network when one has the payload
    pub use_p2p_for_downloading: bool,
    /// Peer URL, empty when no peer was found
    pub p2p_url: String,
    /// The target channel is more stable than the current one
    pub to_more_stable_channel: bool,
    pub is_powerwash_allowed: bool,
}

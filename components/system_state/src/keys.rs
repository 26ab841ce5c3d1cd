//! Pref keys shared by the update stages

pub const UPDATE_CHECK_RESPONSE_HASH: &str = "update-check-response-hash";
pub const UPDATE_STATE_NEXT_OPERATION: &str = "update-state-next-operation";
pub const UPDATE_STATE_NEXT_DATA_OFFSET: &str = "update-state-next-data-offset";
pub const UPDATE_STATE_NEXT_DATA_LENGTH: &str = "update-state-next-data-length";
pub const UPDATE_STATE_SHA256_CONTEXT: &str = "update-state-sha-256-context";
pub const UPDATE_STATE_SIGNED_SHA256_CONTEXT: &str = "update-state-signed-sha-256-context";
pub const UPDATE_STATE_SIGNATURE_BLOB: &str = "update-state-signature-blob";
pub const MANIFEST_METADATA_SIZE: &str = "manifest-metadata-size";
pub const RESUMED_UPDATE_FAILURES: &str = "resumed-update-failures";

pub const ROLLBACK_VERSION: &str = "rollback-version";
pub const CURRENT_URL_INDEX: &str = "current-url-index";
/// URL list of the response the URL index refers to
pub const RESPONSE_URLS: &str = "current-response-urls";
pub const USING_P2P_FOR_DOWNLOADING: &str = "using-p2p-for-downloading";
pub const NUM_RESUMED_UPDATES: &str = "num-resumed-updates";

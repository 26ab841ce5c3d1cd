//! Per-payload download state: which URL to use, rollback history, and
//! whether the current attempt resumed or restarted.

use crate::keys;
use crate::prefs::Prefs;
use parking_lot::Mutex;
use std::sync::Arc;
use update_types::OmahaResponse;

pub trait PayloadState: Send + Sync {
    /// Version the device rolled back from, empty if none
    fn rollback_version(&self) -> String;

    /// URL the next download should use, empty if none is usable
    fn current_url(&self) -> String;

    fn set_using_p2p_for_downloading(&self, value: bool);

    fn using_p2p_for_downloading(&self) -> bool;

    /// The coming download continues an interrupted one
    fn update_resumed(&self);

    /// The coming download starts from scratch
    fn update_restarted(&self);
}

/// Payload state persisted in prefs
///
/// The candidate URLs come from the latest response; the index of the URL
/// in use survives restarts so a failing mirror is not retried first.
pub struct PrefsPayloadState {
    prefs: Arc<dyn Prefs>,
    candidate_urls: Mutex<Vec<String>>,
}

impl PrefsPayloadState {
    pub fn new(prefs: Arc<dyn Prefs>) -> Self {
        Self {
            prefs,
            candidate_urls: Mutex::new(Vec::new()),
        }
    }

    /// Record the URLs offered by a new response
    ///
    /// The persisted URL index only carries over while the server keeps
    /// offering the same URL list.
    pub fn set_response(&self, response: &OmahaResponse) {
        tracing::info!(
            "Payload state tracking {} candidate URL(s)",
            response.payload_urls.len()
        );
        let signature = response.payload_urls.join("\n");
        if self.prefs.get_string(keys::RESPONSE_URLS).as_deref() != Some(signature.as_str()) {
            tracing::info!("Response URLs changed, starting from the first URL");
            self.persist(keys::CURRENT_URL_INDEX, 0);
            if let Err(e) = self.prefs.set_string(keys::RESPONSE_URLS, &signature) {
                tracing::warn!("Unable to persist {}: {}", keys::RESPONSE_URLS, e);
            }
        }
        *self.candidate_urls.lock() = response.payload_urls.clone();
    }

    fn current_url_index(&self) -> usize {
        self.prefs
            .get_i64(keys::CURRENT_URL_INDEX)
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(0)
    }

    fn persist(&self, key: &str, value: i64) {
        if let Err(e) = self.prefs.set_i64(key, value) {
            tracing::warn!("Unable to persist {}: {}", key, e);
        }
    }
}

impl PayloadState for PrefsPayloadState {
    fn rollback_version(&self) -> String {
        self.prefs
            .get_string(keys::ROLLBACK_VERSION)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn current_url(&self) -> String {
        let urls = self.candidate_urls.lock();
        let index = self.current_url_index();
        match urls.get(index) {
            Some(url) => url.clone(),
            None => {
                if index != 0 {
                    tracing::warn!(
                        "URL index {} out of range for {} URL(s), using first",
                        index,
                        urls.len()
                    );
                }
                urls.first().cloned().unwrap_or_default()
            }
        }
    }

    fn set_using_p2p_for_downloading(&self, value: bool) {
        self.persist(keys::USING_P2P_FOR_DOWNLOADING, i64::from(value));
    }

    fn using_p2p_for_downloading(&self) -> bool {
        self.prefs
            .get_i64(keys::USING_P2P_FOR_DOWNLOADING)
            .is_some_and(|v| v != 0)
    }

    fn update_resumed(&self) {
        tracing::info!("Resuming an update that was previously started");
        let resumed = self.prefs.get_i64(keys::NUM_RESUMED_UPDATES).unwrap_or(0);
        self.persist(keys::NUM_RESUMED_UPDATES, resumed.saturating_add(1));
    }

    fn update_restarted(&self) {
        tracing::info!("Starting a new update");
        self.persist(keys::NUM_RESUMED_UPDATES, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;

    fn response_with(urls: &[&str]) -> OmahaResponse {
        OmahaResponse {
            update_exists: true,
            payload_urls: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Prefs as left by an earlier run that moved on to URL `index`
    fn seen_before(urls: &[&str], index: i64) -> Arc<MemoryPrefs> {
        let prefs = Arc::new(MemoryPrefs::new());
        PrefsPayloadState::new(prefs.clone()).set_response(&response_with(urls));
        prefs.set_i64(keys::CURRENT_URL_INDEX, index).unwrap();
        prefs
    }

    #[test]
    fn current_url_follows_persisted_index() {
        let prefs = seen_before(&["http://a", "https://b"], 1);
        let state = PrefsPayloadState::new(prefs.clone());
        state.set_response(&response_with(&["http://a", "https://b"]));

        assert_eq!(state.current_url(), "https://b");
        assert_eq!(prefs.get_i64(keys::CURRENT_URL_INDEX), Some(1));
    }

    #[test]
    fn new_url_list_resets_index() {
        let prefs = seen_before(&["http://a", "https://b"], 1);
        let state = PrefsPayloadState::new(prefs.clone());
        state.set_response(&response_with(&["https://c", "https://d"]));

        assert_eq!(state.current_url(), "https://c");
        assert_eq!(prefs.get_i64(keys::CURRENT_URL_INDEX), Some(0));
    }

    #[test]
    fn first_response_starts_at_first_url() {
        let prefs = Arc::new(MemoryPrefs::new());
        prefs.set_i64(keys::CURRENT_URL_INDEX, 1).unwrap();
        let state = PrefsPayloadState::new(prefs);
        state.set_response(&response_with(&["http://a", "https://b"]));

        assert_eq!(state.current_url(), "http://a");
    }

    #[test]
    fn out_of_range_index_falls_back_to_first() {
        let prefs = seen_before(&["https://a"], 7);
        let state = PrefsPayloadState::new(prefs);
        state.set_response(&response_with(&["https://a"]));

        assert_eq!(state.current_url(), "https://a");
    }

    #[test]
    fn no_urls_means_empty_current_url() {
        let state = PrefsPayloadState::new(Arc::new(MemoryPrefs::new()));
        assert_eq!(state.current_url(), "");
        state.set_response(&response_with(&[]));
        assert_eq!(state.current_url(), "");
    }

    #[test]
    fn rollback_version_comes_from_prefs() {
        let prefs = Arc::new(MemoryPrefs::new());
        let state = PrefsPayloadState::new(prefs.clone());
        assert_eq!(state.rollback_version(), "");

        prefs.set_string(keys::ROLLBACK_VERSION, "1.2.3\n").unwrap();
        assert_eq!(state.rollback_version(), "1.2.3");
    }

    #[test]
    fn resume_and_restart_bookkeeping() {
        let prefs = Arc::new(MemoryPrefs::new());
        let state = PrefsPayloadState::new(prefs.clone());

        state.update_resumed();
        state.update_resumed();
        assert_eq!(prefs.get_i64(keys::NUM_RESUMED_UPDATES), Some(2));

        prefs.set_i64(keys::CURRENT_URL_INDEX, 1).unwrap();
        state.update_restarted();
        assert_eq!(prefs.get_i64(keys::NUM_RESUMED_UPDATES), Some(0));
        // Restarting the download keeps the mirror it was planned against
        assert_eq!(prefs.get_i64(keys::CURRENT_URL_INDEX), Some(1));
    }

    #[test]
    fn resumed_counter_saturates() {
        let prefs = Arc::new(MemoryPrefs::new());
        prefs.set_i64(keys::NUM_RESUMED_UPDATES, i64::MAX).unwrap();
        let state = PrefsPayloadState::new(prefs.clone());

        state.update_resumed();
        assert_eq!(prefs.get_i64(keys::NUM_RESUMED_UPDATES), Some(i64::MAX));
    }

    #[test]
    fn p2p_flag_persists() {
        let prefs = Arc::new(MemoryPrefs::new());
        let state = PrefsPayloadState::new(prefs.clone());
        assert!(!state.using_p2p_for_downloading());

        state.set_using_p2p_for_downloading(true);
        assert!(state.using_p2p_for_downloading());
        assert_eq!(prefs.get_i64(keys::USING_P2P_FOR_DOWNLOADING), Some(1));
    }
}

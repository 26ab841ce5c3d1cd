//! Persisted download progress and the resume decision
//!
//! An interrupted update can be resumed only when the stored progress is
//! complete and belongs to the same payload (same response hash).

use crate::error::Result;
use crate::keys;
use crate::prefs::Prefs;

/// Next-operation value meaning "no operation in flight"
pub const OPERATION_INVALID: i64 = -1;

/// Give up resuming after this many failed resumes of the same payload
pub const MAX_RESUMED_UPDATE_FAILURES: i64 = 10;

/// Whether stored progress lets an update of `response_hash` resume
pub fn can_resume_update(prefs: &dyn Prefs, response_hash: &str) -> bool {
    let next_operation = prefs
        .get_i64(keys::UPDATE_STATE_NEXT_OPERATION)
        .unwrap_or(OPERATION_INVALID);
    if next_operation == OPERATION_INVALID || next_operation <= 0 {
        return false;
    }

    match prefs.get_string(keys::UPDATE_CHECK_RESPONSE_HASH) {
        Some(stored) if !stored.is_empty() && stored == response_hash => {}
        _ => return false,
    }

    if let Some(failures) = prefs.get_i64(keys::RESUMED_UPDATE_FAILURES) {
        if failures > MAX_RESUMED_UPDATE_FAILURES {
            tracing::info!(
                "Not resuming: {} resumed failures exceeds {}",
                failures,
                MAX_RESUMED_UPDATE_FAILURES
            );
            return false;
        }
    }

    // The rest must be intact for the downloader to pick up where it stopped
    if !prefs
        .get_i64(keys::UPDATE_STATE_NEXT_DATA_OFFSET)
        .is_some_and(|offset| offset >= 0)
    {
        return false;
    }

    if !prefs
        .get_string(keys::UPDATE_STATE_SHA256_CONTEXT)
        .is_some_and(|context| !context.is_empty())
    {
        return false;
    }

    prefs
        .get_i64(keys::MANIFEST_METADATA_SIZE)
        .is_some_and(|size| size > 0)
}

/// Forget stored progress
///
/// A quick reset only invalidates the next operation. A full reset also
/// clears the payload identity, offsets, hash contexts and failure count.
pub fn reset_update_progress(prefs: &dyn Prefs, quick: bool) -> Result<()> {
    prefs.set_i64(keys::UPDATE_STATE_NEXT_OPERATION, OPERATION_INVALID)?;
    if quick {
        return Ok(());
    }

    prefs.set_string(keys::UPDATE_CHECK_RESPONSE_HASH, "")?;
    prefs.set_i64(keys::UPDATE_STATE_NEXT_DATA_OFFSET, -1)?;
    prefs.set_i64(keys::UPDATE_STATE_NEXT_DATA_LENGTH, 0)?;
    prefs.set_string(keys::UPDATE_STATE_SHA256_CONTEXT, "")?;
    prefs.set_string(keys::UPDATE_STATE_SIGNED_SHA256_CONTEXT, "")?;
    prefs.set_string(keys::UPDATE_STATE_SIGNATURE_BLOB, "")?;
    prefs.set_i64(keys::MANIFEST_METADATA_SIZE, -1)?;
    prefs.set_i64(keys::RESUMED_UPDATE_FAILURES, 0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;
    use rstest::rstest;

    /// Prefs as left behind by an interrupted download of payload "abc"
    fn interrupted(hash: &str) -> MemoryPrefs {
        let prefs = MemoryPrefs::new();
        prefs.set_i64(keys::UPDATE_STATE_NEXT_OPERATION, 12).unwrap();
        prefs.set_string(keys::UPDATE_CHECK_RESPONSE_HASH, hash).unwrap();
        prefs.set_i64(keys::UPDATE_STATE_NEXT_DATA_OFFSET, 4096).unwrap();
        prefs.set_i64(keys::UPDATE_STATE_NEXT_DATA_LENGTH, 512).unwrap();
        prefs.set_string(keys::UPDATE_STATE_SHA256_CONTEXT, "ctx").unwrap();
        prefs.set_i64(keys::MANIFEST_METADATA_SIZE, 100).unwrap();
        prefs
    }

    #[test]
    fn resumes_same_payload() {
        assert!(can_resume_update(&interrupted("abc"), "abc"));
    }

    #[test]
    fn fresh_prefs_do_not_resume() {
        assert!(!can_resume_update(&MemoryPrefs::new(), "abc"));
    }

    #[test]
    fn different_payload_does_not_resume() {
        assert!(!can_resume_update(&interrupted("abc"), "def"));
    }

    #[test]
    fn empty_hash_never_resumes() {
        assert!(!can_resume_update(&interrupted(""), ""));
    }

    #[rstest]
    #[case(keys::UPDATE_STATE_NEXT_OPERATION, "-1")]
    #[case(keys::UPDATE_STATE_NEXT_OPERATION, "0")]
    #[case(keys::UPDATE_STATE_NEXT_DATA_OFFSET, "-1")]
    #[case(keys::UPDATE_STATE_SHA256_CONTEXT, "")]
    #[case(keys::MANIFEST_METADATA_SIZE, "0")]
    #[case(keys::RESUMED_UPDATE_FAILURES, "11")]
    fn incomplete_progress_does_not_resume(#[case] key: &str, #[case] value: &str) {
        let prefs = interrupted("abc");
        prefs.set_string(key, value).unwrap();
        assert!(!can_resume_update(&prefs, "abc"));
    }

    #[test]
    fn failures_at_limit_still_resume() {
        let prefs = interrupted("abc");
        prefs
            .set_i64(keys::RESUMED_UPDATE_FAILURES, MAX_RESUMED_UPDATE_FAILURES)
            .unwrap();
        assert!(can_resume_update(&prefs, "abc"));
    }

    #[test]
    fn quick_reset_only_invalidates_operation() {
        let prefs = interrupted("abc");
        reset_update_progress(&prefs, true).unwrap();

        assert_eq!(
            prefs.get_i64(keys::UPDATE_STATE_NEXT_OPERATION),
            Some(OPERATION_INVALID)
        );
        assert_eq!(
            prefs.get_string(keys::UPDATE_CHECK_RESPONSE_HASH).as_deref(),
            Some("abc")
        );
        assert_eq!(prefs.get_i64(keys::UPDATE_STATE_NEXT_DATA_OFFSET), Some(4096));
    }

    #[test]
    fn full_reset_clears_everything() {
        let prefs = interrupted("abc");
        prefs.set_i64(keys::RESUMED_UPDATE_FAILURES, 3).unwrap();
        reset_update_progress(&prefs, false).unwrap();

        assert_eq!(
            prefs.get_string(keys::UPDATE_CHECK_RESPONSE_HASH).as_deref(),
            Some("")
        );
        assert_eq!(prefs.get_i64(keys::UPDATE_STATE_NEXT_DATA_OFFSET), Some(-1));
        assert_eq!(prefs.get_i64(keys::UPDATE_STATE_NEXT_DATA_LENGTH), Some(0));
        assert_eq!(prefs.get_i64(keys::MANIFEST_METADATA_SIZE), Some(-1));
        assert_eq!(prefs.get_i64(keys::RESUMED_UPDATE_FAILURES), Some(0));
        assert!(!can_resume_update(&prefs, "abc"));
    }
}

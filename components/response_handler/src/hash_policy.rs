use update_types::is_https;

/// Whether payload hash verification must be enforced
///
/// Unofficial builds are test images served by dev servers that do not sign
/// metadata, so checks are waived unless the response carries a signing key.
/// Official builds waive checks only when every URL the payload could come
/// from is HTTPS: the resolved URL (which p2p may have replaced with plain
/// HTTP) and each URL in the response, since a later retry may use any of
/// them.
pub fn mandatory_hash_checks(
    official_build: bool,
    has_public_key: bool,
    download_url: &str,
    payload_urls: &[String],
) -> bool {
    if !official_build {
        if has_public_key {
            // Log scrapers look for this exact line
            tracing::info!(
                "Mandating payload hash checks since Omaha Response for unofficial build includes public RSA key."
            );
            return true;
        }
        tracing::info!("Waiving payload hash checks for unofficial builds");
        return false;
    }

    if !is_https(download_url) {
        tracing::info!("Mandating hash checks since download_url is not HTTPS.");
        return true;
    }

    if payload_urls.iter().any(|url| !is_https(url)) {
        tracing::info!("Mandating payload hash checks since Omaha response contains non-HTTPS URL(s)");
        return true;
    }

    tracing::info!("Waiving payload hash checks since Omaha response only has HTTPS URL(s)");
    false
}

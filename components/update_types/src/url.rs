const SECURE_SCHEME: &str = "https://";

/// Whether `url` uses the secure scheme (ASCII case-insensitive prefix match)
pub fn is_https(url: &str) -> bool {
    url.get(..SECURE_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SECURE_SCHEME))
}

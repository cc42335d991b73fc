//! Host matching used to decide whether the timer belongs on a page

use url::Url;

/// Whether `current_url` belongs to the configured `host_pattern`.
///
/// The URL's hostname loses a leading `www.`; the pattern loses its
/// `http(s)://` scheme, a leading `www.` and anything from the first `/`.
/// They match when either contains the other. Unparseable URLs never match.
pub fn matches_host(current_url: &str, host_pattern: &str) -> bool {
    let Ok(url) = Url::parse(current_url) else {
        return false;
    };
    let Some(hostname) = url.host_str() else {
        return false;
    };
    let current_host = hostname.strip_prefix("www.").unwrap_or(hostname);

    let pattern = host_pattern.trim();
    let pattern = pattern
        .strip_prefix("https://")
        .or_else(|| pattern.strip_prefix("http://"))
        .unwrap_or(pattern);
    let pattern = pattern.strip_prefix("www.").unwrap_or(pattern);
    let configured_host = pattern.split('/').next().unwrap_or_default();

    current_host.contains(configured_host) || configured_host.contains(current_host)
}

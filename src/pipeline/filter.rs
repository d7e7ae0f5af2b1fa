//! Rejects file URLs that cannot yield a download.

use tracing::info;
use url::Url;

use crate::config::SkipRule;

/// Skip rules plus absolute `http`/`https` validation.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    rules: Vec<SkipRule>,
}

impl TargetFilter {
    /// Creates a filter from skip rules.
    #[must_use]
    pub fn new(rules: Vec<SkipRule>) -> Self {
        Self { rules }
    }

    /// Returns the configured skip rules.
    #[must_use]
    pub fn rules(&self) -> &[SkipRule] {
        &self.rules
    }

    /// Returns true if `url` may be resolved.
    ///
    /// Logs the rejection reason otherwise.
    #[must_use]
    pub fn accepts(&self, url: &str) -> bool {
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(url)) {
            info!(url, prefix = %rule.prefix, suffix = %rule.suffix, "[SKIP] Invalid URL");
            return false;
        }
        if !is_http_url(url) {
            info!(url, "[SKIP] Invalid URL");
            return false;
        }
        true
    }

    /// Returns true if a resolved URL is still downloadable.
    #[must_use]
    pub fn accepts_resolved(&self, url: &str) -> bool {
        if is_http_url(url) {
            true
        } else {
            info!(url, "[SKIP] Invalid resolved URL");
            false
        }
    }
}

/// Returns true for absolute `http`/`https` URLs with a host.
#[must_use]
pub fn is_http_url(raw: &str) -> bool {
    Url::parse(raw.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor_filter() -> TargetFilter {
        TargetFilter::new(vec![SkipRule::new(
            "https://assets.thermofisher.com/TFS-Assets/",
            "/SDS",
        )])
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com/a.pdf"));
        assert!(is_http_url("http://example.com"));
        assert!(!is_http_url("ftp://example.com/a.pdf"));
        assert!(!is_http_url("/relative/a.pdf"));
        assert!(!is_http_url(""));
        assert!(!is_http_url("about:blank"));
    }

    #[test]
    fn test_filter_rejects_vendor_landing_page() {
        let filter = vendor_filter();
        assert!(!filter.accepts("https://assets.thermofisher.com/TFS-Assets/LSG/SDS"));
        assert!(filter.accepts("https://assets.thermofisher.com/TFS-Assets/LSG/SDS/x.pdf"));
    }

    #[test]
    fn test_filter_rejects_invalid_urls() {
        let filter = vendor_filter();
        assert!(!filter.accepts("not a url"));
        assert!(!filter.accepts("mailto:someone@example.com"));
        assert!(filter.accepts("https://www.example.com/document?id=1"));
    }

    #[test]
    fn test_filter_without_rules_only_checks_validity() {
        let filter = TargetFilter::default();
        assert!(filter.rules().is_empty());
        assert!(filter.accepts("https://assets.thermofisher.com/TFS-Assets/LSG/SDS"));
        assert!(!filter.accepts_resolved("chrome-error://chromewebdata/"));
        assert!(filter.accepts_resolved("https://cdn.example/x.pdf"));
    }
}

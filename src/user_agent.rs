//! Shared User-Agent strings for API, redirect and download HTTP clients.
//!
//! Single source for project URL and UA format so all outbound traffic
//! identifies the tool the same way.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/docsupport-harvester";

/// Default User-Agent for API and redirect-resolution requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("harvester/{version} (document-crawler; +{PROJECT_UA_URL})")
}

/// Default User-Agent for file downloads.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("harvester/{version} (bulk-downloader; +{PROJECT_UA_URL})")
}

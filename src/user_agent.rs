//! Shared User-Agent string for fetch and download HTTP clients.
//!
//! Single source for the UA format so listing-page and resource traffic
//! stay consistent and easy to update.

/// Default User-Agent identifying the tool.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("celldict/{version} (dictionary-mirror-tool)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_crate_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("celldict/"), "UA must identify the tool: {ua}");
        assert!(
            ua.contains(env!("CARGO_PKG_VERSION")),
            "UA must contain crate version: {ua}"
        );
    }
}

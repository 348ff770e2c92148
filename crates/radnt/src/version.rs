//! Version information for the radnt CLI

use semver::Version;
use serde::{Deserialize, Serialize};

/// Version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Semantic version
    pub version: String,

    /// Git commit SHA (short)
    pub commit: Option<String>,

    /// Build date
    pub build_date: Option<String>,

    /// Target triple
    pub target: Option<String>,
}

impl VersionInfo {
    /// Create version info for current build
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("GIT_SHA").map(String::from),
            build_date: option_env!("BUILD_DATE").map(String::from),
            target: option_env!("TARGET").map(String::from),
        }
    }

    /// Format as display string
    pub fn display(&self) -> String {
        let mut parts = vec![format!("radnt {}", self.version)];

        if let Some(commit) = &self.commit {
            parts.push(format!("({})", commit));
        }

        if let Some(target) = &self.target {
            parts.push(target.clone());
        }

        parts.join(" ")
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Whether `latest` is a strictly greater semver than `current`.
/// Unparseable versions never count as newer.
pub fn is_newer(latest: &str, current: &str) -> bool {
    match (Version::parse(latest.trim()), Version::parse(current.trim())) {
        (Ok(latest), Ok(current)) => latest > current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info_current_is_valid_semver() {
        let info = VersionInfo::current();
        assert!(
            Version::parse(&info.version).is_ok(),
            "version should be valid semver, got: {}",
            info.version
        );
    }

    #[test]
    fn test_version_info_display_with_all_fields() {
        let info = VersionInfo {
            version: "1.2.3".to_string(),
            commit: Some("abc1234".to_string()),
            build_date: Some("2026-01-01".to_string()),
            target: Some("x86_64-unknown-linux-gnu".to_string()),
        };
        assert_eq!(info.display(), "radnt 1.2.3 (abc1234) x86_64-unknown-linux-gnu");
        assert_eq!(format!("{}", info), info.display());
    }

    #[test]
    fn test_version_info_display_without_optional_fields() {
        let info = VersionInfo {
            version: "0.1.0".to_string(),
            commit: None,
            build_date: None,
            target: None,
        };
        assert_eq!(info.display(), "radnt 0.1.0");
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("1.3.0", "1.2.9"));
        assert!(is_newer("2.0.0\n", "1.99.0"));
        assert!(!is_newer("1.2.3", "1.2.3"));
        assert!(!is_newer("1.2.0", "1.2.3"));
        assert!(!is_newer("1.3.0-beta.1", "1.3.0"));
        assert!(!is_newer("not-a-version", "1.0.0"));
    }
}

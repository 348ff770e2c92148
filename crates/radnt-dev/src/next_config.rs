//! next.config.ts compatibility fixup.
//!
//! Some Next.js versions started by `npx next dev` cannot load a TypeScript
//! config. When only `next.config.ts` exists, a CommonJS `next.config.js` is
//! written next to it.

use crate::error::Result;
use camino::Utf8Path;
use regex::Regex;
use std::fs;
use std::sync::LazyLock;
use tracing::{debug, warn};

static TYPE_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+type\s+.*?from\s+['"].*?['"];?\s*"#).expect("type import regex is valid")
});

static NEXT_CONFIG_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*NextConfig").expect("annotation regex is valid"));

static EXPORT_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+default\s+").expect("export regex is valid"));

static TYPED_CONST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"const\s+(\w+)\s*:\s*.*?\s*=").expect("typed const regex is valid")
});

/// Config written when the TypeScript config cannot be read
pub const BASIC_NEXT_CONFIG: &str = r#"/** @type {import('next').NextConfig} */
const nextConfig = {
  // App Router is now stable in Next.js 15+
}

module.exports = nextConfig
"#;

/// What the fixup did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextConfigFix {
    /// next.config.js was generated from next.config.ts
    Converted,
    /// next.config.ts could not be read; a basic next.config.js was written
    Basic,
}

/// Strip TypeScript-only syntax from a Next.js config
pub fn convert_ts_config(source: &str) -> String {
    let js = TYPE_IMPORT_RE.replace_all(source, "");
    let js = NEXT_CONFIG_TYPE_RE.replace_all(&js, "");
    let js = EXPORT_DEFAULT_RE.replace(&js, "module.exports = ");
    let js = TYPED_CONST_RE.replace(&js, "const $1 =");
    js.into_owned()
}

/// Write next.config.js when only next.config.ts exists
pub fn fix_next_config(root: &Utf8Path) -> Result<Option<NextConfigFix>> {
    let ts_path = root.join("next.config.ts");
    let js_path = root.join("next.config.js");

    if !ts_path.is_file() || js_path.exists() {
        return Ok(None);
    }

    match fs::read_to_string(&ts_path) {
        Ok(source) => {
            fs::write(&js_path, convert_ts_config(&source))?;
            debug!("Converted {} to {}", ts_path, js_path);
            Ok(Some(NextConfigFix::Converted))
        }
        Err(e) => {
            warn!("Could not read {}: {}", ts_path, e);
            fs::write(&js_path, BASIC_NEXT_CONFIG)?;
            Ok(Some(NextConfigFix::Basic))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const TS_CONFIG: &str = r#"import type { NextConfig } from "next";

const nextConfig: NextConfig = {
  reactStrictMode: true,
};

export default nextConfig;
"#;

    fn root_of(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_convert_ts_config() {
        let js = convert_ts_config(TS_CONFIG);
        assert_eq!(
            js,
            "const nextConfig = {\n  reactStrictMode: true,\n};\n\nmodule.exports = nextConfig;\n"
        );
    }

    #[test]
    fn test_convert_leaves_plain_js_alone() {
        let source = "module.exports = { output: 'export' }\n";
        assert_eq!(convert_ts_config(source), source);
    }

    #[test]
    fn test_convert_is_stable_across_calls() {
        let first = convert_ts_config(TS_CONFIG);
        let second = convert_ts_config(TS_CONFIG);
        assert_eq!(first, second);
        // output is already plain JS, so converting again changes nothing
        assert_eq!(convert_ts_config(&first), first);
    }

    #[test]
    fn test_fix_writes_js_when_only_ts_exists() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("next.config.ts"), TS_CONFIG).unwrap();

        let fix = fix_next_config(&root_of(&dir)).unwrap();

        assert_eq!(fix, Some(NextConfigFix::Converted));
        let js = fs::read_to_string(dir.path().join("next.config.js")).unwrap();
        assert!(js.contains("module.exports = nextConfig"));
        assert!(!js.contains("NextConfig"));
    }

    #[test]
    fn test_fix_keeps_existing_js() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("next.config.ts"), TS_CONFIG).unwrap();
        fs::write(dir.path().join("next.config.js"), "// mine\n").unwrap();

        assert_eq!(fix_next_config(&root_of(&dir)).unwrap(), None);
        assert_eq!(
            fs::read_to_string(dir.path().join("next.config.js")).unwrap(),
            "// mine\n"
        );
    }

    #[test]
    fn test_fix_without_ts_config_is_noop() {
        let dir = TempDir::new().unwrap();
        assert_eq!(fix_next_config(&root_of(&dir)).unwrap(), None);
        assert!(!dir.path().join("next.config.js").exists());
    }

    #[test]
    fn test_fix_falls_back_to_basic_config_on_unreadable_ts() {
        let dir = TempDir::new().unwrap();
        // invalid UTF-8 cannot be read as a string
        fs::write(dir.path().join("next.config.ts"), [0xff, 0xfe, 0x00]).unwrap();

        let fix = fix_next_config(&root_of(&dir)).unwrap();

        assert_eq!(fix, Some(NextConfigFix::Basic));
        assert_eq!(
            fs::read_to_string(dir.path().join("next.config.js")).unwrap(),
            BASIC_NEXT_CONFIG
        );
    }
}

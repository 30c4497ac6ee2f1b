//! Build metadata embedded by `vergen-gitcl`.
//!
//! Missing values (e.g. building from a source tarball without git) fall
//! back to `"unknown"`.

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time.
pub const GIT_BRANCH: &str = or_unknown(option_env!("VERGEN_GIT_BRANCH"));

/// Git commit SHA at build time.
pub const GIT_SHA: &str = or_unknown(option_env!("VERGEN_GIT_SHA"));

const BUILD_TIMESTAMP: &str = or_unknown(option_env!("VERGEN_BUILD_TIMESTAMP"));

const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(v) => v,
        None => "unknown",
    }
}

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Build metadata as reported by the `/health` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub sha: &'static str,
    pub dirty: bool,
    pub built_at: &'static str,
}

/// Collect build metadata.
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: PKG_VERSION,
        branch: GIT_BRANCH,
        sha: GIT_SHA,
        dirty: git_dirty(),
        built_at: BUILD_TIMESTAMP,
    }
}

/// `{version}+{branch}.{short sha}`, with `.dirty` appended for dirty trees.
pub fn version_string() -> String {
    let short_sha = GIT_SHA.get(..7).unwrap_or(GIT_SHA);
    let dirty = if git_dirty() { ".dirty" } else { "" };
    format!("{PKG_VERSION}+{GIT_BRANCH}.{short_sha}{dirty}")
}

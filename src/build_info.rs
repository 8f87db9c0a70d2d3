//! Compile-time build information, filled in by `build.rs`.

pub const BUILD_COMMIT: &str = env!("WEIQI_COMMIT");
pub const BUILD_DATE: &str = env!("WEIQI_DATE");

/// One-line version string for `weiqi --version`.
pub fn version_line() -> String {
    format!(
        "weiqi {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}

//! Stamps the binary with the commit, build time and cargo profile shown in
//! the page footer and the startup log.
//!
//! Packagers building outside a git checkout can pin the values with
//! `CSVSCOPE_GIT_HASH` and `SOURCE_DATE_EPOCH`.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Run git in the package directory and return trimmed stdout on success
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}

/// Short commit id, suffixed with `+dirty` when tracked files are modified
fn commit() -> String {
    if let Ok(pinned) = env::var("CSVSCOPE_GIT_HASH") {
        return pinned;
    }
    match git(&["rev-parse", "--short=8", "HEAD"]) {
        Some(hash) => match git(&["status", "--porcelain", "--untracked-files=no"]) {
            Some(changes) if !changes.is_empty() => format!("{}+dirty", hash),
            _ => hash,
        },
        None => UNKNOWN.to_string(),
    }
}

/// RFC 3339 build time, taken from SOURCE_DATE_EPOCH for reproducible builds
fn timestamp() -> String {
    let pinned = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
    pinned
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=CSVSCOPE_GIT_HASH");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let profile = env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    for (key, value) in [
        ("GIT_HASH", commit()),
        ("BUILD_TIMESTAMP", timestamp()),
        ("BUILD_PROFILE", profile),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

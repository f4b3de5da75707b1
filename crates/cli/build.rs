//! Emits the `BUILT_*` variables shown by `drawparse --version`

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=GIT_COMMIT_HASH");

    let var = |name: &str| env::var(name).unwrap_or_else(|_| "unknown".to_string());
    for (key, value) in [
        ("BUILT_HOST", var("HOST")),
        ("BUILT_GIT_COMMIT_HASH", var("GIT_COMMIT_HASH")),
        ("BUILT_TIME_UTC", chrono::Utc::now().to_rfc3339()),
    ] {
        println!("cargo:rustc-env={key}={value}");
    }
}

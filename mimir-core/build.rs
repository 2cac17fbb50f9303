use std::process::Command;

fn main() {
    let code_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|sha| sha.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=MIMIR_CODE_HASH={}", code_hash);
    println!("cargo:rerun-if-changed=build.rs");
}

use std::process::Command;

fn main() {
    // RETRO_DISPLAY_VERSION can be injected by the release pipeline.
    // Falls back to CARGO_PKG_VERSION (from Cargo.toml) for local builds.
    let version = std::env::var("RETRO_DISPLAY_VERSION")
        .unwrap_or_else(|_| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=RETRO_DISPLAY_VERSION={version}");

    // RETRO_DISPLAY_COMMIT falls back to `git rev-parse --short HEAD`.
    let commit = std::env::var("RETRO_DISPLAY_COMMIT").unwrap_or_else(|_| {
        let output = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output();
        match output {
            Ok(o) if o.status.success() => {
                String::from_utf8_lossy(&o.stdout).trim().to_string()
            }
            _ => "unknown".to_string(),
        }
    });
    println!("cargo:rustc-env=RETRO_DISPLAY_COMMIT={commit}");

    println!("cargo:rerun-if-env-changed=RETRO_DISPLAY_VERSION");
    println!("cargo:rerun-if-env-changed=RETRO_DISPLAY_COMMIT");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

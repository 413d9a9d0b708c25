// Build script - stamps build metadata into the binary.
use std::process::Command;

fn main() {
    let run = |cmd: &str, args: &[&str]| -> String {
        Command::new(cmd)
            .args(args)
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    };

    let timestamp = run("date", &["-u", "+%Y-%m-%d %H:%M:%S"]);
    let commit = run("git", &["rev-parse", "--short", "HEAD"]);

    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=BUILD_COMMIT={}", commit);

    // No rerun-if-changed = rerun on any package file change (always fresh timestamp)
}

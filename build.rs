//! Places `config.json` next to the built `foods-store` binary so
//! `AppConfig::locate` finds it when run from `target/<profile>/`.

use std::{env, fs, path::PathBuf};

const CONFIG_FILE: &str = "config.json";

fn main() {
    println!("cargo:rerun-if-changed={CONFIG_FILE}");

    // OUT_DIR is target/<profile>/build/<crate>-<hash>/out
    let Some(profile_dir) = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .and_then(|out| out.ancestors().nth(3).map(PathBuf::from))
    else {
        return;
    };

    if let Err(e) = fs::copy(CONFIG_FILE, profile_dir.join(CONFIG_FILE)) {
        println!("cargo:warning=could not copy {CONFIG_FILE} next to the binary: {e}");
    }
}

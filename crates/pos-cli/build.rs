//! Build script: render the `poseidonos-cli` manual page into `OUT_DIR`.

use clap::CommandFactory;
use clap_mangen::Man;
use std::{env, fs, path::PathBuf};

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");
    println!("cargo:rerun-if-env-changed=CARGO_BIN_NAME");

    let cmd = cli::Cli::command();
    let default_name = cmd
        .get_bin_name()
        .unwrap_or_else(|| cmd.get_name())
        .to_owned();
    let binary_name = env::var("CARGO_BIN_NAME").unwrap_or(default_name);
    let version = env::var("CARGO_PKG_VERSION").map_err(
        |_| "CARGO_PKG_VERSION must be set by Cargo; cannot render manual page without it.",
    )?;

    let man = Man::new(cmd)
        .section("1")
        .source(format!("{binary_name} {version}"));
    let mut buf = Vec::new();
    man.render(&mut buf)?;

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        println!("cargo:warning=OUT_DIR is not set; skipping manual page");
        return Ok(());
    };
    fs::create_dir_all(&out_dir)?;
    fs::write(out_dir.join(format!("{binary_name}.1")), buf)?;
    Ok(())
}

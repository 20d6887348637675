//! genatlas - multi-font distance-field atlas builder
//!
//! ```text
//! config (TOML/JSON) ─→ AtlasPipeline ─→ {file}.{type}.png
//!                                     └─→ {file}.{type}.json
//! ```

use anyhow::{anyhow, bail, Context, Result};
use genatlas::constants::LOCAL_CONFIG_FILE;
use genatlas::{AtlasPipeline, BuildConfig};
use log::info;
use std::path::PathBuf;

/// Print help message
fn print_help() {
    println!(
        r#"genatlas {} - multi-font distance-field atlas builder

USAGE:
    genatlas [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -c, --config <PATH>     Build configuration (TOML, or JSON by extension)
    --init-config           Write a template ./{}
    -f, --force             Overwrite the template without confirmation

CONFIG LOOKUP (without --config):
    $GENATLAS_CONFIG
    ./{}
    ~/.config/genatlas/config.toml

OUTPUT:
    {{outputDir}}/{{fileName}}.{{fieldType}}.png   combined atlas texture
    {{outputDir}}/{{fileName}}.{{fieldType}}.json  per-font layout manifest
"#,
        env!("CARGO_PKG_VERSION"),
        LOCAL_CONFIG_FILE,
        LOCAL_CONFIG_FILE
    );
}

/// Write the commented template, asking before overwriting
fn init_config(force: bool) -> Result<()> {
    let path = PathBuf::from(LOCAL_CONFIG_FILE);
    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        print!("Overwrite? [y/N]: ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input != "y" && input != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    std::fs::write(&path, BuildConfig::template())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Config file generated: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("genatlas {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        return init_config(force);
    }

    // --config PATH or --config=PATH
    let explicit = match args.iter().position(|a| a == "--config" || a == "-c") {
        Some(i) => Some(PathBuf::from(
            args.get(i + 1)
                .ok_or_else(|| anyhow!("--config needs a path"))?,
        )),
        None => args
            .iter()
            .find_map(|a| a.strip_prefix("--config="))
            .map(PathBuf::from),
    };

    let config_path = match explicit.or_else(BuildConfig::config_path) {
        Some(path) => path,
        None => bail!(
            "No build configuration found; pass --config or run `genatlas --init-config`"
        ),
    };

    let config = BuildConfig::load_from_file(&config_path)?;
    let mut pipeline = AtlasPipeline::new(&config)
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    info!("genatlas starting...");
    let report = pipeline.run()?;

    if let (Some(path), Some((w, h))) = (&report.texture_path, report.texture_size) {
        println!("Texture:  {} ({}x{})", path.display(), w, h);
    }
    if let Some(path) = &report.manifest_path {
        println!("Manifest: {} ({} font(s))", path.display(), report.manifest.len());
    }
    for skipped in &report.skipped {
        eprintln!("Skipped {}: {}", skipped.key, skipped.error);
    }

    Ok(())
}

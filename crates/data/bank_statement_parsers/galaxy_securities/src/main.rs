use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::{env, fs};

use galaxy_parser::{GalaxyStrategy, StatementStrategy};

fn main() -> Result<()> {
    // Usage:
    //   galaxy_parser statement.xls other.xlsx ... [--settings settings.json] [--output out.json]
    //
    // Every file is parsed into { amount, position, trade_record }. Files with an
    // unsupported extension produce empty tables.
    //
    // Defaults:
    //   settings: settings.json in cwd if present, built-in defaults otherwise
    //   output: stdout

    let mut files: Vec<String> = Vec::new();
    let mut settings_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let p = args.next().ok_or_else(|| anyhow!("--settings needs a path"))?;
                settings_path = Some(PathBuf::from(p));
            }
            "--output" => {
                let p = args.next().ok_or_else(|| anyhow!("--output needs a path"))?;
                output_path = Some(PathBuf::from(p));
            }
            _ => files.push(arg),
        }
    }

    let settings = settings_loader::load_settings_with_fallback(settings_path.as_ref())?;
    logger::init(&settings.log)?;

    if files.is_empty() {
        eprintln!("❌ No statement files given.");
        eprintln!("   usage: galaxy_parser <statement.xls[x]>... [--settings path] [--output path]");
        return Ok(());
    }

    let strategy = GalaxyStrategy::new(settings);
    let mut out = Map::new();

    eprintln!("📖 Parsing {} statement file(s)", files.len());
    for file in &files {
        let tables = strategy
            .parse(Path::new(file))
            .with_context(|| format!("Failed parsing {}", file))?;

        eprintln!(
            "  • {}: {} amount, {} position, {} trade_record row(s)",
            file,
            tables.amount.len(),
            tables.position.len(),
            tables.trade_record.len()
        );
        out.insert(file.clone(), serde_json::to_value(&tables)?);
    }

    let json = serde_json::to_string_pretty(&Value::Object(out))?;
    match output_path {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Cannot write output to {}", path.display()))?;
            eprintln!("✅ Tables written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

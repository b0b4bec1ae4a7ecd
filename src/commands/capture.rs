use std::path::Path;

use console::style;
use miette::Result;

use scaffolder::capture::{capture_tree, to_toml, CaptureOptions, DEFAULT_EXCLUDES};
use scaffolder::error::ScaffoldError;

pub fn run(dir: String, output: Option<String>, name: Option<String>, exclude: Vec<String>) -> Result<()> {
    let dir = Path::new(&dir);
    let name = name.unwrap_or_else(|| {
        dir.canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "captured".to_string())
    });

    let mut patterns: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    patterns.extend(exclude);

    let result = capture_tree(
        dir,
        &CaptureOptions {
            name,
            exclude: patterns,
        },
    )?;
    let toml = to_toml(&result.document)?;

    for skipped in &result.skipped {
        eprintln!("  {} skipped {}", style("⚠").yellow(), skipped);
    }

    match output {
        Some(path) => {
            std::fs::write(&path, toml).map_err(|e| ScaffoldError::Io {
                context: format!("writing catalog to {path}"),
                source: e,
            })?;
            eprintln!(
                "{} Captured {} entries into {}",
                style("✓").green().bold(),
                result.document.entries.len(),
                style(&path).cyan()
            );
        }
        None => print!("{toml}"),
    }

    Ok(())
}

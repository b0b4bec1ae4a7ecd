use std::path::Path;

use console::style;
use miette::Result;

use scaffolder::catalog::load_catalog;
use scaffolder::config::load_user_config;
use scaffolder::engine::{HookSetting, ScaffoldEngine, ScaffoldOptions};
use scaffolder::error::ScaffoldError;
use scaffolder::hooks::ExternalCommand;
use scaffolder::manifest::{Outcome, RunStatus};
use scaffolder::materialize::CollisionPolicy;
use scaffolder::params::ParameterSet;
use scaffolder::prompt::prompt_parameters;
use scaffolder::resolve_parameters;

#[allow(clippy::too_many_arguments)]
pub fn run(
    catalog: String,
    root: String,
    params: Vec<String>,
    skip_existing: bool,
    dry_run: bool,
    no_hooks: bool,
    hook: Option<String>,
    manifest: Option<String>,
    interactive: bool,
) -> Result<()> {
    let catalog = load_catalog(Path::new(&catalog))?;
    let root = Path::new(&root);

    let explicit = ParameterSet::from_assignments(&params)?;
    let user = load_user_config()?;
    let answers = if interactive {
        prompt_parameters(&catalog, user.as_ref(), &explicit)?
    } else {
        ParameterSet::new()
    };
    let params = resolve_parameters(&catalog, user.as_ref(), &answers, &explicit, root);

    let hook = if no_hooks {
        HookSetting::Disabled
    } else if let Some(line) = hook {
        let command = ExternalCommand::parse(&line)
            .ok_or_else(|| miette::miette!("--hook needs a command to run"))?;
        HookSetting::Command(command)
    } else {
        HookSetting::FromCatalog
    };

    let options = ScaffoldOptions {
        policy: if skip_existing {
            CollisionPolicy::SkipExisting
        } else {
            CollisionPolicy::FailIfRootExists
        },
        dry_run,
        hook,
    };

    let header = if dry_run { "Dry run of" } else { "Scaffolding" };
    println!(
        "{} {} {} {}",
        style("==>").cyan().bold(),
        header,
        style(&catalog.name).bold(),
        style(root.display()).cyan()
    );

    let report = ScaffoldEngine::new(&catalog, &params, root)
        .with_options(options)
        .run()?;

    for record in &report.manifest.records {
        let action = match &record.outcome {
            Outcome::Created if dry_run => style("would create").green(),
            Outcome::Created => style("create").green(),
            Outcome::SkippedExists => style("skip").yellow(),
            Outcome::Failed(_) => style("fail").red(),
        };
        let suffix = if record.kind.is_file() { "" } else { "/" };
        println!("  {:>12} {}{}", action, record.path, suffix);
    }

    let counts = report.manifest.counts();
    println!(
        "\nSummary: {} created, {} skipped, {} failed",
        counts.created, counts.skipped, counts.failed
    );

    if !report.manifest.warnings.is_empty() {
        println!("\n{}", style("Warnings:").yellow().bold());
        for w in &report.manifest.warnings {
            println!("  {} {}", style("⚠").yellow(), w);
        }
    }

    if let Some(path) = manifest {
        write_manifest(Path::new(&path), &report.manifest)?;
        println!("  Manifest written to {}", style(&path).cyan());
    }

    if report.status == RunStatus::Failed {
        eprintln!("\n{}", style("Errors:").red().bold());
        for (record, error) in report.manifest.failures() {
            eprintln!("  {} [{}] {}", style("✗").red(), record.group, error);
        }
        eprintln!(
            "\n{} Scaffold failed with {} error(s); {} may be partially populated",
            style("✗").red().bold(),
            counts.failed,
            root.display()
        );
        std::process::exit(1);
    }

    if dry_run {
        println!(
            "\n{} Dry run, no files written.",
            style("ℹ").blue().bold()
        );
    } else {
        println!(
            "\n{} Project created at {}",
            style("✓").green().bold(),
            style(root.display()).cyan()
        );
    }

    Ok(())
}

fn write_manifest(path: &Path, manifest: &scaffolder::manifest::CreationManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).map_err(|e| ScaffoldError::Io {
        context: "serializing manifest".into(),
        source: std::io::Error::other(e),
    })?;
    std::fs::write(path, json).map_err(|e| ScaffoldError::Io {
        context: format!("writing manifest to {}", path.display()),
        source: e,
    })?;
    Ok(())
}

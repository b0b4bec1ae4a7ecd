use std::path::Path;

use console::style;
use miette::Result;

use scaffolder::catalog::load_catalog;
use scaffolder::check::check_catalog;
use scaffolder::params::ParameterSet;

pub fn run(catalog: String, params: Vec<String>) -> Result<()> {
    let path = Path::new(&catalog);

    println!(
        "{} {}",
        style("Checking catalog at").bold(),
        style(path.display()).cyan()
    );

    let catalog = load_catalog(path)?;
    let supplied = ParameterSet::from_assignments(&params)?;
    let result = check_catalog(&catalog, &supplied);

    println!("  Name: {}", result.catalog_name);
    println!("  Groups: {}", result.group_count);
    println!("  Entries: {}", result.entry_count);

    if !result.warnings.is_empty() {
        println!("\n{}", style("Warnings:").yellow().bold());
        for w in &result.warnings {
            println!("  {} {}", style("⚠").yellow(), w);
        }
    }

    if !result.is_valid() {
        println!("\n{}", style("Errors:").red().bold());
        for e in &result.errors {
            println!("  {} {}", style("✗").red(), e);
        }
        println!(
            "\n{} Catalog has {} error(s)",
            style("✗").red().bold(),
            result.errors.len()
        );
        std::process::exit(1);
    }

    println!("\n{} Catalog is valid!", style("✓").green().bold());
    Ok(())
}

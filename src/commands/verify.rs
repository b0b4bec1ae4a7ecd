use std::path::Path;

use console::style;
use miette::Result;

use scaffolder::catalog::load_catalog;
use scaffolder::config::load_user_config;
use scaffolder::params::ParameterSet;
use scaffolder::resolve_parameters;
use scaffolder::verify::{verify_tree, Mismatch};

pub fn run(catalog: String, root: String, params: Vec<String>) -> Result<()> {
    let catalog = load_catalog(Path::new(&catalog))?;
    let root = Path::new(&root);

    let explicit = ParameterSet::from_assignments(&params)?;
    let user = load_user_config()?;
    let params = resolve_parameters(&catalog, user.as_ref(), &ParameterSet::new(), &explicit, root);

    println!(
        "{} Verifying {} against {}",
        style("...").cyan().bold(),
        style(root.display()).cyan(),
        style(&catalog.name).bold()
    );

    let result = verify_tree(&catalog, &params, root)?;

    if result.is_match() {
        println!(
            "\n{} {} entries match",
            style("✓").green().bold(),
            result.matched
        );
        return Ok(());
    }

    for mismatch in &result.mismatches {
        println!("  {} {}", style("✗").red(), mismatch);
        if let Mismatch::Differs { diff, .. } = mismatch {
            for line in diff.lines() {
                let styled = match line.chars().next() {
                    Some('+') if !line.starts_with("+++") => style(line).green(),
                    Some('-') if !line.starts_with("---") => style(line).red(),
                    Some('@') => style(line).cyan(),
                    _ => style(line).dim(),
                };
                println!("    {styled}");
            }
        }
    }

    println!(
        "\n{} {} matched, {} mismatched",
        style("✗").red().bold(),
        result.matched,
        result.mismatches.len()
    );
    std::process::exit(1);
}

use anyhow::{Result, bail};
use optgate::FlagRegistry;
use optgate::domain::flag::CategorySet;

/// Prints the registry as a table, restricted to `category`.
///
/// # Errors
/// Returns an error if `category` holds an unknown entry or no entry at all.
pub fn run(registry: &FlagRegistry, category: &str) -> Result<()> {
    let categories = CategorySet::parse_list(category)?;
    if categories.is_empty() {
        bail!("No known category in '{category}'");
    }

    let flags: Vec<_> = registry.filter(categories).collect();
    if flags.is_empty() {
        println!("ℹ️ No flags registered in '{category}'.");
        return Ok(());
    }

    println!("{:<34} {:<12} {:<8} {}", "Flag", "Category", "Default", "Description");
    println!("{:-<100}", "");

    for flag in flags {
        let default = if flag.default { "on" } else { "off" };
        let description = flag.description.as_deref().unwrap_or("");
        println!("{:<34} {:<12} {:<8} {description}", flag.name, flag.category, default);

        if !flag.requires.is_empty() {
            println!("{:<34} requires {}", "", flag.requires.join(", "));
        }
        if !flag.excludes.is_empty() {
            println!("{:<34} excludes {}", "", flag.excludes.join(", "));
        }
    }
    println!();

    Ok(())
}

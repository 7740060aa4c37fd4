use anyhow::{Result, bail};
use optgate::Emitter;
use optgate::resolver::parser;
use std::path::PathBuf;

/// Validates each header on its own and prints every violation.
///
/// # Errors
/// Returns an error after reporting if any header fails to parse or validate.
pub fn run(emitter: &Emitter, sources: &[PathBuf]) -> Result<()> {
    let mut failed = 0usize;

    for path in sources {
        let source = match parser::load_source(path) {
            Ok(source) => source,
            Err(err) => {
                println!("error {}: [{}] {err}", path.display(), err.kind());
                failed += 1;
                continue;
            },
        };

        let violations = emitter.check(&source);
        if violations.is_empty() {
            println!("ok    {}", source.label());
            continue;
        }

        failed += violations.len();
        for violation in &violations {
            println!("error {}: [{}] {violation}", source.label(), violation.kind());
        }
    }

    if failed > 0 {
        bail!("{failed} problem(s) found in {} source(s)", sources.len());
    }

    Ok(())
}

//! Output sinks: one value per line, to a file or stdout.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Writes the values to a file, one per line.
///
/// The file is created (or truncated) with owner read/write permissions
/// only, since sheet contents may be sensitive.
pub fn write_lines(path: &Path, values: &[String]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path)?;
    for value in values {
        writeln!(file, "{value}")?;
    }
    Ok(())
}

/// Prints the values to stdout, one per line.
pub fn print_lines(values: &[String]) {
    for value in values {
        println!("{value}");
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Shared helpers for termpack commands.

use std::path::Path;

use crate::error::{Result, TermpackError};

/// Standard error message prefixes.
pub mod error_messages {
    pub const INPUT_PATH_NOT_EXIST: &str = "Input path does not exist:";
    pub const INPUT_PATH_NOT_FILE: &str = "Input path is not a file:";
    pub const OUTPUT_FILE_EXISTS: &str = "Output file already exists (use --force):";
}

/// Validate that an input path exists and is a regular file.
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(TermpackError::Validation(format!(
            "{} {}",
            error_messages::INPUT_PATH_NOT_EXIST,
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(TermpackError::Validation(format!(
            "{} {}",
            error_messages::INPUT_PATH_NOT_FILE,
            path.display()
        )));
    }
    Ok(())
}

/// Refuse to overwrite an existing output unless forced.
pub fn check_output_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(TermpackError::Validation(format!(
            "{} {}",
            error_messages::OUTPUT_FILE_EXISTS,
            path.display()
        )));
    }
    Ok(())
}

/// Compressed size as a percentage of the original.
pub fn ratio_percent(compressed: usize, original: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    compressed as f64 * 100.0 / original as f64
}

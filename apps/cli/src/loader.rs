use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::ScreenError;

/// Reads a UTF-8 text file, trimming leading and trailing whitespace.
///
/// A missing file maps to `ScreenError::MissingInput` carrying the
/// attempted path, so callers can distinguish "not there" (skippable for
/// candidate files) from any other I/O failure, which stays fatal.
/// Invalid UTF-8 surfaces as an `InvalidData` I/O error.
pub fn read_text(path: &Path) -> Result<String, ScreenError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ScreenError::MissingInput(path.to_path_buf()))
        }
        Err(e) => Err(ScreenError::Io(e)),
    }
}

//! Defaults for values the user leaves out when wrapping a binary.

use crate::diagnostics::Field;
use std::path::{Path, PathBuf};

//===========================================================================//

/// The extension of package files.
pub const PACKAGE_EXTENSION: &str = "g1a";

/// Returns where to write the package for `input` when no output path was
/// given: the same path with its extension replaced by `.g1a`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(PACKAGE_EXTENSION)
}

/// Returns the program name to use when none was given: the output file name
/// without its extension, cut to fit the program name slot.
pub fn default_program_name(output: &Path) -> String {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut end = stem.len().min(Field::ProgramName.max_len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem[..end].to_string()
}

//===========================================================================//


//===========================================================================//

use crate::error::{CompoteError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the full contents of a template or component file into memory
///
/// # Errors
///
/// - `CompoteError::TemplateNotFound` if the path doesn't exist or isn't a file.
/// - `CompoteError::Io` if there's an error reading the file.
pub fn read_file_contents(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CompoteError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(std::convert::Into::into)
}

/// Builds the file-system path of a component from a directive payload.
///
/// The payload is taken verbatim (exactly the bytes between the delimiters)
/// and joined onto the directory of the including file. The result is not
/// opened or validated here.
pub fn resolve_component_path(payload: &str, base_dir: &Path) -> PathBuf {
    base_dir.join(payload)
}

/// Canonicalizes a component path before descending into it.
///
/// Canonical paths make the cycle check in the expander independent of how a
/// file was spelled (`./x`, `sub/../x`, symlinks).
///
/// # Errors
///
/// `CompoteError::ComponentNotFound` naming both the failing path and the
/// file whose directive referenced it.
pub fn canonicalize_component(path: &Path, referenced_by: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|_| CompoteError::ComponentNotFound {
            path: path.to_path_buf(),
            referenced_by: referenced_by.to_path_buf(),
        })
}

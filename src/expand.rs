use crate::error::{CompoteError, Result};
use crate::fs_utils::{canonicalize_component, read_file_contents, resolve_component_path};
use std::path::{Path, PathBuf};

/// Opening delimiter of an include directive
pub const DELIMITER_START: &str = "{{";

/// Closing delimiter of an include directive
pub const DELIMITER_END: &str = "}}";

/// A located include directive within a document buffer.
///
/// All offsets are byte positions. The directive occupies the half-open range
/// `start..end`; the payload (the component path) occupies
/// `payload_start..payload_end`, exactly the bytes strictly between the two
/// delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Position of the opening `{{`
    pub start: usize,
    /// First byte after the opening delimiter
    pub payload_start: usize,
    /// Position of the closing `}}`
    pub payload_end: usize,
    /// First byte after the closing delimiter
    pub end: usize,
}

impl Marker {
    /// The component path text enclosed by the delimiters
    #[must_use]
    pub fn payload<'a>(&self, buffer: &'a str) -> &'a str {
        &buffer[self.payload_start..self.payload_end]
    }
}

/// Finds the first include directive in the buffer.
///
/// Searches for the first occurrence of `{{` and, independently, the first
/// occurrence of `}}`. Returns `Ok(None)` when either delimiter is absent,
/// which is the normal "no further includes" signal.
///
/// # Errors
///
/// `CompoteError::MalformedDirective` if the closing delimiter occurs at or
/// before the end of the opening delimiter, i.e. the two do not enclose a
/// payload range.
pub fn find_marker(buffer: &str) -> Result<Option<Marker>> {
    let Some(start) = buffer.find(DELIMITER_START) else {
        return Ok(None);
    };
    let Some(payload_end) = buffer.find(DELIMITER_END) else {
        return Ok(None);
    };

    let payload_start = start + DELIMITER_START.len();
    if payload_end < payload_start {
        return Err(CompoteError::MalformedDirective {
            position: payload_end,
            message: "closing delimiter precedes opening delimiter".to_string(),
        });
    }

    Ok(Some(Marker {
        start,
        payload_start,
        payload_end,
        end: payload_end + DELIMITER_END.len(),
    }))
}

/// Finds every include directive in the buffer, left to right.
///
/// Used by the listing and dry-run modes; expansion itself rescans after each
/// splice instead.
///
/// # Errors
///
/// `CompoteError::MalformedDirective` on the same condition as `find_marker`.
pub fn find_all_markers(buffer: &str) -> Result<Vec<Marker>> {
    let mut markers = Vec::new();
    let mut offset = 0;

    while let Some(marker) = find_marker(&buffer[offset..])? {
        let absolute = Marker {
            start: marker.start + offset,
            payload_start: marker.payload_start + offset,
            payload_end: marker.payload_end + offset,
            end: marker.end + offset,
        };
        offset = absolute.end;
        markers.push(absolute);
    }

    Ok(markers)
}

/// Replaces a directive's byte range with the given content.
///
/// Returns a new buffer of exactly `prefix + replacement + suffix`; neither
/// input is mutated. Capacity is computed up front from the three piece
/// lengths.
#[must_use]
pub fn splice(buffer: &str, marker: &Marker, replacement: &str) -> String {
    let prefix = &buffer[..marker.start];
    let suffix = &buffer[marker.end..];

    let mut combined = String::with_capacity(prefix.len() + replacement.len() + suffix.len());
    combined.push_str(prefix);
    combined.push_str(replacement);
    combined.push_str(suffix);
    combined
}

/// Fully expands a template file and returns the resulting content.
///
/// Loads the file, then repeatedly finds the first directive, recursively
/// expands the referenced component (relative to the including file's
/// directory) and splices it in, until no directive remains. Components may
/// themselves be templates; their own directives resolve relative to their
/// own directory.
///
/// # Errors
///
/// - `CompoteError::TemplateNotFound` if `path` doesn't resolve to a file.
/// - `CompoteError::ComponentNotFound` if a referenced component can't be
///   opened, naming the file that referenced it.
/// - `CompoteError::MalformedDirective` on reversed delimiters or an empty
///   directive payload.
/// - `CompoteError::IncludeCycle` if a component includes itself, directly or
///   transitively.
pub fn expand_file(path: &Path) -> Result<String> {
    let canonical = path
        .canonicalize()
        .map_err(|_| CompoteError::TemplateNotFound {
            path: path.to_path_buf(),
        })?;

    let mut in_progress = Vec::new();
    expand_inner(&canonical, &mut in_progress)
}

/// One expansion frame: `path` must be canonical, `in_progress` holds the
/// canonical paths of every file currently being expanded on the stack.
fn expand_inner(path: &Path, in_progress: &mut Vec<PathBuf>) -> Result<String> {
    // Canonical file paths always have a parent
    let base_dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

    in_progress.push(path.to_path_buf());
    let mut buffer = read_file_contents(path)?;

    while let Some(marker) = find_marker(&buffer)? {
        let payload = marker.payload(&buffer);
        if payload.is_empty() {
            return Err(CompoteError::MalformedDirective {
                position: marker.start,
                message: "empty directive".to_string(),
            });
        }

        let component = resolve_component_path(payload, &base_dir);
        let component = canonicalize_component(&component, path)?;

        if in_progress.contains(&component) {
            return Err(CompoteError::IncludeCycle {
                path: component,
                referenced_by: path.to_path_buf(),
            });
        }

        let replacement = expand_inner(&component, in_progress)?;
        buffer = splice(&buffer, &marker, &replacement);
    }

    in_progress.pop();
    Ok(buffer)
}

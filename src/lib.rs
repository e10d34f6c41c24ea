//! # compote
//!
//! A recursive include preprocessor for static HTML (or any text) templates.
//! A template may reference component files with `{{path}}` directives; compote
//! splices each component's contents in place of its directive, descending into
//! components that are themselves templates, until no directive remains.
//!
//! ## Features
//!
//! - Process templates containing `{{header.html}}`-style directives
//! - Paths resolve relative to the *including* file's directory
//! - Nested components expand fully before being spliced in
//! - Cyclic includes are detected and reported, not looped on
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use std::path::Path;
//!
//! match compote::expand_file(Path::new("site/index.html")) {
//!     Ok(expanded) => println!("{}", expanded),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Expand a template into an output file
//! compote site/index.html dist/index.html
//!
//! # Check which components a template references
//! compote site/index.html --list=detailed
//! ```

pub mod error;
pub mod expand;
pub mod fs_utils;

// Re-export main types and functions for convenience
pub use error::{CompoteError, Result};
pub use expand::{
    DELIMITER_END, DELIMITER_START, Marker, expand_file, find_all_markers, find_marker, splice,
};

use clap::{Parser, ValueEnum};
use compote::fs_utils::{read_file_contents, resolve_component_path};
use compote::{Result, expand_file, find_all_markers};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LONG_HELP: &str = r#"
Directive syntax:
  {{header.html}}          - Splice in header.html from the template's directory
  {{partials/nav.html}}    - Paths may contain subdirectories
  {{../shared/foot.html}}  - ...and may point above the template's directory

Components are expanded recursively: a component may itself contain
directives, which resolve relative to the component's own directory.
Expansion stops with an error on a missing component, a malformed
directive, or a cyclic include.

Examples:
  # Expand a template into an output file
  compote site/index.html dist/index.html
  # Check that every referenced component exists (writes nothing)
  compote site/index.html --dry-run
  # List the directives of a template
  compote site/index.html --list
  # List with resolved paths and existence checks
  compote site/index.html --list=detailed
  # Output the directive list as JSON for scripting
  compote site/index.html --list=json

Template example:
  <html>
    <body>
      {{partials/header.html}}
      <main>Hello!</main>
      {{partials/footer.html}}
    </body>
  </html>
"#;

/// Recursive {{component}} include preprocessor for static HTML templates.
#[derive(Parser, Debug)]
#[command(
    name = "compote",
    version,
    about = "Recursive {{component}} include preprocessor for static HTML templates.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Template file to expand
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Output file (overwritten if it exists)
    #[arg(value_name = "OUTPUT", required_unless_present_any = ["list", "dry_run"])]
    output: Option<PathBuf>,

    /// Perform a dry run - validate directives without expanding
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,

    /// List directives in the template (optionally with format: plain, detailed, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain", conflicts_with = "dry_run")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ListFormat {
    /// Simple list of directive payloads
    Plain,
    /// Detailed information about each directive
    Detailed,
    /// JSON output for scripting
    Json,
}

#[derive(Serialize, Deserialize)]
struct DirectiveInfo {
    directive: String,
    start: usize,
    end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => LogLevel::Error,
        (false, 0) => LogLevel::Warn,
        (false, 1) => LogLevel::Info,
        (false, 2) => LogLevel::Debug,
        (false, _) => LogLevel::Trace,
    };

    let result = if cli.dry_run {
        dry_run(&cli.template, log_level)
    } else if let Some(list_format) = cli.list {
        list_directives(&cli.template, list_format)
    } else {
        expand_to_output(&cli.template, cli.output.as_deref(), log_level)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn expand_to_output(template: &Path, output: Option<&Path>, log_level: LogLevel) -> Result<()> {
    // clap guarantees the output argument outside --list/--dry-run
    let Some(output) = output else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no output path given",
        )
        .into());
    };

    log(
        log_level,
        LogLevel::Info,
        &format!("Expanding {}", template.display()),
    );
    let expanded = expand_file(template)?;

    log(
        log_level,
        LogLevel::Info,
        &format!("Writing output to {}", output.display()),
    );
    std::fs::write(output, expanded)?;

    log(log_level, LogLevel::Info, "Expansion complete!");
    Ok(())
}

/// Loads the template and locates its directives together with the base
/// directory they resolve against. Shared by the listing and dry-run modes.
fn scan_template(template: &Path) -> Result<(String, PathBuf)> {
    let canonical = template
        .canonicalize()
        .map_err(|_| compote::CompoteError::TemplateNotFound {
            path: template.to_path_buf(),
        })?;
    let buffer = read_file_contents(&canonical)?;
    let base_dir = canonical
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_path_buf();
    Ok((buffer, base_dir))
}

fn dry_run(template: &Path, log_level: LogLevel) -> Result<()> {
    log(
        log_level,
        LogLevel::Info,
        "Performing dry run - validating directives...",
    );

    let (buffer, base_dir) = scan_template(template)?;
    let markers = find_all_markers(&buffer)?;
    let directive_count = markers.len();

    let mut all_valid = true;
    let mut valid_count = 0;
    let mut invalid_count = 0;

    for marker in &markers {
        let payload = marker.payload(&buffer);
        let path = resolve_component_path(payload, &base_dir);
        if path.is_file() {
            log(
                log_level,
                LogLevel::Info,
                &format!("✓ {{{{{payload}}}}} -> {}", path.display()),
            );
            valid_count += 1;
        } else {
            log(
                log_level,
                LogLevel::Warn,
                &format!("✗ {{{{{payload}}}}} -> {} (not found)", path.display()),
            );
            invalid_count += 1;
            all_valid = false;
        }
    }

    println!("\nSummary: {directive_count} directives found");
    if valid_count > 0 {
        println!("  ✓ {valid_count} valid");
    }
    if invalid_count > 0 {
        println!("  ✗ {invalid_count} invalid");
    }

    if !all_valid {
        std::process::exit(1);
    }

    Ok(())
}

fn list_directives(template: &Path, format: ListFormat) -> Result<()> {
    let (buffer, base_dir) = scan_template(template)?;
    let markers = find_all_markers(&buffer)?;

    match format {
        ListFormat::Plain => {
            for marker in &markers {
                println!("{}", marker.payload(&buffer));
            }
        }
        ListFormat::Detailed => {
            for marker in &markers {
                let payload = marker.payload(&buffer);
                let path = resolve_component_path(payload, &base_dir);
                println!("Directive: {{{{{payload}}}}}");
                println!("  Position: {}..{}", marker.start, marker.end);
                println!("  Path: {}", path.display());
                println!("  Exists: {}", if path.is_file() { "yes" } else { "no" });
                if let Ok(metadata) = std::fs::metadata(&path) {
                    if metadata.is_file() {
                        println!("  Size: {} bytes", metadata.len());
                    }
                }
                println!();
            }
        }
        ListFormat::Json => {
            let mut infos = Vec::new();

            for marker in &markers {
                let payload = marker.payload(&buffer);
                let path = resolve_component_path(payload, &base_dir);
                let size = std::fs::metadata(&path)
                    .ok()
                    .filter(std::fs::Metadata::is_file)
                    .map(|m| m.len());

                infos.push(DirectiveInfo {
                    directive: payload.to_string(),
                    start: marker.start,
                    end: marker.end,
                    path: Some(path.display().to_string()),
                    exists: Some(path.is_file()),
                    size,
                });
            }

            let json = serde_json::to_string_pretty(&infos)?;
            println!("{json}");
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

fn log(current_level: LogLevel, message_level: LogLevel, message: &str) {
    if message_level >= current_level {
        eprintln!(
            "[{}] {}",
            match message_level {
                LogLevel::Trace => "TRACE",
                LogLevel::Debug => "DEBUG",
                LogLevel::Info => "INFO",
                LogLevel::Warn => "WARN",
                LogLevel::Error => "ERROR",
            },
            message
        );
    }
}

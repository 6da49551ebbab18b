//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output with a terminal color swatch
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use hexrang_core::{ColorRecord, HexColor};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single color record
    pub fn print_record(&self, record: &ColorRecord) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "{}  {}  {}",
                    swatch(&record.hex),
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    if record.synced { "synced" } else { "local" }
                );
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(record).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", record.hex);
            }
        }
    }

    /// Print a list of color records
    pub fn print_records(&self, records: &[ColorRecord]) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No colors found.");
                    return;
                }
                for record in records {
                    println!(
                        "{}  {}  {}",
                        swatch(&record.hex),
                        record.created_at.format("%Y-%m-%d %H:%M"),
                        if record.synced { "synced" } else { "local" }
                    );
                }
                println!("\n{} color(s)", records.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(records).unwrap());
            }
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.hex);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Render a color as a terminal swatch with the hex value on top
///
/// Picks black or white text from the color's luminance so the label stays
/// readable.
fn swatch(hex: &HexColor) -> String {
    let (r, g, b) = hex.rgb();
    let fg = if hex.luminance() > 0.6 { 0 } else { 255 };
    format!(
        "\x1b[48;2;{};{};{}m\x1b[38;2;{fg};{fg};{fg}m {} \x1b[0m",
        r, g, b, hex
    )
}

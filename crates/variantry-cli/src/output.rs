//! Output management and formatting.
//!
//! Status lines (`success`, `info`, ...) are decoration and respect
//! `--quiet`. Payloads (`data`, `json`, `table`) are the command's result and
//! are always written.

use std::io::{self, IsTerminal};

use console::{Alignment, Term, measure_text_width, pad_str};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins over `output.format`; Auto resolves to Human on a
        // TTY and Plain when piped.
        let requested = match args.output_format {
            OutputFormat::Auto => OutputFormat::from_config(&config.output.format),
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Status lines ──────────────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status("\u{2713}", msg, |s| s.green().bold().to_string(), |s| {
            s.green().to_string()
        })
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status("\u{26a0}", msg, |s| s.yellow().bold().to_string(), |s| {
            s.yellow().to_string()
        })
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status("\u{2139}", msg, |s| s.blue().bold().to_string(), |s| {
            s.blue().to_string()
        })
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// JSON mode carries status in the payload, so status lines are dropped.
    fn status(
        &self,
        icon: &str,
        msg: &str,
        paint_icon: impl Fn(&str) -> String,
        paint_msg: impl Fn(&str) -> String,
    ) -> io::Result<()> {
        if self.quiet || self.is_json() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{icon} {msg}")
        } else {
            format!("{} {}", paint_icon(icon), paint_msg(msg))
        };
        self.term.write_line(&line)
    }

    // ── Payloads ──────────────────────────────────────────────────────────

    /// Raw result text, written even in quiet mode.
    pub fn data(&self, text: &str) -> io::Result<()> {
        self.term.write_line(text)
    }

    /// Pretty JSON of any serializable value.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Left-aligned table with a header row.
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
        for line in render_table(headers, rows) {
            let line = if self.no_color {
                line.text
            } else if line.is_header {
                line.text.bold().to_string()
            } else {
                line.text
            };
            self.term.write_line(&line)?;
        }
        Ok(())
    }

    /// Two-column `key: value` block.
    pub fn fields(&self, pairs: &[(&str, String)]) -> io::Result<()> {
        let width = pairs
            .iter()
            .map(|(k, _)| measure_text_width(k))
            .max()
            .unwrap_or(0);
        for (key, value) in pairs {
            let label = format!("{}:", pad_str(key, width, Alignment::Left, None));
            let label = if self.no_color {
                label
            } else {
                label.dimmed().to_string()
            };
            self.term.write_line(&format!("{label} {value}"))?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// `true` when results should be emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

struct TableLine {
    text: String,
    is_header: bool,
}

impl From<TableLine> for String {
    fn from(line: TableLine) -> Self {
        line.text
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<TableLine> {
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(measure_text_width(cell));
        }
    }

    let join = |cells: Vec<String>| cells.join("  ").trim_end().to_string();
    let pad = |cell: &str, i: usize| pad_str(cell, widths[i], Alignment::Left, None).into_owned();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(TableLine {
        text: join(headers.iter().enumerate().map(|(i, h)| pad(h, i)).collect()),
        is_header: true,
    });
    for row in rows {
        lines.push(TableLine {
            text: join(
                row.iter()
                    .take(widths.len())
                    .enumerate()
                    .map(|(i, c)| pad(c, i))
                    .collect(),
            ),
            is_header: false,
        });
    }
    lines
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! # Report Renderers
//!
//! Turn a [`ValidationReport`] into operator-facing output. Every entry is
//! rendered, valid or not, so one run shows every problem at once.
//!
//! | Name | Output |
//! |------|--------|
//! | `table` | Box-drawn `Key │ Value │ Message` table in schema order |
//! | `console` | One `KEY: value -> message` line per entry, successes first |
//! | `json` | The report as a JSON array |
//!
//! Absent values are shown as `n/a`. A host can also supply its own
//! function via [`Render::Custom`].

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

use envgate_schema::{ReportEntry, ValidationReport};

/// Placeholder shown for absent values.
pub const NO_VALUE: &str = "n/a";

const PASS_MARK: &str = "✓";
const FAIL_MARK: &str = "✗";

/// Renderer selection errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The requested renderer is not registered.
    #[error("renderer {name:?} not found (available: {available})")]
    UnknownRenderer {
        /// The name that was requested.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },
}

/// A report renderer.
#[derive(Default)]
pub enum Render {
    /// Box-drawn table.
    #[default]
    Table,
    /// Line-oriented log.
    Console,
    /// Machine-readable JSON.
    Json,
    /// Caller-supplied function; receives the report directly.
    Custom(Box<dyn Fn(&ValidationReport)>),
}

impl Render {
    /// Names accepted by [`select_render`].
    pub const NAMES: &'static [&'static str] = &["table", "console", "json"];

    /// Whether the output is meant for programs rather than people.
    pub fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Write `report` to `out`. [`Render::Custom`] ignores `out`.
    pub fn render(&self, report: &ValidationReport, out: &mut dyn Write) -> io::Result<()> {
        match self {
            Self::Table => render_table(report, out),
            Self::Console => render_console(report, out),
            Self::Json => {
                serde_json::to_writer_pretty(&mut *out, report)?;
                writeln!(out)
            }
            Self::Custom(f) => {
                f(report);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("Table"),
            Self::Console => f.write_str("Console"),
            Self::Json => f.write_str("Json"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Look up a renderer by name. There is no fallback for unknown names.
pub fn select_render(name: &str) -> Result<Render, RenderError> {
    match name {
        "table" => Ok(Render::Table),
        "console" => Ok(Render::Console),
        "json" => Ok(Render::Json),
        other => Err(RenderError::UnknownRenderer {
            name: other.to_string(),
            available: Render::NAMES.join(", "),
        }),
    }
}

fn display_value(entry: &ReportEntry) -> String {
    match &entry.value {
        Some(value) => {
            let shown = value.to_string();
            if shown.is_empty() {
                NO_VALUE.to_string()
            } else {
                shown
            }
        }
        None => NO_VALUE.to_string(),
    }
}

fn marked_message(entry: &ReportEntry) -> String {
    let mark = if entry.is_error() { FAIL_MARK } else { PASS_MARK };
    format!("{mark} {}", entry.message)
}

fn render_table(report: &ValidationReport, out: &mut dyn Write) -> io::Result<()> {
    let rows: Vec<[String; 3]> = report
        .iter()
        .map(|e| [e.key.clone(), display_value(e), marked_message(e)])
        .collect();

    let header = ["Key", "Value", "Message"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    };
    let line = |cells: [&str; 3]| {
        format!(
            "│ {:<w0$} │ {:<w1$} │ {:<w2$} │",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )
    };

    writeln!(out, "{}", rule("┌", "┬", "┐"))?;
    writeln!(out, "{}", line(header))?;
    writeln!(out, "{}", rule("├", "┼", "┤"))?;
    for row in &rows {
        writeln!(out, "{}", line([row[0].as_str(), row[1].as_str(), row[2].as_str()]))?;
    }
    writeln!(out, "{}", rule("└", "┴", "┘"))
}

fn render_console(report: &ValidationReport, out: &mut dyn Write) -> io::Result<()> {
    let (errors, passed): (Vec<&ReportEntry>, Vec<&ReportEntry>) =
        report.iter().partition(|e| e.is_error());
    for entry in passed.into_iter().chain(errors) {
        writeln!(
            out,
            "{} {}: {} -> {}",
            if entry.is_error() { FAIL_MARK } else { PASS_MARK },
            entry.key,
            display_value(entry),
            entry.message
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use envgate_schema::{validate, Schema, VariantTag};

    fn report() -> ValidationReport {
        let schema = Schema::new()
            .with("PORT", VariantTag::Integer)
            .with("HOST", VariantTag::String)
            .with("API_URL", VariantTag::Url);
        let env: HashMap<String, String> = [("PORT", "abc"), ("HOST", "localhost")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        validate(&schema, &env).unwrap()
    }

    fn render_to_string(render: &Render) -> String {
        let mut buf = Vec::new();
        render.render(&report(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_console_lists_successes_first() {
        let out = render_to_string(&Render::Console);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "✓ HOST: localhost -> success",
                "✗ PORT: abc -> Invalid integer",
                "✗ API_URL: n/a -> Variable is required",
            ]
        );
    }

    #[test]
    fn test_table_rows_in_schema_order() {
        let out = render_to_string(&Render::Table);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 7, "{out}");
        assert!(lines[0].starts_with('┌') && lines[6].starts_with('└'));
        assert!(lines[1].contains("Key") && lines[1].contains("Message"));
        assert!(lines[3].contains("PORT") && lines[3].contains("✗ Invalid integer"));
        assert!(lines[4].contains("HOST") && lines[4].contains("✓ success"));
        assert!(lines[5].contains("API_URL") && lines[5].contains("n/a"));
    }

    #[test]
    fn test_table_columns_align() {
        let out = render_to_string(&Render::Table);
        let widths: Vec<usize> = out.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{out}");
    }

    #[test]
    fn test_json_is_array_of_entries() {
        let out = render_to_string(&Render::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
        assert_eq!(parsed[2]["status"], "missing");
    }

    #[test]
    fn test_custom_receives_report() {
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let render = Render::Custom(Box::new(move |r: &ValidationReport| sink.set(r.len())));
        let mut buf = Vec::new();
        render.render(&report(), &mut buf).unwrap();
        assert_eq!(seen.get(), 3);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_only_json_is_machine_readable() {
        assert!(Render::Json.is_machine_readable());
        assert!(!Render::Table.is_machine_readable());
        assert!(!Render::Console.is_machine_readable());
    }

    #[test]
    fn test_unknown_renderer_is_error() {
        let err = select_render("fancy").unwrap_err();
        assert_eq!(
            err,
            RenderError::UnknownRenderer {
                name: "fancy".into(),
                available: "table, console, json".into()
            }
        );
        for name in Render::NAMES {
            assert!(select_render(name).is_ok());
        }
    }
}

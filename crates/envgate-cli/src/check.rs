//! # Check and Lint Subcommands
//!
//! `envgate check` validates the collected environment against a schema,
//! renders every entry and maps the verdict to an exit code.
//! `envgate lint` resolves a schema without reading any environment.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Every variable is valid (or the schema resolves) |
//! | 1 | At least one variable is missing or invalid (or the schema is broken) |
//! | 2 | Operational error: unreadable files, unknown backend or renderer |
//!
//! A broken schema entry hit during `check` aborts the run as an
//! operational error; `lint` exists to find those before deploy.
//!
//! With the `json` renderer stdout carries the report document alone; the
//! failure footer and the success confirmation are not written.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use envgate_schema::{select_backend, Schema, SchemaError, ValidationReport, ValidatorOptions};

use crate::env::{self, EnvSources};
use crate::render::select_render;

/// Confirmation printed after a clean run.
pub const ALL_VALID: &str = "✓ All environment variables are valid";

/// Where the schema comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SchemaSource {
    /// Options file with `validator`, `render` and `schema` keys (YAML or JSON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bare schema file (YAML or JSON).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

impl SchemaSource {
    fn load(&self) -> Result<ValidatorOptions> {
        match (&self.config, &self.schema) {
            (Some(path), _) => ValidatorOptions::from_path(path)
                .with_context(|| format!("failed to load options from {}", path.display())),
            (None, Some(path)) => Schema::from_path(path)
                .map(ValidatorOptions::new)
                .with_context(|| format!("failed to load schema from {}", path.display())),
            (None, None) => bail!("one of --config or --schema is required"),
        }
    }
}

/// The build phase the host is running in.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostCommand {
    /// Interactive development server; prints the success confirmation.
    #[default]
    Serve,
    /// Non-interactive build; stays quiet on success.
    Build,
}

/// Arguments for the `envgate check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Dotenv file to read. Repeatable; later files win.
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_files: Vec<PathBuf>,

    /// Ignore the process environment and use only the env files.
    #[arg(long)]
    pub no_process_env: bool,

    /// Validator backend (overrides the options file).
    #[arg(long)]
    pub backend: Option<String>,

    /// Renderer: table, console or json (overrides the options file).
    #[arg(long)]
    pub render: Option<String>,

    /// Build phase; `build` suppresses the success confirmation.
    #[arg(long, value_enum, default_value_t = HostCommand::Serve)]
    pub command: HostCommand,

    /// On failure, list the names of every variable that was found.
    #[arg(long)]
    pub show_found: bool,
}

/// Arguments for the `envgate lint` subcommand.
#[derive(Args, Debug, Clone)]
pub struct LintArgs {
    #[command(flatten)]
    pub source: SchemaSource,

    /// Validator backend (overrides the options file).
    #[arg(long)]
    pub backend: Option<String>,
}

/// Execute the check subcommand, writing to stdout.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    check_to(args, &mut stdout.lock())
}

/// Execute the check subcommand, writing to `out`.
pub fn check_to(args: &CheckArgs, out: &mut dyn Write) -> Result<u8> {
    let options = args.source.load()?;

    let backend = select_backend(args.backend.as_deref().or(options.validator.as_deref()))?;
    let render = match args.render.as_deref().or(options.render.as_deref()) {
        Some(name) => select_render(name)?,
        None => Default::default(),
    };

    let env = env::collect(&EnvSources {
        env_files: args.env_files.clone(),
        process_env: !args.no_process_env,
    })?;

    tracing::info!(
        backend = backend.as_str(),
        keys = options.schema.len(),
        found = env.len(),
        "validating environment"
    );

    let report = backend
        .validate(&options.schema, &env)
        .context("schema is invalid")?;

    render.render(&report, out)?;

    // Machine-readable output carries the verdict in the exit code only.
    let annotate = !render.is_machine_readable();

    if !report.is_valid() {
        if annotate {
            write_failure_footer(&report, &env, args.show_found, out)?;
        }
        return Ok(1);
    }

    if annotate && args.command == HostCommand::Serve {
        writeln!(out, "{ALL_VALID}")?;
    }
    Ok(0)
}

fn write_failure_footer(
    report: &ValidationReport,
    env: &BTreeMap<String, String>,
    show_found: bool,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "\n{report}")?;
    if show_found {
        writeln!(out, "\nFound environment variables:")?;
        if env.is_empty() {
            writeln!(out, "  (no variables found)")?;
        }
        for key in env.keys() {
            writeln!(out, "  - {key}")?;
        }
    }
    writeln!(out, "\nPlease check your .env file")?;
    Ok(())
}

/// Execute the lint subcommand, writing to stdout.
///
/// Returns exit code: 0 if every entry resolves, 1 if one does not.
pub fn run_lint(args: &LintArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    lint_to(args, &mut stdout.lock())
}

/// Execute the lint subcommand, writing to `out`.
pub fn lint_to(args: &LintArgs, out: &mut dyn Write) -> Result<u8> {
    let options = args.source.load()?;
    let backend = select_backend(args.backend.as_deref().or(options.validator.as_deref()))?;

    match options.schema.resolve_all(backend) {
        Ok(()) => {
            writeln!(
                out,
                "✓ Schema OK: {} variable(s), {backend} backend",
                options.schema.len()
            )?;
            Ok(0)
        }
        Err(e @ (SchemaError::UnknownVariant { .. } | SchemaError::InvalidSchemaValue { .. })) => {
            writeln!(out, "✗ {e}")?;
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

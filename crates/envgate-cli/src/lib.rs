//! # envgate-cli: Environment Validation Host
//!
//! Provides the `envgate` command-line interface: collects the environment
//! from the process and dotenv files, validates it against a schema and
//! renders the report.
//!
//! ## Subcommands
//!
//! - `envgate check`: validate the environment, exit non-zero on failure.
//! - `envgate lint`: resolve a schema without reading the environment.
//!
//! ```bash
//! envgate check --schema env.schema.yaml --env-file .env --env-file .env.local
//! envgate check --config envgate.yaml --command build --render console
//! envgate lint --schema env.schema.yaml
//! ```
//!
//! The library never terminates the process; handlers return an exit code
//! and `main` maps it.

pub mod check;
pub mod env;
pub mod render;

pub use check::{run_check, run_lint, CheckArgs, HostCommand, LintArgs, SchemaSource};
pub use render::{select_render, Render, RenderError};

//! Main CLI application
//!
//! `App` carries one extracted signature plus its presentation metadata and
//! evaluates a process argument vector into an outcome. `run` is the thin
//! process wrapper: it registers the entry point, prints, and exits.

use crate::bind::{bind, clean_args, BoundArgs, CleanArgs};
use crate::error::{CliError, ExtractError, Result};
use crate::extract::{extract, Extraction, ANONYMOUS_ORIGIN};
use crate::help::{format_docstring, help_text};
use crate::model::ParamSpec;
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

/// A CLI application derived from one entry-point signature
#[derive(Debug, Clone)]
pub struct App {
    /// Program name shown in usage and version output
    name: String,

    /// Version string; enables `--version` when present
    version: Option<String>,

    /// Normalized docstring shown in the help description section
    docstring: String,

    /// Extracted parameter model, declaration order, no internals
    params: Vec<ParamSpec>,
}

/// What evaluating a process argument vector decided
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Print the help text and exit successfully
    Help(String),

    /// Print the version line and exit successfully
    Version(String),

    /// Invoke the entry point with the bound arguments
    Invoke(BoundArgs),
}

impl App {
    /// Build an application from signature source text
    pub fn from_signature(name: impl Into<String>, source: &str) -> Result<Self> {
        Self::build(name.into(), source, ANONYMOUS_ORIGIN)
    }

    /// Build an application from a signature file
    pub fn from_signature_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ExtractError::SignatureFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::build(name.into(), &source, &path.display().to_string())
    }

    fn build(name: String, source: &str, origin: &str) -> Result<Self> {
        let Extraction { params, docstring } = extract(source, origin)?;
        let docstring = match docstring {
            Some(text) => format_docstring(&text)?,
            None => String::new(),
        };
        Ok(App {
            name,
            version: None,
            docstring,
            params,
        })
    }

    /// Enable `--version` with the given version string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replace the description shown in help output
    pub fn with_description(mut self, text: &str) -> Result<Self> {
        self.docstring = format_docstring(text)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extracted parameter model, in declaration order
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// The rendered help text
    pub fn help(&self) -> String {
        help_text(&self.name, &self.params_with_internal(), &self.docstring)
    }

    /// Evaluate a process argument vector.
    ///
    /// `--help` and, when a version exists, `--version` are intercepted
    /// before any binding; everything else flows through the binder against
    /// a fresh copy of the parameter set.
    pub fn evaluate<S: AsRef<str>>(&self, argv: &[S]) -> Result<Outcome> {
        self.evaluate_clean(clean_args(argv))
    }

    fn evaluate_clean(&self, args: CleanArgs) -> Result<Outcome> {
        if args.has_named("help") {
            return Ok(Outcome::Help(self.help()));
        }
        if args.has_named("version") {
            if let Some(version) = &self.version {
                return Ok(Outcome::Version(format!(
                    "{} version {}",
                    self.name, version
                )));
            }
            // Without a version string, `--version` is just an unknown flag
        }

        // One parameter set per evaluation cycle
        let mut params = self.params.clone();
        let bound = bind(&mut params, &args)?;
        Ok(Outcome::Invoke(bound))
    }

    /// The parameter set plus the synthesized internal options
    fn params_with_internal(&self) -> Vec<ParamSpec> {
        let mut params = self.params.clone();
        params.push(ParamSpec::internal("help", "Show this message"));
        if self.version.is_some() {
            params.push(ParamSpec::internal(
                "version",
                format!("Display {} version", self.name),
            ));
        }
        params
    }
}

/// Guard against two competing entry points in one process.
///
/// The flag is set exactly once; a second registration is a configuration
/// error, not a race, and it is never cleared outside test code.
#[derive(Debug)]
pub struct Registry {
    bound: AtomicBool,
}

impl Registry {
    pub const fn new() -> Self {
        Registry {
            bound: AtomicBool::new(false),
        }
    }

    /// Claim the process entry-point slot
    pub fn register(&self) -> Result<()> {
        if self.bound.swap(true, Ordering::SeqCst) {
            return Err(CliError::DuplicateBinding);
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry used by [`run`]
static REGISTRY: Registry = Registry::new();

/// Run the application against the process argument vector and exit codes.
///
/// Prints help/version to stdout, failures to stderr, and returns the
/// exit code for `main`.
pub fn run<F>(app: App, entry: F) -> ExitCode
where
    F: FnOnce(BoundArgs) -> anyhow::Result<()>,
{
    let argv: Vec<String> = std::env::args().skip(1).collect();
    run_with(&REGISTRY, app, &argv, entry)
}

/// Like [`run`], with an explicit registry and argument vector
pub fn run_with<F, S>(registry: &Registry, app: App, argv: &[S], entry: F) -> ExitCode
where
    F: FnOnce(BoundArgs) -> anyhow::Result<()>,
    S: AsRef<str>,
{
    if let Err(e) = registry.register() {
        eprintln!("{}", e.to_string().red());
        return ExitCode::FAILURE;
    }

    match app.evaluate(argv) {
        Ok(Outcome::Help(text)) | Ok(Outcome::Version(text)) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Invoke(args)) => match entry(args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

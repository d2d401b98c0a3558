//! Printing subsystem adapter.
//!
//! [`PrintBackend`] is the seam between the session and the local printing
//! system. [`CupsBackend`] drives the CUPS command-line clients.

use std::fmt;
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info, warn};

use crate::error::{NoPrintersError, PrintError, SubmitError};

/// Identifier the printing subsystem assigned to a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local printing subsystem that can enumerate printers and accept jobs.
pub trait PrintBackend {
    /// Names of every available destination.
    fn list_printers(&self) -> Result<Vec<String>, SubmitError>;

    /// The system default destination, if one is configured.
    fn default_printer(&self) -> Result<Option<String>, SubmitError>;

    /// Submit `document` to `printer` with the given key/value options.
    fn submit(
        &self,
        printer: &str,
        document: &Path,
        title: &str,
        options: &[(&'static str, String)],
    ) -> Result<JobId, SubmitError>;
}

/// List printers, failing with [`NoPrintersError`] when there are none.
pub fn available_printers(
    backend: &dyn PrintBackend,
) -> Result<Vec<String>, PrintError> {
    let printers = backend.list_printers()?;
    if printers.is_empty() {
        return Err(NoPrintersError.into());
    }
    Ok(printers)
}

/// Pick the printer to use: the requested one, else the system default,
/// else the first available destination.
///
/// A failed default lookup is logged and falls through to the listed
/// destinations.
pub fn resolve_printer(
    backend: &dyn PrintBackend,
    requested: Option<&str>,
) -> Result<String, PrintError> {
    if let Some(name) = requested {
        return Ok(name.to_string());
    }
    match backend.default_printer() {
        Ok(Some(name)) => return Ok(name),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not query the default printer"),
    }
    let printers = available_printers(backend)?;
    Ok(printers[0].clone())
}

/// Printing through the CUPS `lpstat` and `lp` commands.
#[derive(Debug, Clone)]
pub struct CupsBackend {
    lpstat: String,
    lp: String,
}

impl Default for CupsBackend {
    fn default() -> Self {
        Self::with_commands("lpstat", "lp")
    }
}

impl CupsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use alternative `lpstat`/`lp` executables.
    pub fn with_commands(lpstat: impl Into<String>, lp: impl Into<String>) -> Self {
        Self {
            lpstat: lpstat.into(),
            lp: lp.into(),
        }
    }

    fn run(&self, program: &str, args: &[String]) -> Result<Output, SubmitError> {
        debug!(program, ?args, "running CUPS client");
        // Output is parsed, so keep the messages untranslated.
        Command::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .output()
            .map_err(|source| SubmitError::Spawn {
                command: program.to_string(),
                source,
            })
    }
}

impl PrintBackend for CupsBackend {
    fn list_printers(&self) -> Result<Vec<String>, SubmitError> {
        let output = self.run(&self.lpstat, &["-e".to_string()])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            // lpstat exits non-zero when no destinations exist.
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stdout.trim().is_empty() && stderr.contains("No destinations") {
                return Ok(Vec::new());
            }
            return Err(failure(&self.lpstat, &output));
        }
        Ok(parse_printer_list(&stdout))
    }

    fn default_printer(&self) -> Result<Option<String>, SubmitError> {
        let output = self.run(&self.lpstat, &["-d".to_string()])?;
        if !output.status.success() {
            return Err(failure(&self.lpstat, &output));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_default_printer(&stdout).ok_or_else(|| SubmitError::UnexpectedOutput {
            command: self.lpstat.clone(),
            output: stdout.to_string(),
        })
    }

    fn submit(
        &self,
        printer: &str,
        document: &Path,
        title: &str,
        options: &[(&'static str, String)],
    ) -> Result<JobId, SubmitError> {
        let args = lp_args(printer, document, title, options);
        let output = self.run(&self.lp, &args)?;
        if !output.status.success() {
            return Err(failure(&self.lp, &output));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let job = parse_request_id(&stdout).ok_or_else(|| SubmitError::UnexpectedOutput {
            command: self.lp.clone(),
            output: stdout.to_string(),
        })?;
        info!(printer, %job, "print job submitted");
        Ok(job)
    }
}

fn failure(command: &str, output: &Output) -> SubmitError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let message = if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr
    };
    SubmitError::Failed {
        command: command.to_string(),
        message,
    }
}

/// Build the `lp` argument list. `copies` maps to `-n`; every other option
/// is passed as `-o key=value`.
fn lp_args(
    printer: &str,
    document: &Path,
    title: &str,
    options: &[(&'static str, String)],
) -> Vec<String> {
    let mut args = vec![
        "-d".to_string(),
        printer.to_string(),
        "-t".to_string(),
        title.to_string(),
    ];
    for (key, value) in options {
        if *key == "copies" {
            args.push("-n".to_string());
            args.push(value.clone());
        } else {
            args.push("-o".to_string());
            args.push(format!("{key}={value}"));
        }
    }
    args.push("--".to_string());
    args.push(document.to_string_lossy().into_owned());
    args
}

/// Parse `lpstat -e` output: one destination per line.
fn parse_printer_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `lpstat -d` output.
///
/// Returns `Some(None)` when CUPS reports no default destination and `None`
/// when the output is not recognised.
fn parse_default_printer(stdout: &str) -> Option<Option<String>> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.starts_with("no system default destination") {
        return Some(None);
    }
    let (_, name) = line.split_once("system default destination:")?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Some(name.to_string()))
}

/// Parse `lp` output of the form `request id is office-42 (1 file(s))`.
fn parse_request_id(stdout: &str) -> Option<JobId> {
    stdout.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("request id is ")?;
        let id = rest.split_whitespace().next()?;
        Some(JobId(id.to_string()))
    })
}

//! External compiler invocation.
//!
//! The package files are only a description; the `.mobi` itself comes from
//! an external compiler (`kindlegen` unless `[compiler] program` says
//! otherwise). The run is:
//!
//! ```text
//! <program> <args...> -o <output_filename> folio.opf
//! ```
//!
//! executed in the book directory with stdout and stderr passed straight
//! through. Availability is checked with [`ensure_available`] once, before
//! anything is generated, so a missing compiler never leaves a half-written
//! tree behind.

use crate::config::CompilerConfig;
use crate::document::{Document, OPF_FILE};
use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("{0} not found on PATH. Please install it or set [compiler] program in _document.toml")]
    NotFound(String),
    #[error("Failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("{program} failed ({status})")]
    Failed { program: String, status: ExitStatus },
}

impl CompilerError {
    /// Process exit code to propagate, if the compiler produced one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CompilerError::Failed { status, .. } => status.code(),
            _ => None,
        }
    }
}

/// Exit code for this process after the compiler exited with `code`.
///
/// Codes 1..=255 pass through. Anything else (a signal kill, an out of range
/// or zero code on a failure path) becomes 1.
pub fn cli_exit_code(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c).ok())
        .filter(|c| *c != 0)
        .unwrap_or(1)
}

/// Resolve the configured compiler, failing if it cannot be found.
pub fn ensure_available(config: &CompilerConfig) -> Result<PathBuf, CompilerError> {
    let found = find_program(&config.program, env::var_os("PATH").as_deref())
        .ok_or_else(|| CompilerError::NotFound(config.program.clone()))?;
    info!("Found {} at {}", config.program, found.display());
    Ok(found)
}

/// Locate `program` the way a shell would.
///
/// A name with a directory component (`./bin/kindlegen`, `/opt/kindlegen`)
/// is checked as-is; a bare name is searched in every `path_var` entry.
pub fn find_program(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    env::split_paths(path_var?)
        .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
        .find(|path| is_executable(path))
}

fn executable_names(program: &str) -> impl Iterator<Item = String> {
    let exe = cfg!(windows).then(|| format!("{}.exe", program));
    std::iter::once(program.to_string()).chain(exe)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Build the compiler command for `document` in `root`.
pub fn command(root: &Path, document: &Document, config: &CompilerConfig) -> Command {
    let mut cmd = Command::new(&config.program);
    cmd.args(&config.args)
        .arg("-o")
        .arg(&document.output_filename)
        .arg(OPF_FILE)
        .current_dir(root);
    cmd
}

/// Run the compiler and report its exit status. No retries.
pub fn invoke(
    root: &Path,
    document: &Document,
    config: &CompilerConfig,
) -> Result<ExitStatus, CompilerError> {
    let mut cmd = command(root, document, config);
    info!("Running {:?}", cmd);

    let status = cmd.status().map_err(|source| CompilerError::Spawn {
        program: config.program.clone(),
        source,
    })?;

    if !status.success() {
        return Err(CompilerError::Failed {
            program: config.program.clone(),
            status,
        });
    }
    info!("Wrote {}", root.join(&document.output_filename).display());
    Ok(status)
}

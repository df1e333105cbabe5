//! External process execution
//!
//! Every external command forged runs goes through a [`ProcessRunner`]:
//! an argument vector plus an explicit working directory, never a shell
//! string. The system runner inherits stdin/stdout/stderr so interactive
//! prompts (sudo password entry, makepkg questions) keep working.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ProcessError;

/// One external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Working directory for the child
    pub cwd: PathBuf,
}

impl Invocation {
    /// Create an invocation of `program` in `cwd`
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, or `None` when the child was killed by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    /// Outcome with the given exit code
    pub fn code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the child exited with code 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to run an external command to completion
pub trait ProcessRunner {
    /// Run `invocation`, blocking until it exits
    ///
    /// A non-zero exit is reported through [`ExitOutcome`], not as an error;
    /// errors mean the child could not be started or waited on.
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, ProcessError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, ProcessError> {
        (**self).run(invocation)
    }
}

/// Runs commands as real child processes with inherited stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome, ProcessError> {
        tracing::debug!(
            "Running `{invocation}` in {}",
            invocation.cwd.display()
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ProcessError::Spawn {
                program: invocation.program.clone(),
                error: e.to_string(),
            })?;

        let status = child.wait().map_err(|e| ProcessError::Wait {
            program: invocation.program.clone(),
            error: e.to_string(),
        })?;

        tracing::debug!("`{}` exited with {status}", invocation.program);
        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

/// Whether `program` resolves on PATH (or is an existing path)
pub fn is_available(program: &str) -> bool {
    if Path::new(program).components().count() > 1 {
        return Path::new(program).is_file();
    }
    which::which(program).is_ok()
}

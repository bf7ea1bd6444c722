//! External command abstraction.
//!
//! Every external invocation funnels through [`capture`], which turns both
//! nonzero exits and launch failures into data. Callers branch on the
//! captured status explicitly instead of handling panics or stringly-typed
//! errors.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Outcome of one external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status; `None` when the process could not be launched or was
    /// killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Diagnostic stream for error reporting: stderr, falling back to
    /// stdout when the tool wrote its complaint there.
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Run a command in `cwd`, capturing stdout and stderr to completion.
pub fn capture<S>(program: &str, args: &[S], cwd: &Path) -> CommandOutput
where
    S: AsRef<OsStr>,
{
    let result = Command::new(program).args(args).current_dir(cwd).output();
    match result {
        Ok(output) => {
            let captured = CommandOutput {
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            debug!(program, status = ?captured.status, "external command finished");
            captured
        }
        Err(err) => {
            debug!(program, %err, "external command failed to launch");
            CommandOutput {
                status: None,
                stdout: String::new(),
                stderr: format!("failed to launch {program}: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_on_success() {
        let out = capture("sh", &["-c", "echo hello"], Path::new("."));
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_is_data_not_error() {
        let out = capture("sh", &["-c", "echo oops >&2; exit 3"], Path::new("."));
        assert_eq!(out.status, Some(3));
        assert!(!out.success());
        assert_eq!(out.diagnostics().trim(), "oops");
    }

    #[test]
    fn launch_failure_is_data_not_error() {
        let out = capture("gatetune-no-such-binary", &[] as &[&str], Path::new("."));
        assert_eq!(out.status, None);
        assert!(!out.success());
        assert!(out.diagnostics().contains("failed to launch"));
    }

    #[test]
    fn diagnostics_fall_back_to_stdout() {
        let out = capture("sh", &["-c", "echo complaint; exit 1"], Path::new("."));
        assert_eq!(out.diagnostics().trim(), "complaint");
    }
}

//! Trial runner for the compiled simulator.

use crate::command::capture;
use std::path::Path;
use tracing::debug;

/// Execute a built simulator with `-t <trials>` and capture its stdout.
///
/// A nonzero exit or a launch failure yields an empty capture rather than
/// an error: the caller treats the grid point as having produced no
/// measurable result. No timeout is imposed; the simulator's own trial
/// count bounds its runtime.
pub fn run_trials(exe: &Path, trials: u32, work_dir: &Path) -> String {
    let program = if exe.is_absolute() {
        exe.to_string_lossy().into_owned()
    } else {
        // Command resolves bare relative paths against PATH, not cwd.
        format!("./{}", exe.to_string_lossy())
    };
    let output = capture(&program, &["-t".to_string(), trials.to_string()], work_dir);
    if !output.success() {
        debug!(exe = %exe.display(), status = ?output.status, "trial run failed");
        return String::new();
    }
    output.stdout
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_stub(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn captures_stdout_and_forwards_trials() {
        let dir = tempfile::tempdir().unwrap();
        write_stub(dir.path(), "sim.elf", "echo \"args: $*\"");
        let out = run_trials(Path::new("sim.elf"), 10, dir.path());
        assert_eq!(out.trim(), "args: -t 10");
    }

    #[test]
    fn nonzero_exit_yields_empty_capture() {
        let dir = tempfile::tempdir().unwrap();
        write_stub(dir.path(), "sim.elf", "echo partial; exit 1");
        let out = run_trials(Path::new("sim.elf"), 10, dir.path());
        assert!(out.is_empty());
    }

    #[test]
    fn missing_executable_yields_empty_capture() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_trials(Path::new("sim.elf"), 10, dir.path());
        assert!(out.is_empty());
    }
}

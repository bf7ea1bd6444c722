//! Two-stage build driver.
//!
//! Stage one compiles the generated composition unit to an object file;
//! stage two links the generated main unit against that object and the math
//! library into an executable. Both stages report failure as a typed error
//! carrying the external compiler's exit status and diagnostic stream.

use crate::command::capture;
use gatetune_template::GeneratedSources;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build setup failed: {0}")]
    Setup(#[from] std::io::Error),
    #[error("compile stage failed (status {status:?}): {diagnostics}")]
    Compile {
        status: Option<i32>,
        diagnostics: String,
    },
    #[error("link stage failed (status {status:?}): {diagnostics}")]
    Link {
        status: Option<i32>,
        diagnostics: String,
    },
}

/// The external compiler invocation shapes. Defaults match the simulator's
/// own build (`g++ -O2 -D INTEL`); the compiler binary is swappable, which
/// the integration tests use to substitute a stub.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub compiler: String,
    pub opt_flag: String,
    pub define: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            opt_flag: "-O2".to_string(),
            define: "INTEL".to_string(),
        }
    }
}

impl Toolchain {
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Build `sources` into an executable at `exe_path`, leaving the
    /// intermediate object at `object_path`. Output directories are created
    /// if absent; creation is a no-op when they already exist.
    ///
    /// Paths may be relative; they resolve against `work_dir`, which is also
    /// the compiler's working directory so the main unit's relative include
    /// path resolves.
    pub fn build(
        &self,
        work_dir: &Path,
        sources: &GeneratedSources,
        object_path: &Path,
        exe_path: &Path,
    ) -> Result<(), BuildError> {
        for out in [object_path, exe_path] {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(work_dir.join(parent))?;
                }
            }
        }

        let compose = relative_to(&sources.compose_path, work_dir);
        let main = relative_to(&sources.main_path, work_dir);
        let object = object_path.to_string_lossy().into_owned();
        let exe = exe_path.to_string_lossy().into_owned();

        debug!(object = %object_path.display(), "compile stage");
        let compile_args = vec![
            self.opt_flag.clone(),
            "-D".to_string(),
            self.define.clone(),
            "-c".to_string(),
            "-o".to_string(),
            object.clone(),
            compose.to_string_lossy().into_owned(),
        ];
        let compiled = capture(&self.compiler, &compile_args, work_dir);
        if !compiled.success() {
            return Err(BuildError::Compile {
                status: compiled.status,
                diagnostics: compiled.diagnostics().to_string(),
            });
        }

        debug!(exe = %exe_path.display(), "link stage");
        let link_args = vec![
            self.opt_flag.clone(),
            "-D".to_string(),
            self.define.clone(),
            "-o".to_string(),
            exe,
            main.to_string_lossy().into_owned(),
            object,
            "-lm".to_string(),
        ];
        let linked = capture(&self.compiler, &link_args, work_dir);
        if !linked.success() {
            return Err(BuildError::Link {
                status: linked.status,
                diagnostics: linked.diagnostics().to_string(),
            });
        }

        Ok(())
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

/// Removes the file at `path` when dropped. Used by the sweep to guarantee
/// the temporary executable disappears on every exit path.
#[derive(Debug)]
pub struct RemoveOnDrop(pub PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.0) {
            if err.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %self.0.display(), %err, "failed to remove build artifact");
            }
        }
    }
}

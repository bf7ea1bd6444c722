//! Variant generation: instantiating template pairs on disk.

use crate::slots::{ComposeTemplate, MainTemplate};
use anyhow::{Context, Result};
use gatetune_gates::{GateSpec, GridPoint};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A generated source pair on disk. Both files are removed when the guard
/// drops, whatever happens to the build that consumes them.
#[derive(Debug)]
pub struct GeneratedSources {
    pub compose_path: PathBuf,
    pub main_path: PathBuf,
    /// Include path of the compose unit as written into the main unit,
    /// relative to the working directory.
    pub compose_include: String,
}

impl Drop for GeneratedSources {
    fn drop(&mut self) {
        for path in [&self.compose_path, &self.main_path] {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %path.display(), %err, "failed to remove generated source");
                }
            }
        }
    }
}

/// Holds the validated template pair and writes concrete variants.
///
/// The generator only writes files; it never invokes the toolchain.
#[derive(Debug, Clone)]
pub struct VariantGenerator {
    compose: ComposeTemplate,
    main: MainTemplate,
}

impl VariantGenerator {
    pub fn new(compose: ComposeTemplate, main: MainTemplate) -> Self {
        Self { compose, main }
    }

    /// Load and validate both templates from disk.
    pub fn load(compose_path: &Path, main_path: &Path) -> Result<Self> {
        let compose_text = fs::read_to_string(compose_path).with_context(|| {
            format!("reading compose template {}", compose_path.display())
        })?;
        let main_text = fs::read_to_string(main_path)
            .with_context(|| format!("reading main template {}", main_path.display()))?;
        let compose = ComposeTemplate::parse(compose_text)
            .with_context(|| format!("validating {}", compose_path.display()))?;
        let main = MainTemplate::parse(main_text)
            .with_context(|| format!("validating {}", main_path.display()))?;
        Ok(Self::new(compose, main))
    }

    /// Write the shared (non-specialized) variant pair for one grid point.
    /// The sweep processes one point at a time, so a single reusable name
    /// pair suffices.
    pub fn write_sweep_variant(
        &self,
        work_dir: &Path,
        point: GridPoint,
    ) -> Result<GeneratedSources> {
        self.write_pair(
            work_dir,
            point,
            "compose_temp.cpp",
            "main_temp.cpp",
            None,
        )
    }

    /// Write a gate-specialized variant pair. File names embed the gate
    /// identifier so concurrent gates in one working directory cannot
    /// collide.
    pub fn write_specialized_variant(
        &self,
        work_dir: &Path,
        point: GridPoint,
        gate: &GateSpec,
    ) -> Result<GeneratedSources> {
        let stem = gate.file_stem();
        self.write_pair(
            work_dir,
            point,
            &format!("compose_{stem}.cpp"),
            &format!("main_{stem}.cpp"),
            Some(gate),
        )
    }

    fn write_pair(
        &self,
        work_dir: &Path,
        point: GridPoint,
        compose_name: &str,
        main_name: &str,
        gate: Option<&GateSpec>,
    ) -> Result<GeneratedSources> {
        let gates_dir = work_dir.join("gates");
        fs::create_dir_all(&gates_dir)
            .with_context(|| format!("creating {}", gates_dir.display()))?;

        let compose_include = format!("gates/{compose_name}");
        let compose_path = gates_dir.join(compose_name);
        let main_path = work_dir.join(main_name);

        let compose_text = self.compose.render(point.threshold, point.delay);
        let main_text = match gate {
            Some(gate) => self
                .main
                .render_specialized(point.threshold, point.delay, &compose_include, gate)?,
            None => self.main.render(point.threshold, point.delay, &compose_include),
        };

        fs::write(&compose_path, compose_text)
            .with_context(|| format!("writing {}", compose_path.display()))?;
        // From here on the guard owns cleanup of both paths.
        let sources = GeneratedSources {
            compose_path,
            main_path,
            compose_include,
        };
        fs::write(&sources.main_path, main_text)
            .with_context(|| format!("writing {}", sources.main_path.display()))?;

        debug!(
            threshold = point.threshold,
            delay = point.delay,
            gate = gate.map(|g| g.name),
            compose = %sources.compose_path.display(),
            main = %sources.main_path.display(),
            "generated variant pair"
        );
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{ComposeTemplate, MainTemplate};
    use gatetune_gates::gate_by_name;

    fn generator() -> VariantGenerator {
        let compose =
            ComposeTemplate::parse("#define THRESHOLD 200\n#define DELAY 64\n").unwrap();
        let main = MainTemplate::parse(concat!(
            "#define THRESHOLD 200\n",
            "#define DELAY 64\n",
            "#include \"gates/compose.cpp\"\n",
            "test_gate(\"GATE_NAME_PLACEHOLDER\", GATE_FUNCTION_PLACEHOLDER, GATE_INPUTS_PLACEHOLDER);\n",
        ))
        .unwrap();
        VariantGenerator::new(compose, main)
    }

    #[test]
    fn sweep_variant_written_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let point = GridPoint {
            threshold: 150,
            delay: 512,
        };
        let (compose_path, main_path) = {
            let sources = generator().write_sweep_variant(dir.path(), point).unwrap();
            let compose = std::fs::read_to_string(&sources.compose_path).unwrap();
            let main = std::fs::read_to_string(&sources.main_path).unwrap();
            assert_eq!(compose.matches("150").count(), 1);
            assert_eq!(compose.matches("512").count(), 1);
            assert!(main.contains("#include \"gates/compose_temp.cpp\""));
            (sources.compose_path.clone(), sources.main_path.clone())
        };
        assert!(!compose_path.exists());
        assert!(!main_path.exists());
    }

    #[test]
    fn specialized_variant_embeds_gate_in_names() {
        let dir = tempfile::tempdir().unwrap();
        let point = GridPoint {
            threshold: 150,
            delay: 512,
        };
        let not = gate_by_name("NOT").unwrap();
        let sources = generator()
            .write_specialized_variant(dir.path(), point, not)
            .unwrap();
        assert!(sources.compose_path.ends_with("gates/compose_not.cpp"));
        assert!(sources.main_path.ends_with("main_not.cpp"));
        let main = std::fs::read_to_string(&sources.main_path).unwrap();
        assert!(main.contains("test_gate(\"NOT\", do_not_gate, 1);"));
        assert!(!main.contains("PLACEHOLDER"));
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let point = GridPoint {
            threshold: 150,
            delay: 512,
        };
        let first = {
            let sources = generator().write_sweep_variant(dir.path(), point).unwrap();
            (
                std::fs::read(&sources.compose_path).unwrap(),
                std::fs::read(&sources.main_path).unwrap(),
            )
        };
        let second = {
            let sources = generator().write_sweep_variant(dir.path(), point).unwrap();
            (
                std::fs::read(&sources.compose_path).unwrap(),
                std::fs::read(&sources.main_path).unwrap(),
            )
        };
        assert_eq!(first, second);
    }
}

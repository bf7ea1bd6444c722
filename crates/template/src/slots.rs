//! Template slot model and validation.

use thiserror::Error;

/// Literal text of each substitution site in the templates. These match the
/// external template sources bit-for-bit; changing them breaks the contract
/// with the simulator sources.
const THRESHOLD_DIRECTIVE: &str = "#define THRESHOLD";
const DELAY_DIRECTIVE: &str = "#define DELAY";
const COMPOSE_INCLUDE: &str = "#include \"gates/compose.cpp\"";
const GATE_PLACEHOLDER: &str =
    "test_gate(\"GATE_NAME_PLACEHOLDER\", GATE_FUNCTION_PLACEHOLDER, GATE_INPUTS_PLACEHOLDER);";

/// The substitution slots a template can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Threshold,
    Delay,
    ComposeInclude,
    GateInvocation,
}

impl SlotKind {
    fn describe(&self) -> &'static str {
        match self {
            SlotKind::Threshold => "threshold directive",
            SlotKind::Delay => "delay directive",
            SlotKind::ComposeInclude => "compose include reference",
            SlotKind::GateInvocation => "gate invocation placeholder",
        }
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template must contain exactly one {}, found {found}", .slot.describe())]
    SlotCount { slot: SlotKind, found: usize },
}

/// Locate occurrences of a `#define NAME <int>` directive: the directive
/// prefix followed by whitespace and a digit. A bare prefix match (for
/// example `#define THRESHOLD_MAX`) does not qualify.
///
/// Yields `(value_start, value_len)` spans of the numeric literal.
fn directive_sites(text: &str, directive: &str) -> Vec<(usize, usize)> {
    text.match_indices(directive)
        .filter_map(|(at, _)| {
            let tail = &text[at + directive.len()..];
            let ws_len = tail.len() - tail.trim_start_matches([' ', '\t']).len();
            if ws_len == 0 {
                return None;
            }
            let after_ws = &tail[ws_len..];
            let digits = after_ws
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_ws.len());
            if digits == 0 {
                return None;
            }
            Some((at + directive.len() + ws_len, digits))
        })
        .collect()
}

fn count_directive(text: &str, directive: &str) -> usize {
    directive_sites(text, directive).len()
}

fn require_one(found: usize, slot: SlotKind) -> Result<(), TemplateError> {
    if found == 1 {
        Ok(())
    } else {
        Err(TemplateError::SlotCount { slot, found })
    }
}

/// Rewrite the numeric literal of a `#define NAME <int>` directive.
///
/// Precondition (checked at template construction): the directive occurs
/// exactly once.
fn rewrite_directive(text: &str, directive: &str, value: u32) -> String {
    let Some(&(value_start, value_len)) = directive_sites(text, directive).first() else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..value_start]);
    out.push_str(&value.to_string());
    out.push_str(&text[value_start + value_len..]);
    out
}

/// The composition-unit template: threshold and delay slots only.
#[derive(Debug, Clone)]
pub struct ComposeTemplate {
    text: String,
}

impl ComposeTemplate {
    pub fn parse(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        require_one(count_directive(&text, THRESHOLD_DIRECTIVE), SlotKind::Threshold)?;
        require_one(count_directive(&text, DELAY_DIRECTIVE), SlotKind::Delay)?;
        Ok(Self { text })
    }

    /// Instantiate the template for one grid point. Deterministic: the same
    /// inputs always produce byte-identical output.
    pub fn render(&self, threshold: u32, delay: u32) -> String {
        let out = rewrite_directive(&self.text, THRESHOLD_DIRECTIVE, threshold);
        rewrite_directive(&out, DELAY_DIRECTIVE, delay)
    }
}

/// The main-unit template: threshold, delay, compose-include slots, and
/// (for the specialization path) the gate-invocation placeholder.
#[derive(Debug, Clone)]
pub struct MainTemplate {
    text: String,
    has_placeholder: bool,
}

impl MainTemplate {
    pub fn parse(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        require_one(count_directive(&text, THRESHOLD_DIRECTIVE), SlotKind::Threshold)?;
        require_one(count_directive(&text, DELAY_DIRECTIVE), SlotKind::Delay)?;
        require_one(text.matches(COMPOSE_INCLUDE).count(), SlotKind::ComposeInclude)?;
        let placeholders = text.matches(GATE_PLACEHOLDER).count();
        if placeholders > 1 {
            return Err(TemplateError::SlotCount {
                slot: SlotKind::GateInvocation,
                found: placeholders,
            });
        }
        Ok(Self {
            text,
            has_placeholder: placeholders == 1,
        })
    }

    /// Instantiate for one grid point, repointing the compose include at the
    /// generated compose file. The placeholder, if present, is left alone.
    pub fn render(&self, threshold: u32, delay: u32, compose_include: &str) -> String {
        let out = rewrite_directive(&self.text, THRESHOLD_DIRECTIVE, threshold);
        let out = rewrite_directive(&out, DELAY_DIRECTIVE, delay);
        out.replace(
            COMPOSE_INCLUDE,
            &format!("#include \"{compose_include}\""),
        )
    }

    /// Instantiate for one grid point specialized to a single gate: the
    /// placeholder becomes a concrete `test_gate` call.
    pub fn render_specialized(
        &self,
        threshold: u32,
        delay: u32,
        compose_include: &str,
        gate: &gatetune_gates::GateSpec,
    ) -> Result<String, TemplateError> {
        if !self.has_placeholder {
            return Err(TemplateError::SlotCount {
                slot: SlotKind::GateInvocation,
                found: 0,
            });
        }
        let out = self.render(threshold, delay, compose_include);
        Ok(out.replace(
            GATE_PLACEHOLDER,
            &format!(
                "test_gate(\"{}\", {}, {});",
                gate.name, gate.function, gate.arity
            ),
        ))
    }
}

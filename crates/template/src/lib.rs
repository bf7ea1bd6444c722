//! Typed source templates and the variant generator.
//!
//! The simulator is built from two C++ source templates. Each template is
//! modeled here as a validated object with singly-occurring substitution
//! slots rather than raw text searched at render time: construction proves
//! each required slot occurs exactly once, so rendering cannot silently
//! miss a site.

pub mod slots;
pub mod variant;

pub use slots::{ComposeTemplate, MainTemplate, SlotKind, TemplateError};
pub use variant::{GeneratedSources, VariantGenerator};

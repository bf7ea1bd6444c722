//! Static gate catalogue.
//!
//! The simulator exposes seven gate primitives. Each entry carries the
//! display name used in its telemetry headers, the C symbol invoked by the
//! specialized test harness, and the gate's input arity. The catalogue is
//! fixed at compile time and consulted read-only.

/// One entry of the gate catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSpec {
    /// Display name as it appears in simulator output (`=== AND gate ===`).
    pub name: &'static str,
    /// Invocation symbol in the composition unit.
    pub function: &'static str,
    /// Number of gate inputs.
    pub arity: u32,
}

impl GateSpec {
    /// Lowercase identifier used for file names derived from this gate.
    pub fn file_stem(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

/// All gates the simulator tests, in its reporting order.
pub const GATE_CATALOG: &[GateSpec] = &[
    GateSpec {
        name: "AND",
        function: "do_and_gate",
        arity: 2,
    },
    GateSpec {
        name: "OR",
        function: "do_or_gate",
        arity: 2,
    },
    GateSpec {
        name: "ASSIGN",
        function: "do_assign_gate",
        arity: 1,
    },
    GateSpec {
        name: "NOT",
        function: "do_not_gate",
        arity: 1,
    },
    GateSpec {
        name: "NAND",
        function: "do_nand_gate",
        arity: 2,
    },
    GateSpec {
        name: "XOR",
        function: "do_xor_gate",
        arity: 2,
    },
    GateSpec {
        name: "MUX",
        function: "do_mux_gate",
        arity: 3,
    },
];

/// Best-known configurations from a previous full sweep, `(gate, threshold,
/// delay)`. Used by the finalizer when no sweep results are on disk.
pub const DEFAULT_BEST: &[(&str, u32, u32)] = &[
    ("AND", 225, 128),
    ("OR", 275, 128),
    ("ASSIGN", 250, 128),
    ("NOT", 150, 512),
    ("NAND", 100, 512),
    ("XOR", 275, 1024),
    ("MUX", 275, 256),
];

/// Look up a catalogue entry by display name.
pub fn gate_by_name(name: &str) -> Option<&'static GateSpec> {
    GATE_CATALOG.iter().find(|gate| gate.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_seven_gates() {
        assert_eq!(GATE_CATALOG.len(), 7);
    }

    #[test]
    fn lookup_by_name() {
        let mux = gate_by_name("MUX").unwrap();
        assert_eq!(mux.function, "do_mux_gate");
        assert_eq!(mux.arity, 3);
        assert!(gate_by_name("XNOR").is_none());
    }

    #[test]
    fn default_best_covers_every_gate() {
        for gate in GATE_CATALOG {
            assert!(DEFAULT_BEST.iter().any(|(name, _, _)| *name == gate.name));
        }
    }

    #[test]
    fn file_stem_is_lowercase() {
        assert_eq!(gate_by_name("ASSIGN").unwrap().file_stem(), "assign");
    }
}

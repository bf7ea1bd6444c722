//! Simulator telemetry parser.
//!
//! The simulator prints, per tested gate, a header line containing
//! `=== <gate> gate` followed by a statistics line containing
//! `Correct rate: (avg, std) (<p>%, ...)`. The association rule is exactly
//! one line of lookback from the marker line to the header line; anything
//! looser would misattribute rates when gates print extra diagnostics.

use gatetune_gates::GATE_CATALOG;
use std::collections::HashMap;

const RATE_MARKER: &str = "Correct rate: (avg, std)";

/// Extract per-gate accuracy percentages from a captured simulator run.
///
/// Gates without a matching block are simply absent; callers treat absence
/// as zero.
pub fn parse_accuracies(output: &str) -> HashMap<String, f64> {
    let lines: Vec<&str> = output.lines().collect();
    let mut accuracies = HashMap::new();

    for (idx, line) in lines.iter().enumerate() {
        if !line.contains(RATE_MARKER) || idx == 0 {
            continue;
        }
        let prev = lines[idx - 1];
        for gate in GATE_CATALOG {
            if prev.contains(&format!("=== {} gate", gate.name)) {
                if let Some(accuracy) = first_percent_value(line) {
                    accuracies.insert(gate.name.to_string(), accuracy);
                }
                break;
            }
        }
    }

    accuracies
}

/// First decimal number that opens a parenthesized group and is immediately
/// followed by a percent sign, e.g. the `87.3` in `(87.3%, 2.1%)`.
fn first_percent_value(line: &str) -> Option<f64> {
    let bytes = line.as_bytes();
    for (at, _) in line.match_indices('(') {
        let rest = &line[at + 1..];
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if digits == 0 {
            continue;
        }
        if bytes.get(at + 1 + digits) == Some(&b'%') {
            if let Ok(value) = rest[..digits].parse::<f64>() {
                return Some(value);
            }
        }
    }
    None
}

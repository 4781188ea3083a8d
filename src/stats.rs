//! Enrollment-level statistics derived per course offering.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts how many rows share each row's key, in row order.
pub fn group_counts<K: Eq + Hash + Clone>(keys: &[K]) -> Vec<usize> {
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key.clone()).or_default() += 1;
    }
    keys.iter().map(|k| counts[k]).collect()
}

/// Parses a Participants cell. Accepts `"25"` and `"25.0"`.
pub fn parse_enrolled(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    raw.parse::<u32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64 && n.fract() == 0.0)
            .map(|n| n as u32)
    })
}

/// Response rate rounded to two decimals, e.g. `"66.67%"` or `"50.0%"`.
///
/// Empty when enrollment is unknown or zero.
pub fn return_percent(responses: usize, enrolled: Option<u32>) -> String {
    match enrolled {
        Some(enrolled) if enrolled > 0 => {
            let pct = (responses as f64 / enrolled as f64 * 100.0 * 100.0).round() / 100.0;
            if pct.fract() == 0.0 {
                format!("{:.1}%", pct)
            } else {
                format!("{}%", pct)
            }
        }
        _ => String::new(),
    }
}

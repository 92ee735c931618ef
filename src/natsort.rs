// src/natsort.rs

//! Natural sort keys for package names, versions, and filenames
//!
//! A natural key splits a string into alternating runs of non-digit and
//! digit characters. Digit runs compare by numeric value instead of
//! character by character, so `pkg2` sorts before `pkg10` and `cp39`
//! before `cp310`.
//!
//! Keys have a fixed alternating shape: a (possibly empty) text run at
//! every even index and a number run at every odd index, always ending
//! with a text run. Two keys therefore never compare a text run against
//! a number run at the same position, and keys of different lengths
//! compare correctly element-wise:
//!
//! - `""` → `[Text("")]`
//! - `"a0"` → `[Text("a"), Number(0), Text("")]`
//! - `"0a1"` → `[Text(""), Number(0), Text("a"), Number(1), Text("")]`

use std::cmp::Ordering;

/// A single run within a natural key
///
/// `Number` stores the digit run with leading zeros stripped, so numeric
/// runs of any length compare by value (shorter digit string = smaller
/// number) without overflowing a fixed-width integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Text(String),
    Number(String),
}

impl Run {
    fn number(digits: &str) -> Run {
        let trimmed = digits.trim_start_matches('0');
        Run::Number(if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        })
    }
}

impl Ord for Run {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Run::Text(a), Run::Text(b)) => a.cmp(b),
            (Run::Number(a), Run::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            // Tags order before payloads; by construction runs at the same
            // index always share a tag, so these arms only decide totality.
            (Run::Text(_), Run::Number(_)) => Ordering::Less,
            (Run::Number(_), Run::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Run {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A comparable natural sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Run>);

/// Compute the natural sort key of a string
pub fn natural_key(s: &str) -> NaturalKey {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in s.chars() {
        let is_digit = c.is_ascii_digit();
        if is_digit != in_digits {
            if in_digits {
                runs.push(Run::number(&current));
            } else {
                runs.push(Run::Text(current.clone()));
            }
            current.clear();
            in_digits = is_digit;
        }
        current.push(c);
    }

    if in_digits {
        runs.push(Run::number(&current));
        runs.push(Run::Text(String::new()));
    } else {
        runs.push(Run::Text(current));
    }

    NaturalKey(runs)
}

//! JSON vector files.
//!
//! A vector file names its table and lists records in run order:
//!
//! ```json
//! {
//!   "name": "regression",
//!   "vectors": [
//!     { "op": "ADD", "a": "0xFF", "b": 1, "expected": 0, "check_flags": ["zero", "carry"] },
//!     { "op": "MUL", "a": { "f32": 2.0 }, "b": { "f32": 3.0 }, "label": "2.0 * 3.0" }
//!   ]
//! }
//! ```
//!
//! Operands and expected results accept decimal integers, `0x`/`0b`
//! literals (underscores allowed) or `{"f32": value}` for IEEE-754
//! encodings. `check_flags` selects compared flags; `expected_flags` lists
//! the flags expected to be set and, without `check_flags`, checks every
//! flag.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{ConfigError, StatusFlags, f32_bits, width_mask};
use crate::ops::Operation;

use super::{Vector, VectorTable};

/// On-disk form of a vector file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    #[serde(default)]
    name: Option<String>,
    vectors: Vec<RawVector>,
}

/// On-disk form of a single vector.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVector {
    op: String,
    a: RawValue,
    #[serde(default)]
    b: Option<RawValue>,
    #[serde(default)]
    expected: Option<RawValue>,
    #[serde(default)]
    check_flags: Option<Vec<String>>,
    #[serde(default)]
    expected_flags: Option<Vec<String>>,
    #[serde(default)]
    label: Option<String>,
}

/// Operand or result literal.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(u64),
    Text(String),
    Float { f32: f32 },
}

impl RawValue {
    /// Resolves the literal to a register value of `width` bits.
    fn resolve(&self, width: u8) -> Result<u32, ConfigError> {
        let value = match self {
            Self::Int(v) => *v,
            Self::Text(s) => parse_literal(s)?,
            Self::Float { f32 } => u64::from(f32_bits(*f32)),
        };
        if value > u64::from(width_mask(width)) {
            return Err(ConfigError::Width { value, width });
        }
        Ok(value as u32)
    }
}

/// Parses a decimal, `0x` or `0b` integer literal.
fn parse_literal(text: &str) -> Result<u64, ConfigError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        lower.parse::<u64>()
    };
    parsed.map_err(|_| ConfigError::Operand(text.to_string()))
}

/// Folds a list of flag names into a flag set.
fn parse_flags(names: &[String]) -> Result<StatusFlags, ConfigError> {
    names.iter().try_fold(StatusFlags::NONE, |acc, name| {
        StatusFlags::from_name(name)
            .map(|flag| acc | flag)
            .ok_or_else(|| ConfigError::UnknownFlag(name.clone()))
    })
}

impl RawVector {
    fn into_vector<O: Operation>(self) -> Result<Vector<O>, ConfigError> {
        let op = O::from_name(&self.op).ok_or_else(|| ConfigError::UnknownOperation(self.op.clone()))?;
        let width = O::OPERAND_WIDTH;
        let a = self.a.resolve(width)?;
        let b = self.b.as_ref().map_or(Ok(0), |b| b.resolve(width))?;

        let mut vector = Vector::new(op, a, b);
        if let Some(expected) = &self.expected {
            vector = vector.expect(expected.resolve(width)?);
        }

        let mask = self.check_flags.as_deref().map(parse_flags).transpose()?;
        let values = self.expected_flags.as_deref().map(parse_flags).transpose()?;
        vector = match (mask, values) {
            (Some(mask), Some(values)) => vector.expect_flags(mask, values),
            (Some(mask), None) => vector.check(mask),
            (None, Some(values)) => vector.expect_flags(StatusFlags::ALL, values),
            (None, None) => vector,
        };

        Ok(match self.label {
            Some(label) => vector.labeled(label),
            None => vector,
        })
    }
}

fn build<O: Operation>(raw: RawTable, fallback_name: &str) -> Result<VectorTable<O>, ConfigError> {
    let vectors = raw
        .vectors
        .into_iter()
        .map(RawVector::into_vector::<O>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VectorTable::new(raw.name.unwrap_or_else(|| fallback_name.to_string()), vectors))
}

/// Parses a vector table from JSON text.
///
/// # Errors
///
/// Returns [`ConfigError`] for malformed JSON, unknown operation or flag
/// names, malformed literals and values wider than the operand registers.
pub fn parse_table<O: Operation>(json: &str) -> Result<VectorTable<O>, ConfigError> {
    let raw: RawTable = serde_json::from_str(json)?;
    build(raw, "inline")
}

/// Loads a vector table from a JSON file.
///
/// The table is named after the file stem when the file has no `name`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] for I/O and JSON
/// failures, and the errors of [`parse_table`] for invalid records.
pub fn load_table<O: Operation>(path: &Path) -> Result<VectorTable<O>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawTable = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path.file_stem().map_or_else(|| "vectors".into(), |s| s.to_string_lossy());
    build(raw, &stem)
}

//! Reference functions and the pass/fail decision.
//!
//! This module turns a vector and the DUT's observed outputs into a verdict.
//! It provides:
//! 1. **Oracles:** Pure, total reference functions in the DUT's encoding
//!    domain ([`integer`] for the 8-bit ALU, [`float`] for the IEEE-754 ALU).
//! 2. **Expectations:** The `(result, flags)` pair an oracle predicts.
//! 3. **Judgement:** [`judge`], which resolves the expected values of a
//!    vector and compares them against the observation.
//!
//! # Resolution rules
//!
//! For a checked operation the expected result is the vector's precomputed
//! value if present, otherwise the oracle's. The expected flags restricted
//! to the vector's check mask come from the vector's explicit flag values
//! if present, otherwise from the oracle. Unchecked operations always pass.

/// IEEE-754 single-precision reference functions.
pub mod float;

/// 8-bit integer reference functions.
pub mod integer;

use tracing::warn;

use crate::common::StatusFlags;
use crate::common::bits::hex;
use crate::dut::OutputRegisters;
use crate::ops::{CheckPolicy, Operation};
use crate::vector::Vector;

/// Signature shared by every oracle: `(a, b) -> expectation`.
pub type OracleFn = fn(u32, u32) -> Expectation;

/// Output an oracle predicts for one operand pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expectation {
    /// Expected result register.
    pub result: u32,
    /// Expected status flags, when the oracle models them.
    pub flags: Option<StatusFlags>,
}

impl Expectation {
    /// Creates an expectation with modeled flags.
    pub const fn new(result: u32, flags: StatusFlags) -> Self {
        Self {
            result,
            flags: Some(flags),
        }
    }

    /// Creates an expectation for the result register only.
    pub const fn result_only(result: u32) -> Self {
        Self {
            result,
            flags: None,
        }
    }
}

/// Verdict of a single vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every checked output matched.
    Pass,
    /// The operation is not judged; counted as a pass.
    Unchecked,
    /// At least one checked output differed.
    Fail {
        /// The result register differed.
        result: bool,
        /// Checked flags that differed.
        flags: StatusFlags,
    },
}

impl Verdict {
    /// Returns true for [`Verdict::Pass`] and [`Verdict::Unchecked`].
    pub const fn passed(self) -> bool {
        !matches!(self, Self::Fail { .. })
    }

    /// Short label used in per-vector report lines. Unchecked vectors pass.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass | Self::Unchecked => "PASS",
            Self::Fail { .. } => "FAIL",
        }
    }
}

/// Resolved expectations and verdict of one vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Judgement {
    /// Pass/fail decision.
    pub verdict: Verdict,
    /// Expected result, when the result was compared.
    pub expected_result: Option<u32>,
    /// Expected flags restricted to the check mask, when flags were compared.
    pub expected_flags: Option<StatusFlags>,
    /// Oracle output shown for unchecked operations that have one.
    pub advisory: Option<Expectation>,
}

/// Judges an observation against a vector.
///
/// # Arguments
///
/// * `vector` - The stimulus/expectation record that was applied.
/// * `observed` - Output registers read after settling.
///
/// # Returns
///
/// The verdict together with the expectations it was decided on.
pub fn judge<O: Operation>(vector: &Vector<O>, observed: OutputRegisters) -> Judgement {
    let op = vector.op();
    let oracle = op.oracle(vector.a(), vector.b());

    if op.policy() == CheckPolicy::Unchecked {
        return Judgement {
            verdict: Verdict::Unchecked,
            expected_result: None,
            expected_flags: None,
            advisory: oracle,
        };
    }

    let disagreement = vector
        .expected()
        .zip(oracle)
        .filter(|(stated, predicted)| *stated != predicted.result);
    if let Some((stated, predicted)) = disagreement {
        warn!(
            op = op.name(),
            label = vector.label(),
            stated = %hex(stated, O::OPERAND_WIDTH),
            oracle = %hex(predicted.result, O::OPERAND_WIDTH),
            "vector expectation disagrees with oracle; using vector value"
        );
    }

    let expected_result = vector.expected().or_else(|| oracle.map(|e| e.result));
    let mask = vector.check_flags();
    let expected_flags = if mask.is_empty() {
        None
    } else {
        vector
            .expected_flags()
            .or_else(|| oracle.and_then(|e| e.flags))
            .map(|f| f & mask)
    };

    let result_mismatch = expected_result.is_some_and(|e| e != observed.result);
    let flag_mismatch = expected_flags.map_or(StatusFlags::NONE, |e| (e ^ observed.flags) & mask);

    let verdict = if result_mismatch || !flag_mismatch.is_empty() {
        Verdict::Fail {
            result: result_mismatch,
            flags: flag_mismatch,
        }
    } else {
        Verdict::Pass
    };

    Judgement {
        verdict,
        expected_result,
        expected_flags,
        advisory: None,
    }
}

//! Stimulus vectors and vector tables.
//!
//! A [`Vector`] is one stimulus/expectation record; a [`VectorTable`] is the
//! ordered list a run walks through. This module provides:
//! 1. **Vectors:** Immutable records built with a small builder API.
//! 2. **Tables:** Named, ordered collections borrowed by the run controller.
//! 3. **Loading:** JSON vector files ([`load`]).
//!
//! Absent expectations mean "not checked for this vector": a vector with no
//! precomputed result falls back to the operation's oracle, and a vector with
//! an empty flag mask never compares flags.

/// JSON vector file loading.
pub mod load;

pub use load::{load_table, parse_table};

use crate::common::StatusFlags;
use crate::ops::Operation;

/// One stimulus/expectation record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vector<O> {
    op: O,
    a: u32,
    b: u32,
    expected: Option<u32>,
    check_flags: StatusFlags,
    expected_flags: Option<StatusFlags>,
    label: String,
}

impl<O: Operation> Vector<O> {
    /// Creates a vector with no precomputed expectations and no flag checks.
    pub const fn new(op: O, a: u32, b: u32) -> Self {
        Self {
            op,
            a,
            b,
            expected: None,
            check_flags: StatusFlags::NONE,
            expected_flags: None,
            label: String::new(),
        }
    }

    /// Sets the precomputed expected result.
    #[must_use]
    pub const fn expect(mut self, result: u32) -> Self {
        self.expected = Some(result);
        self
    }

    /// Checks the flags in `mask` against the oracle's prediction.
    #[must_use]
    pub const fn check(mut self, mask: StatusFlags) -> Self {
        self.check_flags = mask;
        self
    }

    /// Checks the flags in `mask` against explicit `values`.
    ///
    /// Flags in `mask` absent from `values` are expected to be clear.
    #[must_use]
    pub fn expect_flags(mut self, mask: StatusFlags, values: StatusFlags) -> Self {
        self.check_flags = mask;
        self.expected_flags = Some(values & mask);
        self
    }

    /// Attaches a diagnostic label.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Operation under test.
    pub const fn op(&self) -> O {
        self.op
    }

    /// First operand.
    pub const fn a(&self) -> u32 {
        self.a
    }

    /// Second operand.
    pub const fn b(&self) -> u32 {
        self.b
    }

    /// Precomputed expected result, if any.
    pub const fn expected(&self) -> Option<u32> {
        self.expected
    }

    /// Mask of status flags compared for this vector.
    pub const fn check_flags(&self) -> StatusFlags {
        self.check_flags
    }

    /// Explicit expected flag values, if any.
    pub const fn expected_flags(&self) -> Option<StatusFlags> {
        self.expected_flags
    }

    /// Diagnostic label; never used for comparison.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// An ordered, named list of vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorTable<O> {
    name: String,
    vectors: Vec<Vector<O>>,
}

impl<O: Operation> VectorTable<O> {
    /// Creates a table from vectors in run order.
    pub fn new(name: impl Into<String>, vectors: Vec<Vector<O>>) -> Self {
        Self {
            name: name.into(),
            vectors,
        }
    }

    /// Table name, used in logs and report headers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vectors.
    pub const fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns true if the table has no vectors.
    pub const fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vectors in run order.
    pub fn vectors(&self) -> &[Vector<O>] {
        &self.vectors
    }

    /// Iterates over the vectors in run order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vector<O>> {
        self.vectors.iter()
    }
}

impl<'a, O: Operation> IntoIterator for &'a VectorTable<O> {
    type Item = &'a Vector<O>;
    type IntoIter = std::slice::Iter<'a, Vector<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

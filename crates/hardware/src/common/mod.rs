//! Common utilities and types used throughout the verification harness.
//!
//! This module provides the building blocks shared by every other component. It includes:
//! 1. **Bit helpers:** Register-width masks and IEEE-754 reinterpretation.
//! 2. **Status flags:** The DUT's one-bit status outputs and check masks.
//! 3. **Error handling:** Settle, sink, configuration and harness errors.

/// Register-width and IEEE-754 bit helpers.
pub mod bits;

/// Error types.
pub mod error;

/// DUT status flags.
pub mod flags;

pub use bits::{bits_f32, f32_bits, width_mask};
pub use error::{ConfigError, HarnessError, SettleError, SinkError};
pub use flags::StatusFlags;

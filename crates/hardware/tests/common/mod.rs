/// Test context and run helpers.
pub mod harness;

/// Mock DUTs and sinks.
pub mod mocks;

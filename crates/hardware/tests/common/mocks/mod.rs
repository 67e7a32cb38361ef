
/// `mockall` mocks of the sink traits.
pub mod sinks;

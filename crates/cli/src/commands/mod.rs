//! Command handlers for the grounded CLI.

pub mod ask;
pub mod compare;
pub mod pipeline;

pub use ask::AskCommand;
pub use compare::CompareCommand;

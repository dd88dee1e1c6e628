//! Command implementations

pub mod assess;

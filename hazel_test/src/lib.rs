//! Utilities shared by the property based tests of the Hazel crates.

pub mod input;

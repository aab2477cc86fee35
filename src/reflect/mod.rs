//! Reflection substrate
//!
//! Submissions publish a `ClassDescriptor` and implement `Submission`; the
//! `ClassRegistry` plays the role of a class loader for validation and
//! instantiation.

pub mod class;
pub mod registry;
pub mod submission;
pub mod types;

//! Submission judging.
//!
//! Contract checks happen before a submission is trusted; profiled calls
//! happen after. Both sides are language-agnostic and operate on the
//! descriptors in [`crate::reflect`].

pub mod contract;
pub mod invoker;
pub mod signature;
pub mod statistics;
pub mod vocabulary;

pub use contract::{MethodContract, SubmissionContract};
pub use invoker::ProfiledInvoker;
pub use signature::{MethodSignature, SignatureValidator, ValidatedMethod};
pub use statistics::{Profiled, Statistics};

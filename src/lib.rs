//! probebox: contract validation and profiled invocation for grader submissions
//!
//! A grader hands probebox a submission class. probebox first proves the class
//! exposes the expected public instance methods, then runs calls on it while
//! recording wall time and peak heap usage.
//!
//! # Architecture
//!
//! ## Reflection ([`reflect`])
//! - [`reflect::types`]: runtime type descriptors and dynamic values
//! - [`reflect::class`]: class and method descriptors, exact-type lookup
//! - [`reflect::submission`]: the `Submission` contract objects implement
//! - [`reflect::registry`]: class registry acting as type resolver and factory
//!
//! ## Judging ([`judge`])
//! - [`judge::vocabulary`]: the closed set of supported type names
//! - [`judge::signature`]: signature validation
//! - [`judge::contract`]: multi-method submission contracts
//! - [`judge::statistics`]: per-object execution statistics
//! - [`judge::invoker`]: profiled invocation decorator
//!
//! ## Observability ([`observability`])
//! - [`observability::clock`]: millisecond clocks
//! - [`observability::memory`]: heap samplers and the tracking allocator
//! - [`observability::audit`]: structured probe events
//!
//! ## Configuration ([`config`])
//! - [`config::types`]: error taxonomy
//! - [`config::loader`]: JSON/env configuration
//!
//! Not provided: process isolation, scoring, compiling submissions, timeouts.
//! A hung submission hangs its caller; supervision is the host's job.

pub mod config;
pub mod judge;
pub mod observability;
pub mod reflect;

pub use config::loader::ProbeConfig;
pub use config::types::{ProbeError, Result, SubmissionError, ValidationError};
pub use judge::{
    MethodSignature, Profiled, ProfiledInvoker, SignatureValidator, Statistics,
    SubmissionContract, ValidatedMethod,
};
pub use reflect::class::{ClassDescriptor, MethodDescriptor};
pub use reflect::registry::{ClassRegistry, TypeResolver};
pub use reflect::submission::{Submission, SubmissionClass};
pub use reflect::types::{TypeDescriptor, Value};

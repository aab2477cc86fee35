//! Profiled invocation.
//!
//! `ProfiledInvoker` wraps exactly one call on a target that owns a
//! `Statistics` record. Around the call it takes start/end timestamps,
//! samples the process-wide peak heap, then writes
//! `execute_time = end - start` and `memory = max(previous, sample)`.
//!
//! The wrapped call's return value, error or panic reaches the caller
//! unchanged; statistics are committed first in every case. A heap sample
//! that cannot be taken leaves the previous peak in place.
//!
//! The heap figure is a whole-process high-water mark. Profiled calls running
//! concurrently in one process inflate each other's peaks; callers that need
//! isolation run each submission in its own process.

use crate::config::loader::ProbeConfig;
use crate::config::types::{Result, SubmissionError};
use crate::judge::signature::ValidatedMethod;
use crate::judge::statistics::Profiled;
use crate::observability::audit::{events, init_audit_logger, CorrelationIds};
use crate::observability::clock::{clock_for, Clock, MonotonicClock};
use crate::observability::memory::{sampler_for, AllocatorSampler, HeapSampler};
use crate::reflect::submission::Submission;
use crate::reflect::types::Value;
use std::panic::{self, AssertUnwindSafe};

pub struct ProfiledInvoker {
    clock: Box<dyn Clock>,
    sampler: Box<dyn HeapSampler>,
    memory_ceiling_bytes: Option<u64>,
}

impl ProfiledInvoker {
    pub fn new(clock: Box<dyn Clock>, sampler: Box<dyn HeapSampler>) -> Self {
        Self {
            clock,
            sampler,
            memory_ceiling_bytes: None,
        }
    }

    /// Build clock, sampler and audit sink from configuration
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        if let Some(path) = &config.audit_log {
            init_audit_logger(path)?;
        }
        log::info!(
            "Profiled invoker: sampler={:?}, clock={:?}, memory_ceiling={:?}",
            config.sampler,
            config.clock,
            config.memory_ceiling_bytes
        );
        Ok(Self::new(clock_for(config.clock), sampler_for(config.sampler))
            .with_memory_ceiling(config.memory_ceiling_bytes))
    }

    pub fn with_memory_ceiling(mut self, ceiling_bytes: Option<u64>) -> Self {
        self.memory_ceiling_bytes = ceiling_bytes;
        self
    }

    pub fn sampler_name(&self) -> &'static str {
        self.sampler.sampler_name()
    }

    /// Run `call` on `target` and record its statistics.
    pub fn invoke<T, R, F>(&self, target: &mut T, call: F) -> R
    where
        T: Profiled + ?Sized,
        F: FnOnce(&mut T) -> R,
    {
        self.invoke_correlated(target, None, call)
    }

    fn invoke_correlated<T, R, F>(
        &self,
        target: &mut T,
        correlation: Option<&CorrelationIds>,
        call: F,
    ) -> R
    where
        T: Profiled + ?Sized,
        F: FnOnce(&mut T) -> R,
    {
        let previous_peak = target.statistics().memory();

        let start = self.clock.now_millis();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(&mut *target)));
        let end = self.clock.now_millis();

        let sampled_peak = match self.sampler.peak_heap_bytes() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Keeping previous peak of {} bytes: {}", previous_peak, e);
                events::memory_sample_unavailable(&e.to_string(), correlation);
                None
            }
        };

        let statistics = target.statistics_mut();
        statistics.record(end.saturating_sub(start), sampled_peak);

        if let Some(ceiling) = self.memory_ceiling_bytes {
            if statistics.memory() > ceiling {
                log::warn!(
                    "Peak heap {} bytes is above the configured ceiling of {} bytes",
                    statistics.memory(),
                    ceiling
                );
                events::memory_ceiling_exceeded(statistics.memory(), ceiling, correlation);
            }
        }

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Call a validated method on a submission object by name
    pub fn invoke_method(
        &self,
        target: &mut dyn Submission,
        method: &ValidatedMethod,
        args: &[Value],
    ) -> std::result::Result<Value, SubmissionError> {
        let correlation = CorrelationIds::new();
        events::invocation_start(method.class_name(), method.name(), &correlation);

        let result = self.invoke_correlated(target, Some(&correlation), |t| {
            t.call(method.name(), args)
        });

        let statistics = target.statistics();
        events::invocation_end(
            method.class_name(),
            method.name(),
            &correlation,
            statistics.execute_time(),
            statistics.memory(),
            result.is_ok(),
        );
        result
    }
}

impl Default for ProfiledInvoker {
    fn default() -> Self {
        Self::new(Box::new(MonotonicClock::new()), Box::new(AllocatorSampler))
    }
}

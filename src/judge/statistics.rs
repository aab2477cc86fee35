use serde::{Deserialize, Serialize};

/// Execution statistics of one profiled object.
///
/// Written only by the profiled invoker: `execute_time` holds the duration of
/// the latest call, `memory` the highest peak heap sample seen so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Milliseconds spent in the most recent profiled call
    execute_time: u64,
    /// Peak heap bytes, running maximum across calls
    memory: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute_time(&self) -> u64 {
        self.execute_time
    }

    pub fn memory(&self) -> u64 {
        self.memory
    }

    /// Commit one call. A missing sample leaves the peak untouched.
    pub(crate) fn record(&mut self, elapsed_ms: u64, sampled_peak: Option<u64>) {
        self.execute_time = elapsed_ms;
        if let Some(peak) = sampled_peak {
            self.memory = self.memory.max(peak);
        }
    }
}

/// Object that carries its own `Statistics` record
pub trait Profiled {
    fn statistics(&self) -> &Statistics;
    fn statistics_mut(&mut self) -> &mut Statistics;
}

impl Profiled for Statistics {
    fn statistics(&self) -> &Statistics {
        self
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        self
    }
}

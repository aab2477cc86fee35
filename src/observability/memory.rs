//! Heap usage samplers.
//!
//! Every sampler reports a process-wide, cumulative high-water mark in
//! bytes (peak since process start, not since the previous sample).
//! Concurrent workloads in one process all contribute to it.

use crate::config::loader::SamplerKind;
use crate::config::types::{ProbeError, Result};
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Source of the peak heap usage scalar
pub trait HeapSampler: Send + Sync {
    fn sampler_name(&self) -> &'static str;
    fn peak_heap_bytes(&self) -> Result<u64>;
}

/// Live and peak byte counters maintained by `TrackingAllocator`
#[derive(Debug)]
pub struct AllocationCounters {
    current: AtomicU64,
    peak: AtomicU64,
    active: AtomicBool,
}

impl AllocationCounters {
    pub const fn new() -> Self {
        Self {
            current: AtomicU64::new(0),
            peak: AtomicU64::new(0),
            active: AtomicBool::new(false),
        }
    }

    pub fn on_alloc(&self, size: usize) {
        let size = size as u64;
        self.active.store(true, Ordering::Relaxed);
        let now = self.current.fetch_add(size, Ordering::Relaxed) + size;
        self.peak.fetch_max(now, Ordering::Relaxed);
    }

    pub fn on_free(&self, size: usize) {
        let size = size as u64;
        // Blocks allocated before the allocator saw traffic can be freed later
        let _ = self
            .current
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some(c.saturating_sub(size))
            });
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Relaxed)
    }

    pub fn peak(&self) -> u64 {
        self.peak.load(Ordering::Relaxed)
    }

    /// True once at least one allocation was counted
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Default for AllocationCounters {
    fn default() -> Self {
        Self::new()
    }
}

static HEAP_COUNTERS: AllocationCounters = AllocationCounters::new();

/// Counters fed by the tracking allocator, if it is installed
pub fn heap_counters() -> &'static AllocationCounters {
    &HEAP_COUNTERS
}

/// System allocator wrapper that tracks live and peak heap bytes.
///
/// Install it in the host binary:
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: probebox::observability::memory::TrackingAllocator =
///     probebox::observability::memory::TrackingAllocator;
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            HEAP_COUNTERS.on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            HEAP_COUNTERS.on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        HEAP_COUNTERS.on_free(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size > old_size {
                HEAP_COUNTERS.on_alloc(new_size - old_size);
            } else {
                HEAP_COUNTERS.on_free(old_size - new_size);
            }
        }
        new_ptr
    }
}

/// Reads the peak from `TrackingAllocator` counters
#[derive(Debug, Default, Clone, Copy)]
pub struct AllocatorSampler;

impl HeapSampler for AllocatorSampler {
    fn sampler_name(&self) -> &'static str {
        "allocator"
    }

    fn peak_heap_bytes(&self) -> Result<u64> {
        let counters = heap_counters();
        if !counters.is_active() {
            return Err(ProbeError::MemorySample(
                "tracking allocator is not installed as the global allocator".to_string(),
            ));
        }
        Ok(counters.peak())
    }
}

/// Reads `VmHWM` (peak resident set) from /proc/self/status
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcStatusSampler;

/// Extract a `kB` field from /proc status content and convert to bytes
pub fn parse_status_field(status: &str, field: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix(field)?.strip_prefix(':')?;
        let mut parts = rest.split_whitespace();
        let value: u64 = parts.next()?.parse().ok()?;
        match parts.next() {
            Some("kB") | None => Some(value * 1024),
            Some(_) => None,
        }
    })
}

impl HeapSampler for ProcStatusSampler {
    fn sampler_name(&self) -> &'static str {
        "proc_status"
    }

    #[cfg(target_os = "linux")]
    fn peak_heap_bytes(&self) -> Result<u64> {
        let status = std::fs::read_to_string("/proc/self/status")
            .map_err(|e| ProbeError::MemorySample(format!("cannot read /proc/self/status: {}", e)))?;
        parse_status_field(&status, "VmHWM")
            .ok_or_else(|| ProbeError::MemorySample("VmHWM missing from /proc/self/status".to_string()))
    }

    #[cfg(not(target_os = "linux"))]
    fn peak_heap_bytes(&self) -> Result<u64> {
        Err(ProbeError::MemorySample(
            "/proc/self/status is only available on Linux".to_string(),
        ))
    }
}

/// Reads `ru_maxrss` from getrusage(RUSAGE_SELF)
#[derive(Debug, Default, Clone, Copy)]
pub struct RusageSampler;

impl HeapSampler for RusageSampler {
    fn sampler_name(&self) -> &'static str {
        "rusage"
    }

    fn peak_heap_bytes(&self) -> Result<u64> {
        use nix::sys::resource::{getrusage, UsageWho};

        let usage = getrusage(UsageWho::RUSAGE_SELF)
            .map_err(|e| ProbeError::MemorySample(format!("getrusage failed: {}", e)))?;
        let max_rss = u64::try_from(usage.max_rss())
            .map_err(|_| ProbeError::MemorySample("negative ru_maxrss".to_string()))?;

        // macOS reports bytes, everything else kilobytes
        if cfg!(target_os = "macos") {
            Ok(max_rss)
        } else {
            Ok(max_rss * 1024)
        }
    }
}

/// Build the sampler selected by configuration
pub fn sampler_for(kind: SamplerKind) -> Box<dyn HeapSampler> {
    log::debug!("Heap sampler selection: {:?}", kind);
    match kind {
        SamplerKind::Allocator => Box::new(AllocatorSampler),
        SamplerKind::ProcStatus => Box::new(ProcStatusSampler),
        SamplerKind::Rusage => Box::new(RusageSampler),
    }
}

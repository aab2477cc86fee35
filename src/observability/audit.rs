/// Probe event logging for probebox
/// Structured records of validation decisions and profiled invocations,
/// written as JSON lines to an optional audit file and mirrored to `log`.
use crate::config::types::{ProbeError, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Types of probe events we track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeEventType {
    ValidationAccepted,
    ValidationRejected,
    InvocationStart,
    InvocationEnd,
    MemorySampleUnavailable,
    MemoryCeilingExceeded,
}

impl ProbeEventType {
    pub fn default_severity(&self) -> Severity {
        match self {
            ProbeEventType::ValidationAccepted => Severity::Low,
            ProbeEventType::ValidationRejected => Severity::Medium,
            ProbeEventType::InvocationStart => Severity::Low,
            ProbeEventType::InvocationEnd => Severity::Low,
            ProbeEventType::MemorySampleUnavailable => Severity::Medium,
            ProbeEventType::MemoryCeilingExceeded => Severity::High,
        }
    }
}

/// Correlation identifiers for one validate/invoke session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationIds {
    /// Spans every call made for one submission
    pub request_id: String,
    /// Specific to one invocation
    pub run_id: String,
}

impl CorrelationIds {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            run_id: Uuid::new_v4().to_string(),
        }
    }

    /// Same request, fresh run id
    pub fn next_run(&self) -> Self {
        Self {
            request_id: self.request_id.clone(),
            run_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for CorrelationIds {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeEvent {
    pub event_type: ProbeEventType,
    pub severity: Severity,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub details: String,
    pub correlation: Option<CorrelationIds>,
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub execute_time_ms: Option<u64>,
    pub memory_bytes: Option<u64>,
}

impl ProbeEvent {
    pub fn new(event_type: ProbeEventType, details: String) -> Self {
        Self {
            event_type,
            severity: event_type.default_severity(),
            timestamp: chrono::Utc::now(),
            details,
            correlation: None,
            class_name: None,
            method_name: None,
            execute_time_ms: None,
            memory_bytes: None,
        }
    }

    pub fn with_correlation(mut self, correlation: CorrelationIds) -> Self {
        self.correlation = Some(correlation);
        self
    }

    pub fn with_method(mut self, class_name: &str, method_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self.method_name = Some(method_name.to_string());
        self
    }

    pub fn with_statistics(mut self, execute_time_ms: u64, memory_bytes: u64) -> Self {
        self.execute_time_ms = Some(execute_time_ms);
        self.memory_bytes = Some(memory_bytes);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// One-line JSON form written to the audit file
    pub fn to_json_line(&self) -> Result<String> {
        let mut entry = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "event_type": self.event_type,
            "severity": self.severity,
            "details": self.details,
            "process_id": std::process::id(),
        });

        if let Some(correlation) = &self.correlation {
            entry["correlation"] = serde_json::to_value(correlation)?;
        }
        if let Some(class_name) = &self.class_name {
            entry["class_name"] = serde_json::json!(class_name);
        }
        if let Some(method_name) = &self.method_name {
            entry["method_name"] = serde_json::json!(method_name);
        }
        if let Some(execute_time_ms) = self.execute_time_ms {
            entry["execute_time_ms"] = serde_json::json!(execute_time_ms);
        }
        if let Some(memory_bytes) = self.memory_bytes {
            entry["memory_bytes"] = serde_json::json!(memory_bytes);
        }

        Ok(serde_json::to_string(&entry)?)
    }
}

fn log_to_facade(event: &ProbeEvent) {
    match event.severity {
        Severity::High => warn!("PROBE {:?}: {}", event.event_type, event.details),
        Severity::Medium => info!("PROBE {:?}: {}", event.event_type, event.details),
        Severity::Low => log::debug!("PROBE {:?}: {}", event.event_type, event.details),
    }
}

/// Audit logger appending JSON lines to a file
pub struct AuditLogger {
    audit_file: Mutex<File>,
    audit_path: PathBuf,
}

impl AuditLogger {
    pub fn new(audit_path: &Path) -> Result<Self> {
        if let Some(parent) = audit_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ProbeError::Config(format!("Failed to create audit log directory: {}", e))
                })?;
            }
        }

        let audit_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(audit_path)
            .map_err(|e| ProbeError::Config(format!("Failed to open audit log: {}", e)))?;

        Ok(Self {
            audit_file: Mutex::new(audit_file),
            audit_path: audit_path.to_path_buf(),
        })
    }

    pub fn log_event(&self, event: &ProbeEvent) {
        log_to_facade(event);

        let line = match event.to_json_line() {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize probe event: {}", e);
                return;
            }
        };

        match self.audit_file.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", line) {
                    error!("Failed to write to audit log: {}", e);
                }
                if let Err(e) = file.flush() {
                    error!("Failed to flush audit log: {}", e);
                }
            }
            Err(_) => error!("Failed to acquire lock on audit file"),
        }
    }

    pub fn audit_path(&self) -> &Path {
        &self.audit_path
    }
}

static AUDIT_LOGGER: OnceLock<AuditLogger> = OnceLock::new();

/// Initialize the global audit logger. A second call is ignored with an error log.
pub fn init_audit_logger(audit_path: &Path) -> Result<()> {
    let logger = AuditLogger::new(audit_path)?;
    if AUDIT_LOGGER.set(logger).is_err() {
        error!("Audit logger already initialized");
    } else {
        info!("Audit logger initialized at {}", audit_path.display());
    }
    Ok(())
}

/// Log an event through the global logger, or `log` alone if none is set
pub fn log_probe_event(event: ProbeEvent) {
    match AUDIT_LOGGER.get() {
        Some(logger) => logger.log_event(&event),
        None => log_to_facade(&event),
    }
}

/// Convenience functions for common probe events
pub mod events {
    use super::*;

    pub fn validation_accepted(class_name: &str, method_signature: &str) {
        log_probe_event(
            ProbeEvent::new(
                ProbeEventType::ValidationAccepted,
                format!("Accepted {}.{}", class_name, method_signature),
            )
            .with_method(class_name, method_signature),
        );
    }

    pub fn validation_rejected(class_name: &str, method_name: &str, reason: &str) {
        log_probe_event(
            ProbeEvent::new(
                ProbeEventType::ValidationRejected,
                format!("Rejected {}.{}: {}", class_name, method_name, reason),
            )
            .with_method(class_name, method_name),
        );
    }

    pub fn invocation_start(class_name: &str, method_name: &str, correlation: &CorrelationIds) {
        log_probe_event(
            ProbeEvent::new(
                ProbeEventType::InvocationStart,
                format!("Invoking {}.{}", class_name, method_name),
            )
            .with_method(class_name, method_name)
            .with_correlation(correlation.clone()),
        );
    }

    pub fn invocation_end(
        class_name: &str,
        method_name: &str,
        correlation: &CorrelationIds,
        execute_time_ms: u64,
        memory_bytes: u64,
        succeeded: bool,
    ) {
        let outcome = if succeeded { "returned" } else { "failed" };
        log_probe_event(
            ProbeEvent::new(
                ProbeEventType::InvocationEnd,
                format!(
                    "{}.{} {} after {} ms (peak heap {} bytes)",
                    class_name, method_name, outcome, execute_time_ms, memory_bytes
                ),
            )
            .with_method(class_name, method_name)
            .with_correlation(correlation.clone())
            .with_statistics(execute_time_ms, memory_bytes),
        );
    }

    pub fn memory_sample_unavailable(reason: &str, correlation: Option<&CorrelationIds>) {
        let event = ProbeEvent::new(
            ProbeEventType::MemorySampleUnavailable,
            format!("Heap sample unavailable, keeping previous peak: {}", reason),
        );
        let event = match correlation {
            Some(ids) => event.with_correlation(ids.clone()),
            None => event,
        };
        log_probe_event(event);
    }

    pub fn memory_ceiling_exceeded(peak_bytes: u64, ceiling_bytes: u64, correlation: Option<&CorrelationIds>) {
        let event = ProbeEvent::new(
            ProbeEventType::MemoryCeilingExceeded,
            format!("Peak heap {} bytes exceeds ceiling {} bytes", peak_bytes, ceiling_bytes),
        );
        let event = match correlation {
            Some(ids) => event.with_correlation(ids.clone()),
            None => event,
        };
        log_probe_event(event);
    }
}

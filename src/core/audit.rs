//! Per-slot lifecycle audit trail.
//!
//! Sinks receive one event each time a factory is admitted, an operation
//! settles, or queued/in-flight work is abandoned. Events are recorded while
//! the driver holds its admission state, so their order is the order the
//! scheduler made its decisions in.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::ids::{RunId, Slot};

/// Lifecycle step recorded for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Factory invoked, operation entered the pool.
    Admitted,
    /// Operation settled with a value.
    Succeeded,
    /// Operation settled with an error.
    Failed,
    /// Factory or in-flight operation dropped by an abort.
    Abandoned,
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Run the event belongs to.
    pub run_id: RunId,
    /// Slot the event refers to.
    pub slot: Slot,
    /// Action taken.
    pub action: AuditAction,
    /// Pool size right after the action.
    pub in_flight: usize,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Sink handle shared between the caller and a scheduler.
pub type SharedAuditSink = Arc<Mutex<dyn AuditSink>>;

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Slots in the order they were admitted.
    #[must_use]
    pub fn admission_order(&self) -> Vec<Slot> {
        self.events
            .iter()
            .filter(|e| e.action == AuditAction::Admitted)
            .map(|e| e.slot)
            .collect()
    }

    /// Largest pool size seen in any event.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.events.iter().map(|e| e.in_flight).max().unwrap_or(0)
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards every event to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::debug!(
            run_id = %event.run_id,
            slot = event.slot,
            action = ?event.action,
            in_flight = event.in_flight,
            "audit"
        );
    }
}

/// Helper to build an audit event stamped with the current time.
#[must_use]
pub fn build_audit_event(
    run_id: RunId,
    slot: Slot,
    action: AuditAction,
    in_flight: usize,
) -> AuditEvent {
    AuditEvent {
        run_id,
        slot,
        action,
        in_flight,
        created_at_ms: now_ms(),
    }
}

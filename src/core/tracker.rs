//! Per-run bookkeeping shared by both drivers: counters, audit events, logs.
//!
//! Slots are admitted strictly in input order, so everything at or past the
//! admission cursor is still queued. Dropping a tracker abandons whatever it
//! still holds, which covers runs that end without settling every slot (a
//! dropped caller future, a panicked operation).

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::audit::{build_audit_event, AuditAction, SharedAuditSink};
use crate::core::stats::SchedulerCounters;
use crate::util::ids::{RunId, Slot};

pub(crate) struct RunTracker {
    run_id: RunId,
    counters: Arc<SchedulerCounters>,
    audit: Option<SharedAuditSink>,
    total: usize,
    /// Next slot to be admitted.
    cursor: Slot,
    in_flight: BTreeSet<Slot>,
}

impl RunTracker {
    pub(crate) fn new(
        counters: Arc<SchedulerCounters>,
        audit: Option<SharedAuditSink>,
        total: usize,
    ) -> Self {
        counters.run_started();
        Self {
            run_id: RunId::new(),
            counters,
            audit,
            total,
            cursor: 0,
            in_flight: BTreeSet::new(),
        }
    }

    pub(crate) const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Operations currently in the pool.
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn admitted(&mut self, slot: Slot) {
        debug_assert_eq!(slot, self.cursor, "slots are admitted in input order");
        self.cursor = slot + 1;
        self.in_flight.insert(slot);
        let in_flight = self.in_flight.len();

        self.counters.admitted();
        tracing::debug!(run_id = %self.run_id, slot, in_flight, "admitted");
        self.record(slot, AuditAction::Admitted, in_flight);
    }

    pub(crate) fn settled(&mut self, slot: Slot, ok: bool) {
        if !self.in_flight.remove(&slot) {
            tracing::debug!(run_id = %self.run_id, slot, "settlement for untracked slot ignored");
            return;
        }
        let in_flight = self.in_flight.len();

        self.counters.settled(ok);
        tracing::debug!(run_id = %self.run_id, slot, ok, in_flight, "settled");
        let action = if ok {
            AuditAction::Succeeded
        } else {
            AuditAction::Failed
        };
        self.record(slot, action, in_flight);
    }

    /// Drop accounting for operations still in flight and slots never admitted.
    pub(crate) fn abandon(&mut self) {
        let in_flight = std::mem::take(&mut self.in_flight);
        let queued = self.cursor..self.total;
        self.cursor = self.total;
        if in_flight.is_empty() && queued.is_empty() {
            return;
        }

        self.counters.abandoned(in_flight.len(), queued.len());
        tracing::debug!(
            run_id = %self.run_id,
            in_flight = in_flight.len(),
            queued = queued.len(),
            "abandoned"
        );
        for slot in in_flight.into_iter().chain(queued) {
            self.record(slot, AuditAction::Abandoned, 0);
        }
    }

    fn record(&self, slot: Slot, action: AuditAction, in_flight: usize) {
        if let Some(sink) = &self.audit {
            sink.lock()
                .record(build_audit_event(self.run_id, slot, action, in_flight));
        }
    }
}

impl Drop for RunTracker {
    fn drop(&mut self) {
        self.abandon();
    }
}

//! Tests for audit sink

use bounded_task_scheduler::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
use bounded_task_scheduler::util::RunId;

#[test]
fn test_in_memory_audit_sink() {
    let run = RunId::new();
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(run, 0, AuditAction::Admitted, 1));
    sink.record(build_audit_event(run, 1, AuditAction::Admitted, 2));
    sink.record(build_audit_event(run, 0, AuditAction::Succeeded, 1));

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].run_id, run);
    assert_eq!(events[2].action, AuditAction::Succeeded);
    assert_eq!(sink.admission_order(), vec![0, 1]);
    assert_eq!(sink.peak_in_flight(), 2);
}

#[test]
fn test_audit_sink_overflow() {
    let run = RunId::new();
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(run, 0, AuditAction::Admitted, 1));
    sink.record(build_audit_event(run, 1, AuditAction::Admitted, 2));
    sink.record(build_audit_event(run, 2, AuditAction::Abandoned, 0));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].slot, 1); // First one popped
    assert_eq!(events[1].slot, 2);
}

#[test]
fn test_build_audit_event() {
    let run = RunId::new();
    let event = build_audit_event(run, 7, AuditAction::Failed, 3);

    assert_eq!(event.slot, 7);
    assert_eq!(event.action, AuditAction::Failed);
    assert_eq!(event.in_flight, 3);
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_audit_event_serializes() {
    let event = build_audit_event(RunId::new(), 2, AuditAction::Abandoned, 0);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "abandoned");
    assert_eq!(json["slot"], 2);
}

#[test]
fn test_tracing_sink_accepts_events() {
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event(RunId::new(), 0, AuditAction::Admitted, 1));
}

#[test]
fn test_empty_sink() {
    let sink = InMemoryAuditSink::new(4);
    assert!(sink.events().is_empty());
    assert_eq!(sink.peak_in_flight(), 0);
}

// [libs/domain/models/src/tests_serialization.rs]
//! Matriz de certificación: ida y vuelta de los DTOs de frontera y
//! rechazo de campos desconocidos en los esquemas cerrados.

use cascade_domain_models::{
    AllocationStatus, CreateTaskPayload, NodeKind, RegisterNodePayload, SyncConfig,
    UpdateNodePayload,
};

#[test]
fn allocation_status_round_trips_through_snake_case_wire_form() {
    for (status, wire) in [
        (AllocationStatus::Pending, "\"pending\""),
        (AllocationStatus::Claimed, "\"claimed\""),
        (AllocationStatus::Executing, "\"executing\""),
        (AllocationStatus::Completed, "\"completed\""),
        (AllocationStatus::Failed, "\"failed\""),
        (AllocationStatus::Timeout, "\"timeout\""),
    ] {
        let encoded = serde_json::to_string(&status).unwrap();
        assert_eq!(encoded, wire);
        let decoded: AllocationStatus = serde_json::from_str(wire).unwrap();
        assert_eq!(decoded.as_str(), status.as_str());
    }
}

#[test]
fn allocation_status_machine_rejects_skipping_states() {
    assert!(AllocationStatus::Pending.can_transition_to(AllocationStatus::Claimed));
    assert!(!AllocationStatus::Pending.can_transition_to(AllocationStatus::Executing));
    assert!(!AllocationStatus::Completed.can_transition_to(AllocationStatus::Executing));
    assert!(AllocationStatus::Executing.can_transition_to(AllocationStatus::Failed));
}

#[test]
fn register_node_payload_rejects_unknown_fields() {
    let raw = r#"{"kind":"worker","display_name":"edge-1","api_url":null,"bogus":true}"#;
    let result: Result<RegisterNodePayload, _> = serde_json::from_str(raw);
    assert!(result.is_err());
}

#[test]
fn register_node_payload_accepts_minimal_shape() {
    let raw = r#"{"kind":"worker","display_name":"edge-1","api_url":null}"#;
    let payload: RegisterNodePayload = serde_json::from_str(raw).unwrap();
    assert_eq!(payload.kind, NodeKind::Worker);
    assert_eq!(payload.display_name, "edge-1");
}

#[test]
fn update_node_payload_is_fully_optional() {
    let payload: UpdateNodePayload = serde_json::from_str("{}").unwrap();
    assert!(payload.display_name.is_none());
    assert!(payload.sync_config.is_none());
}

#[test]
fn sync_config_defaults_capacity_to_one_with_empty_quota() {
    let config: SyncConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.max_capacity, 1);
    assert!(config.feed_quota.is_empty());
}

#[test]
fn create_task_payload_rejects_unknown_fields() {
    let raw = r#"{"name":"daily","cron_expression":"0 0 * * * *","feed_ids":[],"extra":1}"#;
    let result: Result<CreateTaskPayload, _> = serde_json::from_str(raw);
    assert!(result.is_err());
}

#[test]
fn create_task_payload_defaults_enabled_true() {
    let raw = r#"{"name":"daily","cron_expression":"0 0 * * * *","feed_ids":["f1"]}"#;
    let payload: CreateTaskPayload = serde_json::from_str(raw).unwrap();
    assert!(payload.enabled);
}

// crates/scenegate-core/src/contract/tests.rs
// ============================================================================
// Module: Session Contract Tests
// Description: Unit tests for contract construction and views.
// Purpose: Validate capability enforcement, allowlist semantics, and payload shape.
// Dependencies: scenegate-core, time
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use time::OffsetDateTime;

use super::ContractError;
use super::ContractRequest;
use super::SessionContract;
use crate::capability::Capability;
use crate::capability::CapabilityError;
use crate::identifiers::ContractId;

fn request(capabilities: &[&str], allowlist: Option<&[&str]>) -> ContractRequest {
    ContractRequest {
        host_profile: "codex_stdio".to_string(),
        runtime_profile: "inmemory".to_string(),
        capabilities: Some(capabilities.iter().map(ToString::to_string).collect()),
        tool_allowlist: allowlist.map(|tools| tools.iter().map(ToString::to_string).collect()),
    }
}

#[test]
fn create_stamps_version_id_and_timestamp() {
    let contract = SessionContract::create(request(&["DATA_ONLY"], None)).unwrap();
    assert_eq!(contract.contract_id().as_str().len(), 36);
    assert!(contract.created_at().ends_with('Z'));
    assert!(contract.capabilities().contains(Capability::DataOnly));
    let value = serde_json::to_value(&contract).unwrap();
    assert_eq!(value["contract_version"], "1.0");
}

#[test]
fn create_at_is_deterministic() {
    let contract = SessionContract::create_at(
        request(&[], None),
        ContractId::new("fixed"),
        OffsetDateTime::UNIX_EPOCH,
    )
    .unwrap();
    assert_eq!(contract.contract_id().as_str(), "fixed");
    assert_eq!(contract.created_at(), "1970-01-01T00:00:00Z");
}

#[test]
fn implication_violation_fails_construction() {
    let err = SessionContract::create(request(&["UI_LIVE"], None)).unwrap_err();
    assert_eq!(
        err,
        ContractError::Capability(CapabilityError::MissingImplied {
            implying: Capability::UiLive,
            implied: Capability::DataOnly,
        })
    );
}

#[test]
fn blank_profile_names_pass_through_verbatim() {
    let mut req = request(&[], None);
    req.host_profile = String::new();
    req.runtime_profile = "  ".to_string();
    let contract = SessionContract::create(req).unwrap();
    assert_eq!(contract.host_profile(), "");
    assert_eq!(contract.runtime_profile(), "  ");
    assert!(contract.resolved().host.is_none());
    assert!(contract.resolved().runtime.is_none());
}

#[test]
fn unregistered_profiles_pass_through_verbatim() {
    let mut req = request(&[], None);
    req.runtime_profile = "custom_runtime".to_string();
    let contract = SessionContract::create(req).unwrap();
    assert_eq!(contract.runtime_profile(), "custom_runtime");
    assert!(contract.resolved().runtime.is_none());
}

#[test]
fn allowlist_absent_admits_everything() {
    let contract = SessionContract::create(request(&[], None)).unwrap();
    assert!(contract.allows("runtime.probe"));
    assert!(contract.tool_allowlist().is_none());
}

#[test]
fn empty_allowlist_admits_nothing() {
    let contract = SessionContract::create(request(&[], Some(&[]))).unwrap();
    assert!(!contract.allows("runtime.probe"));
}

#[test]
fn allowlist_duplicates_collapse() {
    let contract = SessionContract::create(request(
        &[],
        Some(&["runtime.probe", "runtime.probe", "scene.list_objects"]),
    ))
    .unwrap();
    assert_eq!(contract.tool_allowlist().unwrap().len(), 2);
    assert!(contract.allows("scene.list_objects"));
}

#[test]
fn view_includes_resolved_profiles() {
    let contract = SessionContract::create(request(&["DATA_ONLY"], None)).unwrap();
    let value = serde_json::to_value(contract.view()).unwrap();
    assert_eq!(value["host_profile"], "codex_stdio");
    assert_eq!(value["capabilities"], serde_json::json!(["DATA_ONLY"]));
    assert_eq!(value["resolved"]["host"]["transport"], "stdio");
    assert_eq!(value["resolved"]["runtime"]["mode"], "data_only");
}

#[test]
fn request_decodes_with_optional_fields_missing() {
    let req: ContractRequest = serde_json::from_value(serde_json::json!({
        "host_profile": "codex_stdio",
        "runtime_profile": "none"
    }))
    .unwrap();
    assert!(req.capabilities.is_none());
    assert!(req.tool_allowlist.is_none());
}

// crates/scenegate-core/tests/proptest_capabilities.rs
// ============================================================================
// Module: Capability Property-Based Tests
// Description: Property tests for capability validation and gate ordering.
// Purpose: Check the implication graph and gate determinism across inputs.
// ============================================================================

//! Property-based tests for capability validation invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use scenegate_core::CAPABILITY_IMPLICATIONS;
use scenegate_core::Capability;
use scenegate_core::CapabilityError;
use scenegate_core::ContractRequest;
use scenegate_core::GateDecision;
use scenegate_core::GateRequest;
use scenegate_core::RuntimeKind;
use scenegate_core::SessionContract;
use scenegate_core::ToolGating;
use scenegate_core::evaluate_gate;
use scenegate_core::validate_capabilities;

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("DATA_ONLY".to_string()),
        Just("UI_LIVE".to_string()),
        "[A-Z_]{1,10}",
    ]
}

fn runtime_strategy() -> impl Strategy<Value = RuntimeKind> {
    prop_oneof![Just(RuntimeKind::Unavailable), Just(RuntimeKind::Fixture), Just(RuntimeKind::Remote)]
}

proptest! {
    #[test]
    fn validated_sets_satisfy_every_implication(tokens in prop::collection::vec(token_strategy(), 0 .. 6)) {
        match validate_capabilities(&tokens) {
            Ok(set) => {
                for (implying, implied) in CAPABILITY_IMPLICATIONS {
                    prop_assert!(!set.contains(*implying) || set.contains(*implied));
                }
                prop_assert!(tokens.iter().all(|token| Capability::parse(token).is_some()));
            }
            Err(CapabilityError::Unknown(unknown)) => {
                prop_assert!(!unknown.is_empty());
                for token in &unknown {
                    prop_assert!(Capability::parse(token).is_none());
                    prop_assert!(tokens.contains(token));
                }
            }
            Err(CapabilityError::MissingImplied { implying, implied }) => {
                prop_assert!(tokens.iter().any(|token| token == implying.as_str()));
                prop_assert!(tokens.iter().all(|token| token != implied.as_str()));
            }
        }
    }

    #[test]
    fn validation_ignores_token_order(tokens in prop::collection::vec(token_strategy(), 0 .. 6)) {
        let mut reversed = tokens.clone();
        reversed.reverse();
        let forward = validate_capabilities(&tokens).ok();
        let backward = validate_capabilities(&reversed).ok();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn gate_is_deterministic(
        data_only in any::<bool>(),
        allowlisted in any::<bool>(),
        runtime in runtime_strategy(),
    ) {
        let capabilities = if data_only { vec!["DATA_ONLY".to_string()] } else { Vec::new() };
        let allowlist = if allowlisted { None } else { Some(Vec::new()) };
        let contract = SessionContract::create(ContractRequest {
            host_profile: "codex_stdio".to_string(),
            runtime_profile: "none".to_string(),
            capabilities: Some(capabilities),
            tool_allowlist: allowlist,
        })
        .unwrap();
        let request = GateRequest {
            tool: "scene.list_objects",
            gating: ToolGating::for_name("scene.list_objects"),
            contract: Some(&contract),
            runtime,
        };
        let first = evaluate_gate(&request);
        let second = evaluate_gate(&request);
        prop_assert_eq!(&first, &second);
        let should_allow = data_only && allowlisted && runtime != RuntimeKind::Unavailable;
        prop_assert_eq!(matches!(first, GateDecision::Allow), should_allow);
    }
}

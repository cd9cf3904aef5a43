//! Integration tests for mlws-orchestrator
//!
//! Drives provisioning, reclamation and teardown end to end against the mock
//! provider, with sleeps recorded instead of slept.

use std::time::Duration;

use mlws_config::MlwsConfig;
use mlws_core::{ResourceKind, WorkspaceIdentity};
use mlws_orchestrator::test_utils::RecordingSleeper;
use mlws_orchestrator::{
    inspect, Action, GroupDeletion, OrchestratorError, ProvisionOutcome, Provisioner,
    RetryPolicy, ScriptedConfirmation, Teardown, TeardownOptions, TeardownOutcome,
};
use mlws_provider::mock::{MockCall, MockProvider};
use mlws_provider::{CloudProvider, WsError};

fn identity() -> WorkspaceIdentity {
    WorkspaceIdentity::new("sub-123", "rg", "demo", "eastus")
}

fn provision(provider: &MockProvider, sleeper: &RecordingSleeper) -> ProvisionOutcome {
    let config = MlwsConfig::default();
    Provisioner::new(provider, &config, sleeper)
        .run(&identity())
        .expect("provisioning failed")
}

#[test]
fn test_second_run_reuses_everything() {
    let provider = MockProvider::new().with_group("rg");
    let sleeper = RecordingSleeper::default();

    let first = provision(&provider, &sleeper);
    let ProvisionOutcome::Completed(first) = first else {
        panic!("expected a completed run");
    };
    assert_eq!(first.created(), 4);

    provider.clear_calls();
    let second = provision(&provider, &sleeper);
    let ProvisionOutcome::Completed(second) = second else {
        panic!("expected a completed run");
    };

    assert_eq!(provider.state().creates(), 0);
    assert_eq!(second.reused(), 4);
    assert!(second.resources.iter().all(|r| r.action == Action::Reused));
    assert_eq!(provider.state().purges(), 0);
    assert!(sleeper.sleeps().is_empty());
}

#[test]
fn test_soft_deleted_vault_is_reclaimed_before_creation() {
    // Visible for two soft-delete probes, gone on the third.
    let provider = MockProvider::new()
        .with_group("rg")
        .with_lingering_vault("demo-kv", 2);
    let sleeper = RecordingSleeper::default();

    let ProvisionOutcome::Completed(report) = provision(&provider, &sleeper) else {
        panic!("expected a completed run");
    };

    let state = provider.state();
    assert_eq!(state.purges(), 1);
    assert_eq!(state.soft_deleted_probes(), 3);
    assert!(state.contains(ResourceKind::Vault, "demo-kv"));

    let vault = report.outcome(ResourceKind::Vault).unwrap();
    assert_eq!(vault.action, Action::Created);
    // First probe is the initial detection, then two polling attempts.
    assert_eq!(vault.reclaim_attempts, Some(2));
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(10)]);

    let purge_at = state
        .calls
        .iter()
        .position(|c| matches!(c, MockCall::Purge(_)))
        .unwrap();
    let create_at = state
        .calls
        .iter()
        .position(|c| matches!(c, MockCall::Create(ResourceKind::Vault, _)))
        .unwrap();
    assert!(purge_at < create_at);
}

#[test]
fn test_locked_vault_name_aborts_without_creating_vault() {
    let provider = MockProvider::new()
        .with_group("rg")
        .with_lingering_vault("demo-kv", u32::MAX);
    let sleeper = RecordingSleeper::default();
    let config = MlwsConfig::default();

    let err = Provisioner::new(&provider, &config, &sleeper)
        .with_policy(RetryPolicy::new(4, Duration::from_secs(2)))
        .run(&identity())
        .unwrap_err();

    match err {
        OrchestratorError::NameLocked { name, attempts } => {
            assert_eq!(name, "demo-kv");
            assert_eq!(attempts, 4);
        }
        other => panic!("expected NameLocked, got {other:?}"),
    }

    let state = provider.state();
    // One detection probe plus exactly four polling attempts.
    assert_eq!(state.soft_deleted_probes(), 5);
    assert_eq!(state.count(|c| matches!(c, MockCall::Create(ResourceKind::Vault, _))), 0);
    assert_eq!(state.count(|c| matches!(c, MockCall::Create(ResourceKind::Workspace, _))), 0);
    assert_eq!(sleeper.sleeps().len(), 3);
}

#[test]
fn test_provider_failure_propagates() {
    let provider = MockProvider::new()
        .with_group("rg")
        .with_failing_create(ResourceKind::Telemetry);
    let sleeper = RecordingSleeper::default();
    let config = MlwsConfig::default();

    let err = Provisioner::new(&provider, &config, &sleeper)
        .run(&identity())
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Provider(WsError::Provider(_))));
    assert!(!err.is_name_locked());
    assert!(!provider.state().contains(ResourceKind::Vault, "demo-kv"));
}

#[test]
fn test_denied_subscription_fails_before_any_probe() {
    let provider = MockProvider::new()
        .with_group("rg")
        .with_denied_subscription("sub-123");
    let sleeper = RecordingSleeper::default();
    let config = MlwsConfig::default();

    let err = Provisioner::new(&provider, &config, &sleeper)
        .run(&identity())
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Provider(WsError::Auth(_))));
    assert_eq!(provider.state().calls.len(), 1);
}

#[test]
fn test_teardown_of_missing_workspace_succeeds() {
    let provider = MockProvider::new().with_group("rg");
    let confirmation = ScriptedConfirmation::default();

    let outcome = Teardown::new(&provider, &confirmation, TeardownOptions::default())
        .run(&identity())
        .unwrap();

    let TeardownOutcome::Completed(report) = outcome else {
        panic!("expected a completed teardown");
    };
    assert!(report.deleted.is_empty());
    assert_eq!(report.skipped.len(), 4);
    assert!(report.registries.is_empty());
    assert_eq!(provider.state().deletes(), 0);
}

#[test]
fn test_teardown_without_group_is_a_no_op() {
    let provider = MockProvider::new();
    let confirmation = ScriptedConfirmation::new(["YES"]);
    let options = TeardownOptions {
        delete_resource_group: true,
        purge_vault: true,
    };

    let outcome = Teardown::new(&provider, &confirmation, options)
        .run(&identity())
        .unwrap();

    assert_eq!(outcome, TeardownOutcome::GroupMissing);
    assert!(confirmation.prompts().is_empty());
    assert_eq!(provider.state().group_deletes(), 0);
}

#[test]
fn test_declined_confirmation_keeps_group() {
    let provider = MockProvider::new().with_group("rg");
    let confirmation = ScriptedConfirmation::new(["NO"]);
    let options = TeardownOptions {
        delete_resource_group: true,
        ..TeardownOptions::default()
    };

    let TeardownOutcome::Completed(report) = Teardown::new(&provider, &confirmation, options)
        .run(&identity())
        .unwrap()
    else {
        panic!("expected a completed teardown");
    };

    assert_eq!(report.group, GroupDeletion::Declined);
    assert_eq!(provider.state().group_deletes(), 0);
    assert!(provider.state().has_group("rg"));
    assert_eq!(confirmation.prompts().len(), 1);
}

#[test]
fn test_confirmed_group_deletion_is_started() {
    let provider = MockProvider::new().with_group("rg");
    let confirmation = ScriptedConfirmation::new(["YES"]);
    let options = TeardownOptions {
        delete_resource_group: true,
        ..TeardownOptions::default()
    };

    let TeardownOutcome::Completed(report) = Teardown::new(&provider, &confirmation, options)
        .run(&identity())
        .unwrap()
    else {
        panic!("expected a completed teardown");
    };

    assert_eq!(report.group, GroupDeletion::Started);
    assert_eq!(provider.state().group_deletes(), 1);
    assert!(confirmation.prompts()[0].contains("'rg'"));
}

#[test]
fn test_registries_matched_by_substring() {
    let provider = MockProvider::new()
        .with_group("rg")
        .with_resource(ResourceKind::ContainerRegistry, "demoacr", "rg")
        .with_resource(ResourceKind::ContainerRegistry, "acrdemo01", "rg")
        .with_resource(ResourceKind::ContainerRegistry, "sharedacr", "rg");
    let confirmation = ScriptedConfirmation::default();

    let TeardownOutcome::Completed(report) =
        Teardown::new(&provider, &confirmation, TeardownOptions::default())
            .run(&identity())
            .unwrap()
    else {
        panic!("expected a completed teardown");
    };

    assert_eq!(report.registries, vec!["acrdemo01".to_string(), "demoacr".to_string()]);
    let state = provider.state();
    assert!(state.contains(ResourceKind::ContainerRegistry, "sharedacr"));
    assert!(!state.contains(ResourceKind::ContainerRegistry, "demoacr"));
}

#[test]
fn test_purged_teardown_lets_create_skip_reclamation() {
    let provider = MockProvider::new().with_group("rg");
    let sleeper = RecordingSleeper::default();
    provision(&provider, &sleeper);

    let confirmation = ScriptedConfirmation::default();
    let options = TeardownOptions {
        purge_vault: true,
        ..TeardownOptions::default()
    };
    Teardown::new(&provider, &confirmation, options)
        .run(&identity())
        .unwrap();

    provider.clear_calls();
    let ProvisionOutcome::Completed(report) = provision(&provider, &sleeper) else {
        panic!("expected a completed run");
    };

    assert!(!report.vault_reclaimed());
    assert_eq!(provider.state().purges(), 0);
    assert_eq!(report.created(), 4);
}

#[test]
fn test_unpurged_teardown_forces_reclamation_on_next_create() {
    let provider = MockProvider::new().with_group("rg");
    let sleeper = RecordingSleeper::default();
    provision(&provider, &sleeper);

    let confirmation = ScriptedConfirmation::default();
    Teardown::new(&provider, &confirmation, TeardownOptions::default())
        .run(&identity())
        .unwrap();

    let ProvisionOutcome::Completed(report) = provision(&provider, &sleeper) else {
        panic!("expected a completed run");
    };

    assert!(report.vault_reclaimed());
    assert_eq!(provider.state().purges(), 1);
}

#[test]
fn test_inspect_after_provisioning_reports_all_active() {
    let provider = MockProvider::new().with_group("rg");
    let sleeper = RecordingSleeper::default();
    provision(&provider, &sleeper);

    let inventory = inspect(&provider, &identity()).unwrap();

    assert!(inventory.group_exists);
    assert_eq!(inventory.entries.len(), 4);
    assert!(inventory
        .entries
        .iter()
        .all(|e| e.state == mlws_core::ExistenceState::Active));
    assert_eq!(provider.name(), "mock");
}

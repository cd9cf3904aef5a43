//! In-memory provider for tests.
//!
//! Every call is recorded in order so tests can assert on exactly what the
//! orchestration asked the provider to do.

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use crate::{
    CloudProvider, CreateRequest, NamedResourceApi, ResourceDescriptor, ResourceGroupApi,
    Session, SessionApi, VaultApi,
};
use mlws_core::error::{Result, WsError};
use mlws_core::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Authenticate(String),
    GroupExists(String),
    GroupCreate(String),
    GroupDelete(String),
    Show(ResourceKind, String),
    Create(ResourceKind, String),
    Delete(ResourceKind, String),
    List(ResourceKind),
    SoftDeletedProbe(String),
    Purge(String),
}

#[derive(Debug, Clone, Copy)]
enum SoftDeleted {
    /// Visible until purged.
    UntilPurged,
    /// Visible for this many more probes, purged or not.
    Lingering(u32),
}

#[derive(Debug, Default)]
pub struct MockState {
    pub calls: Vec<MockCall>,
    groups: HashSet<String>,
    resources: HashMap<ResourceKind, BTreeMap<String, ResourceDescriptor>>,
    soft_deleted: HashMap<String, SoftDeleted>,
    /// Active-vault lookups that keep reporting a vault after it is gone.
    ghost_active: HashMap<String, u32>,
    failing_creates: HashSet<ResourceKind>,
    denied_subscriptions: HashSet<String>,
}

impl MockState {
    pub fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn creates(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Create(..)))
    }

    pub fn deletes(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Delete(..)))
    }

    pub fn group_deletes(&self) -> usize {
        self.count(|c| matches!(c, MockCall::GroupDelete(_)))
    }

    pub fn purges(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Purge(_)))
    }

    pub fn soft_deleted_probes(&self) -> usize {
        self.count(|c| matches!(c, MockCall::SoftDeletedProbe(_)))
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.resources
            .get(&kind)
            .is_some_and(|by_name| by_name.contains_key(name))
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }
}

type Shared = Rc<RefCell<MockState>>;

fn descriptor(
    kind: ResourceKind,
    name: &str,
    group: &str,
    location: Option<&str>,
) -> ResourceDescriptor {
    ResourceDescriptor {
        kind,
        name: name.to_string(),
        id: format!("/mock/{}/{:?}/{}", group, kind, name),
        resource_group: group.to_string(),
        location: location.map(str::to_string),
    }
}

pub struct MockSession {
    state: Shared,
}

impl SessionApi for MockSession {
    fn authenticate(&self, subscription_id: &str) -> Result<Session> {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(MockCall::Authenticate(subscription_id.to_string()));
        if state.denied_subscriptions.contains(subscription_id) {
            return Err(WsError::Auth(format!(
                "no access to subscription {subscription_id}"
            )));
        }
        Ok(Session {
            subscription_id: subscription_id.to_string(),
            account: Some("mock@example.com".to_string()),
        })
    }
}

pub struct MockGroups {
    state: Shared,
}

impl ResourceGroupApi for MockGroups {
    fn exists(&self, name: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall::GroupExists(name.to_string()));
        Ok(state.groups.contains(name))
    }

    fn create(&self, name: &str, _region: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall::GroupCreate(name.to_string()));
        state.groups.insert(name.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall::GroupDelete(name.to_string()));
        state.groups.remove(name);
        state
            .resources
            .values_mut()
            .for_each(|by_name| by_name.retain(|_, r| r.resource_group != name));
        Ok(())
    }
}

pub struct MockResources {
    kind: ResourceKind,
    state: Shared,
}

impl NamedResourceApi for MockResources {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn show(&self, name: &str, resource_group: &str) -> Result<Option<ResourceDescriptor>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall::Show(self.kind, name.to_string()));

        if self.kind == ResourceKind::Vault {
            if let Some(remaining) = state.ghost_active.get_mut(name) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Ok(Some(descriptor(self.kind, name, resource_group, None)));
                }
            }
        }

        Ok(state
            .resources
            .get(&self.kind)
            .and_then(|by_name| by_name.get(name))
            .filter(|r| r.resource_group == resource_group)
            .cloned())
    }

    fn create(&self, request: &CreateRequest) -> Result<ResourceDescriptor> {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(MockCall::Create(self.kind, request.name.clone()));

        if state.failing_creates.contains(&self.kind) {
            return Err(WsError::Provider(format!(
                "(QuotaExceeded) cannot create {} '{}'",
                self.kind, request.name
            )));
        }
        if self.kind == ResourceKind::Vault && state.soft_deleted.contains_key(&request.name) {
            return Err(WsError::Provider(format!(
                "(VaultAlreadyExists) '{}' is reserved by a soft-deleted vault",
                request.name
            )));
        }

        let created = descriptor(
            self.kind,
            &request.name,
            &request.resource_group,
            Some(&request.region),
        );
        state
            .resources
            .entry(self.kind)
            .or_default()
            .insert(request.name.clone(), created.clone());
        Ok(created)
    }

    fn delete(&self, name: &str, resource_group: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall::Delete(self.kind, name.to_string()));

        let removed = state
            .resources
            .get_mut(&self.kind)
            .and_then(|by_name| by_name.remove(name));
        match removed {
            Some(resource) if resource.resource_group == resource_group => {
                if self.kind == ResourceKind::Vault {
                    state
                        .soft_deleted
                        .insert(name.to_string(), SoftDeleted::UntilPurged);
                }
                Ok(())
            }
            Some(resource) => {
                // Wrong group: put it back and fail like the provider would.
                state
                    .resources
                    .entry(self.kind)
                    .or_default()
                    .insert(name.to_string(), resource);
                Err(WsError::Provider(format!(
                    "(ResourceNotFound) {} '{}' not in '{}'",
                    self.kind, name, resource_group
                )))
            }
            None => Err(WsError::Provider(format!(
                "(ResourceNotFound) {} '{}' was not found",
                self.kind, name
            ))),
        }
    }

    fn list(&self, resource_group: &str) -> Result<Vec<ResourceDescriptor>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall::List(self.kind));
        Ok(state
            .resources
            .get(&self.kind)
            .map(|by_name| {
                by_name
                    .values()
                    .filter(|r| r.resource_group == resource_group)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub struct MockVault {
    inner: MockResources,
}

impl NamedResourceApi for MockVault {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Vault
    }

    fn show(&self, name: &str, resource_group: &str) -> Result<Option<ResourceDescriptor>> {
        self.inner.show(name, resource_group)
    }

    fn create(&self, request: &CreateRequest) -> Result<ResourceDescriptor> {
        self.inner.create(request)
    }

    fn delete(&self, name: &str, resource_group: &str) -> Result<()> {
        self.inner.delete(name, resource_group)
    }

    fn list(&self, resource_group: &str) -> Result<Vec<ResourceDescriptor>> {
        self.inner.list(resource_group)
    }
}

impl VaultApi for MockVault {
    fn exists_soft_deleted(&self, name: &str, _region: &str) -> Result<bool> {
        let mut state = self.inner.state.borrow_mut();
        state.calls.push(MockCall::SoftDeletedProbe(name.to_string()));

        let visible = match state.soft_deleted.get_mut(name) {
            None => false,
            Some(SoftDeleted::UntilPurged) => true,
            Some(SoftDeleted::Lingering(remaining)) => {
                if *remaining > 0 {
                    *remaining -= 1;
                    true
                } else {
                    false
                }
            }
        };
        if !visible {
            state.soft_deleted.remove(name);
        }
        Ok(visible)
    }

    fn purge_soft_deleted(&self, name: &str, _region: &str) -> Result<()> {
        let mut state = self.inner.state.borrow_mut();
        state.calls.push(MockCall::Purge(name.to_string()));
        match state.soft_deleted.get(name).copied() {
            Some(SoftDeleted::UntilPurged) => {
                state.soft_deleted.remove(name);
                Ok(())
            }
            Some(SoftDeleted::Lingering(_)) => Ok(()),
            None => Err(WsError::Provider(format!(
                "(DeletedVaultNotFound) Deleted vault '{name}' not found"
            ))),
        }
    }
}

/// Mock backend. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct MockProvider {
    state: Shared,
    session: Rc<MockSession>,
    groups: Rc<MockGroups>,
    storage: Rc<MockResources>,
    telemetry: Rc<MockResources>,
    workspaces: Rc<MockResources>,
    registries: Rc<MockResources>,
    vaults: Rc<MockVault>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        let state: Shared = Rc::new(RefCell::new(MockState::default()));
        let resources = |kind| {
            Rc::new(MockResources {
                kind,
                state: state.clone(),
            })
        };
        Self {
            session: Rc::new(MockSession {
                state: state.clone(),
            }),
            groups: Rc::new(MockGroups {
                state: state.clone(),
            }),
            storage: resources(ResourceKind::Storage),
            telemetry: resources(ResourceKind::Telemetry),
            workspaces: resources(ResourceKind::Workspace),
            registries: resources(ResourceKind::ContainerRegistry),
            vaults: Rc::new(MockVault {
                inner: MockResources {
                    kind: ResourceKind::Vault,
                    state: state.clone(),
                },
            }),
            state,
        }
    }

    /// Snapshot of the recorded calls and contents.
    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn with_group(self, name: &str) -> Self {
        self.state.borrow_mut().groups.insert(name.to_string());
        self
    }

    /// Seed an existing resource without recording a call.
    pub fn with_resource(self, kind: ResourceKind, name: &str, group: &str) -> Self {
        self.state
            .borrow_mut()
            .resources
            .entry(kind)
            .or_default()
            .insert(name.to_string(), descriptor(kind, name, group, None));
        self
    }

    /// A soft-deleted vault that disappears as soon as it is purged.
    pub fn with_soft_deleted_vault(self, name: &str) -> Self {
        self.state
            .borrow_mut()
            .soft_deleted
            .insert(name.to_string(), SoftDeleted::UntilPurged);
        self
    }

    /// A soft-deleted vault that stays visible for `probes` soft-delete
    /// probes, whether or not it has been purged.
    pub fn with_lingering_vault(self, name: &str, probes: u32) -> Self {
        self.state
            .borrow_mut()
            .soft_deleted
            .insert(name.to_string(), SoftDeleted::Lingering(probes));
        self
    }

    /// Active-vault lookups report `name` for the next `probes` calls.
    pub fn with_ghost_active_vault(self, name: &str, probes: u32) -> Self {
        self.state
            .borrow_mut()
            .ghost_active
            .insert(name.to_string(), probes);
        self
    }

    pub fn with_failing_create(self, kind: ResourceKind) -> Self {
        self.state.borrow_mut().failing_creates.insert(kind);
        self
    }

    pub fn with_denied_subscription(self, subscription_id: &str) -> Self {
        self.state
            .borrow_mut()
            .denied_subscriptions
            .insert(subscription_id.to_string());
        self
    }
}

impl CloudProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn session(&self) -> &dyn SessionApi {
        self.session.as_ref()
    }

    fn resource_groups(&self) -> &dyn ResourceGroupApi {
        self.groups.as_ref()
    }

    fn storage(&self) -> &dyn NamedResourceApi {
        self.storage.as_ref()
    }

    fn telemetry(&self) -> &dyn NamedResourceApi {
        self.telemetry.as_ref()
    }

    fn workspaces(&self) -> &dyn NamedResourceApi {
        self.workspaces.as_ref()
    }

    fn registries(&self) -> &dyn NamedResourceApi {
        self.registries.as_ref()
    }

    fn vaults(&self) -> &dyn VaultApi {
        self.vaults.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_until_purged_vault_clears_on_purge() {
        let provider = MockProvider::new().with_soft_deleted_vault("demo-kv");
        let vaults = provider.vaults();
        assert!(vaults.exists_soft_deleted("demo-kv", "eastus").unwrap());
        vaults.purge_soft_deleted("demo-kv", "eastus").unwrap();
        assert!(!vaults.exists_soft_deleted("demo-kv", "eastus").unwrap());
    }

    #[test]
    fn test_lingering_vault_counts_probes() {
        let provider = MockProvider::new().with_lingering_vault("demo-kv", 2);
        let vaults = provider.vaults();
        vaults.purge_soft_deleted("demo-kv", "eastus").unwrap();
        assert!(vaults.exists_soft_deleted("demo-kv", "eastus").unwrap());
        assert!(vaults.exists_soft_deleted("demo-kv", "eastus").unwrap());
        assert!(!vaults.exists_soft_deleted("demo-kv", "eastus").unwrap());
        assert_eq!(provider.state().soft_deleted_probes(), 3);
    }

    #[test]
    fn test_deleting_vault_soft_deletes_it() {
        let provider = MockProvider::new().with_resource(ResourceKind::Vault, "demo-kv", "rg");
        provider.vaults().delete("demo-kv", "rg").unwrap();
        assert!(!provider.vaults().exists("demo-kv", "rg").unwrap());
        assert!(provider.vaults().exists_soft_deleted("demo-kv", "eastus").unwrap());
    }

    #[test]
    fn test_group_delete_removes_contained_resources() {
        let provider = MockProvider::new()
            .with_group("rg")
            .with_resource(ResourceKind::Storage, "demostorage", "rg");
        provider.resource_groups().delete("rg").unwrap();
        assert!(!provider.state().has_group("rg"));
        assert!(!provider.state().contains(ResourceKind::Storage, "demostorage"));
    }
}

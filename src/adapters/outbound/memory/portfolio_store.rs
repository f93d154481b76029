use super::snapshot::{AssociationRecord, PortfolioSnapshot};
use crate::portfolio_analysis::domain::{
    Component, ComponentId, Dependency, Project, ProjectId, VulnerabilityId,
};
use crate::ports::outbound::{
    AssociationRepository, DependencyRepository, InventoryRepository, PageRequest,
};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type AssociationKey = (VulnerabilityId, ComponentId);

#[derive(Debug, Default)]
struct StoreInner {
    components: RwLock<BTreeMap<ComponentId, Component>>,
    dependencies: RwLock<HashMap<ComponentId, Vec<Dependency>>>,
    associations: DashMap<AssociationKey, DateTime<Utc>>,
}

/// InMemoryPortfolioStore backs the inventory, dependency and association
/// ports with process memory.
///
/// Clones share the same state, so one store can be handed to every analyzer
/// of a run. Association writes go through `DashMap`'s entry API, which makes
/// `record` an atomic insert-if-absent even when analyzers run concurrently.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortfolioStore {
    inner: Arc<StoreInner>,
}

impl InMemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a snapshot, checking referential integrity.
    ///
    /// # Errors
    /// Returns a validation error on duplicate ids or on dependencies and
    /// associations that reference unknown projects or components.
    pub fn from_snapshot(snapshot: &PortfolioSnapshot) -> Result<Self> {
        let store = Self::new();

        let mut projects: HashMap<ProjectId, Project> = HashMap::new();
        for record in &snapshot.projects {
            let project = record.to_project();
            if projects.insert(project.id(), project).is_some() {
                return Err(invalid(format!("duplicate project id {}", record.id)));
            }
        }

        for record in &snapshot.components {
            if !store.insert_component(record.to_component())? {
                return Err(invalid(format!("duplicate component id {}", record.id)));
            }
        }

        for record in &snapshot.dependencies {
            let project = projects.get(&ProjectId::new(record.project)).ok_or_else(|| {
                invalid(format!(
                    "dependency references unknown project {}",
                    record.project
                ))
            })?;
            let component = ComponentId::new(record.component);
            if !store.contains_component(component)? {
                return Err(invalid(format!(
                    "dependency references unknown component {}",
                    record.component
                )));
            }
            store.add_dependency(Dependency::new(project.clone(), component))?;
        }

        for record in &snapshot.associations {
            let (vulnerability, component) = record.key();
            if !store.contains_component(component)? {
                return Err(invalid(format!(
                    "association {} references unknown component {}",
                    vulnerability, record.component
                )));
            }
            store.inner.associations.entry((vulnerability, component)).or_insert_with(Utc::now);
        }

        Ok(store)
    }

    /// Adds a component; returns false if the id was already present.
    pub fn insert_component(&self, component: Component) -> Result<bool> {
        let mut components = self.write_components()?;
        match components.entry(component.id()) {
            std::collections::btree_map::Entry::Occupied(_) => Ok(false),
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(component);
                Ok(true)
            }
        }
    }

    /// Removes a component together with its dependency rows.
    pub fn remove_component(&self, id: ComponentId) -> Result<Option<Component>> {
        let removed = self.write_components()?.remove(&id);
        self.write_dependencies()?.remove(&id);
        Ok(removed)
    }

    pub fn add_dependency(&self, dependency: Dependency) -> Result<()> {
        self.write_dependencies()?
            .entry(dependency.component_id())
            .or_default()
            .push(dependency);
        Ok(())
    }

    pub fn contains_component(&self, id: ComponentId) -> Result<bool> {
        Ok(self.read_components()?.contains_key(&id))
    }

    pub fn association_count(&self) -> usize {
        self.inner.associations.len()
    }

    /// Every recorded association, ordered by component then vulnerability.
    pub fn associations(&self) -> Vec<AssociationRecord> {
        let mut keys: Vec<AssociationKey> = self
            .inner
            .associations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        keys.into_iter()
            .map(|(vulnerability, component)| AssociationRecord {
                vulnerability: vulnerability.as_str().to_string(),
                component: component.value(),
            })
            .collect()
    }

    fn read_components(&self) -> Result<RwLockReadGuard<'_, BTreeMap<ComponentId, Component>>> {
        self.inner
            .components
            .read()
            .map_err(|e| AnalysisError::repository_unavailable("read components", e).into())
    }

    fn write_components(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<ComponentId, Component>>> {
        self.inner
            .components
            .write()
            .map_err(|e| AnalysisError::repository_unavailable("write components", e).into())
    }

    fn read_dependencies(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<ComponentId, Vec<Dependency>>>> {
        self.inner
            .dependencies
            .read()
            .map_err(|e| AnalysisError::repository_unavailable("read dependencies", e).into())
    }

    fn write_dependencies(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<ComponentId, Vec<Dependency>>>> {
        self.inner
            .dependencies
            .write()
            .map_err(|e| AnalysisError::repository_unavailable("write dependencies", e).into())
    }
}

fn invalid(message: String) -> anyhow::Error {
    AnalysisError::Validation {
        message: format!("Invalid portfolio snapshot: {}", message),
    }
    .into()
}

#[async_trait]
impl InventoryRepository for InMemoryPortfolioStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.read_components()?.len() as u64)
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Component>> {
        let lower = match request.after {
            Some(last_seen) => Bound::Excluded(last_seen),
            None => Bound::Unbounded,
        };
        Ok(self
            .read_components()?
            .range((lower, Bound::Unbounded))
            .take(request.limit)
            .map(|(_, component)| component.clone())
            .collect())
    }
}

#[async_trait]
impl DependencyRepository for InMemoryPortfolioStore {
    async fn dependencies_of(&self, component: ComponentId) -> Result<Vec<Dependency>> {
        Ok(self
            .read_dependencies()?
            .get(&component)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl AssociationRepository for InMemoryPortfolioStore {
    async fn contains(&self, vulnerability: &VulnerabilityId, component: ComponentId) -> Result<bool> {
        Ok(self
            .inner
            .associations
            .contains_key(&(vulnerability.clone(), component)))
    }

    async fn record(&self, vulnerability: &VulnerabilityId, component: ComponentId) -> Result<bool> {
        match self.inner.associations.entry((vulnerability.clone(), component)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Ok(true)
            }
        }
    }
}

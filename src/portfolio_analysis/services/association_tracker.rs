use crate::portfolio_analysis::domain::{Component, ComponentId, Project, ProjectId, Vulnerability};
use crate::ports::outbound::{AssociationRepository, DependencyRepository};
use crate::shared::Result;
use anyhow::Context;
use std::collections::BTreeMap;

/// Outcome of checking a (vulnerability, component) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationStatus {
    /// First sighting; carries every project depending on the component (maybe none)
    New { affected_projects: Vec<Project> },
    /// Already recorded; no notification may be sent
    AlreadyKnown,
}

impl AssociationStatus {
    pub fn is_new(&self) -> bool {
        matches!(self, AssociationStatus::New { .. })
    }

    pub fn affected_projects(&self) -> Option<&[Project]> {
        match self {
            AssociationStatus::New { affected_projects } => Some(affected_projects),
            AssociationStatus::AlreadyKnown => None,
        }
    }
}

/// VulnerabilityAssociationTracker decides whether a pair is newly observed
/// and, if so, which projects are affected.
///
/// Two entry points:
/// - [`check_and_collect_affected_projects`](Self::check_and_collect_affected_projects)
///   is a read against current state. It does not write, so on its own it
///   cannot stop two concurrent checks from both answering `New`.
/// - [`record_and_collect_affected_projects`](Self::record_and_collect_affected_projects)
///   reads first, collects the affected projects, then goes through the
///   repository's atomic insert-if-absent. Analyzers use this one; only the
///   caller whose insert succeeds gets `New`.
pub struct VulnerabilityAssociationTracker<A, D> {
    associations: A,
    dependencies: D,
}

impl<A, D> VulnerabilityAssociationTracker<A, D>
where
    A: AssociationRepository,
    D: DependencyRepository,
{
    pub fn new(associations: A, dependencies: D) -> Self {
        Self {
            associations,
            dependencies,
        }
    }

    /// Read-then-decide against persisted state.
    pub async fn check_and_collect_affected_projects(
        &self,
        vulnerability: &Vulnerability,
        component: &Component,
    ) -> Result<AssociationStatus> {
        let known = self
            .associations
            .contains(vulnerability.id(), component.id())
            .await
            .with_context(|| {
                format!(
                    "Failed to look up association {} on component {}",
                    vulnerability.id(),
                    component.id()
                )
            })?;
        if known {
            return Ok(AssociationStatus::AlreadyKnown);
        }
        self.new_status(component.id()).await
    }

    /// Check-and-set: records the pair and reports `New` only if this call
    /// created the record.
    ///
    /// Affected projects are collected before the record is written, so a
    /// failed lookup leaves the pair unrecorded and a later run reports it.
    pub async fn record_and_collect_affected_projects(
        &self,
        vulnerability: &Vulnerability,
        component: &Component,
    ) -> Result<AssociationStatus> {
        let AssociationStatus::New { affected_projects } = self
            .check_and_collect_affected_projects(vulnerability, component)
            .await?
        else {
            return Ok(AssociationStatus::AlreadyKnown);
        };

        let created = self
            .associations
            .record(vulnerability.id(), component.id())
            .await
            .with_context(|| {
                format!(
                    "Failed to record association {} on component {}",
                    vulnerability.id(),
                    component.id()
                )
            })?;
        if !created {
            return Ok(AssociationStatus::AlreadyKnown);
        }
        Ok(AssociationStatus::New { affected_projects })
    }

    /// Distinct projects with at least one dependency on the component,
    /// sorted by project id.
    pub async fn collect_affected_projects(&self, component: ComponentId) -> Result<Vec<Project>> {
        let dependencies = self
            .dependencies
            .dependencies_of(component)
            .await
            .with_context(|| format!("Failed to list dependencies of component {}", component))?;

        let mut projects: BTreeMap<ProjectId, Project> = BTreeMap::new();
        for dependency in dependencies {
            let project = dependency.project();
            projects
                .entry(project.id())
                .or_insert_with(|| project.clone());
        }
        Ok(projects.into_values().collect())
    }

    async fn new_status(&self, component: ComponentId) -> Result<AssociationStatus> {
        let affected_projects = self.collect_affected_projects(component).await?;
        Ok(AssociationStatus::New { affected_projects })
    }
}

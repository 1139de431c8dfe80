//! Revision resolution
//!
//! Two questions are answered here. "Which file does migration step N point
//! at?" follows the configured [`ResolutionPolicy`]. "Which definition is
//! live once the schema is at version N?" is always the greatest revision at
//! or below N, and drives what the stepper creates.

use crate::catalog::ObjectCatalog;
use crate::object::{DatabaseObject, ObjectRevision, Version};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rule picking one revision for a migration step among revisions `>= step`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// The furthest revision at or above the step
    #[default]
    LookAhead,
    /// The closest revision at or above the step
    Nearest,
}

impl ResolutionPolicy {
    /// Select a revision for `step`, or `None` when every revision is below it.
    pub fn select(self, revisions: impl IntoIterator<Item = Version>, step: Version) -> Option<Version> {
        let candidates = revisions.into_iter().filter(|r| step <= *r);
        match self {
            ResolutionPolicy::LookAhead => candidates.max(),
            ResolutionPolicy::Nearest => candidates.min(),
        }
    }
}

impl std::fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionPolicy::LookAhead => write!(f, "look_ahead"),
            ResolutionPolicy::Nearest => write!(f, "nearest"),
        }
    }
}

/// File resolved for one object at one step
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFile<'a> {
    /// The object
    pub object: &'a DatabaseObject,

    /// Selected file, `None` when the object is unaffected by the step
    pub path: Option<&'a Path>,
}

/// Resolves revisions for every object of a catalog
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a ObjectCatalog,
    policy: ResolutionPolicy,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `catalog`
    pub fn new(catalog: &'a ObjectCatalog, policy: ResolutionPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Policy used by [`Self::files_for_step`]
    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Per object, in creation order, the file selected for `step`.
    pub fn files_for_step(&self, step: Version) -> Vec<ResolvedFile<'a>> {
        self.catalog
            .creation_order()
            .map(|object| ResolvedFile {
                object,
                path: object.file_name_for_step(step, self.policy),
            })
            .collect()
    }

    /// Definitions live at schema `version`, in creation order.
    ///
    /// Objects without a revision at or below `version` do not exist yet and
    /// are left out.
    pub fn in_force_at(&self, version: Version) -> Vec<ObjectRevision<'a>> {
        self.catalog
            .creation_order()
            .filter_map(|object| {
                object
                    .revision_in_force(version)
                    .and_then(|revision| object.revision(revision))
            })
            .collect()
    }

    /// Objects that define a revision at exactly `version`, in creation order.
    pub fn changed_at(&self, version: Version) -> Vec<&'a DatabaseObject> {
        self.catalog
            .creation_order()
            .filter(|object| object.has_revision(version))
            .collect()
    }

    /// Highest revision of every object, in creation order.
    pub fn current(&self) -> Vec<ObjectRevision<'a>> {
        self.catalog
            .creation_order()
            .filter_map(|object| {
                object
                    .current_revision()
                    .and_then(|revision| object.revision(revision))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;

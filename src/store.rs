//! Entity store: the client's mirror of the most recent successful fetches.
//!
//! Collections are only ever replaced wholesale. The orchestrator is the sole
//! writer; renderers receive data by parameter and never read the store.

use crate::models::{Claimant, Service, ServiceFilter};

/// Which claimant, if any, currently drives the services view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Claimant(i64),
}

impl Selection {
    pub fn claimant_id(&self) -> Option<i64> {
        match self {
            Selection::None => None,
            Selection::Claimant(id) => Some(*id),
        }
    }
}

/// The query that populates the visible services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceScope {
    Filtered(ServiceFilter),
    WithinClaimant(i64),
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    services: Vec<Service>,
    claimants: Vec<Claimant>,
    filter: ServiceFilter,
    selection: Selection,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn claimants(&self) -> &[Claimant] {
        &self.claimants
    }

    /// Last submitted text filters. Kept while a claimant is selected so
    /// clearing the selection can fall back to them.
    pub fn filter(&self) -> &ServiceFilter {
        &self.filter
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn service(&self, id: i64) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn claimant(&self, id: i64) -> Option<&Claimant> {
        self.claimants.iter().find(|c| c.id == id)
    }

    pub fn selected_claimant(&self) -> Option<&Claimant> {
        self.selection.claimant_id().and_then(|id| self.claimant(id))
    }

    /// A claimant selection supersedes the text filters.
    pub fn service_scope(&self) -> ServiceScope {
        match self.selection {
            Selection::Claimant(id) => ServiceScope::WithinClaimant(id),
            Selection::None => ServiceScope::Filtered(self.filter.clone()),
        }
    }

    pub(crate) fn replace_services(&mut self, services: Vec<Service>) {
        self.services = services;
    }

    pub(crate) fn replace_claimants(&mut self, claimants: Vec<Claimant>) {
        self.claimants = claimants;
    }

    /// Replace the text filters. Choosing text filters ends any claimant selection.
    pub(crate) fn set_filter(&mut self, filter: ServiceFilter) {
        self.filter = filter;
        self.selection = Selection::None;
    }

    pub(crate) fn select_claimant(&mut self, id: i64) {
        self.selection = Selection::Claimant(id);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }
}

//! Synchronization orchestrator.
//!
//! Sequences gateway calls, entity store updates and re-renders in response
//! to user actions. Runs on a single thread: state lives in `RefCell`s that
//! are only borrowed between suspension points, so concurrently awaited
//! actions interleave only at gateway calls. Each list scope hands out
//! sequence tickets and only the latest response is ever applied.

mod sequence;

pub use sequence::{LoadState, ScopeTracker, Ticket};

use std::cell::{Ref, RefCell};

use tracing::{debug, info, warn};

use crate::forms::{
    ClaimantFields, ClaimantForm, FormController, FormKind, FormMode, ModalSurface, ServiceFields,
    ServiceForm, Submission, ValidationError,
};
use crate::gateway::{Gateway, GatewayResult, RequestError};
use crate::models::{Claimant, Service, ServiceFilter};
use crate::render::{
    ClaimantPicker, EntityRef, ListRenderer, ListSurface, MapRenderer, MapSurface, PickerSurface,
    RowAction,
};
use crate::store::{EntityStore, Selection, ServiceScope};

/// Dialog-level feedback: confirmations, acknowledgments and error alerts.
pub trait Notifier {
    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;
    /// Transient success message.
    fn acknowledge(&mut self, message: &str);
    fn alert(&mut self, message: &str);
}

/// Everything the orchestrator draws on.
pub struct Surfaces {
    pub service_list: Box<dyn ListSurface>,
    pub claimant_list: Box<dyn ListSurface>,
    pub claimant_picker: Box<dyn PickerSurface>,
    pub map: Box<dyn MapSurface>,
    pub service_modal: Box<dyn ModalSurface<ServiceFields>>,
    pub claimant_modal: Box<dyn ModalSurface<ClaimantFields>>,
    pub notifier: Box<dyn Notifier>,
}

/// Result of a list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was current and is now on screen.
    Applied { count: usize },
    /// A newer load was issued before this one completed.
    Discarded,
}

pub type LoadResult = Result<LoadOutcome, RequestError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { id: i64 },
    Updated { id: i64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Result of activating a row affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    EditorOpened,
    Deleted,
    Cancelled,
}

struct SyncState {
    store: EntityStore,
    services: ScopeTracker,
    claimants: ScopeTracker,
}

struct Views {
    service_list: ListRenderer<Service>,
    claimant_list: ListRenderer<Claimant>,
    picker: ClaimantPicker,
    map: MapRenderer,
    service_form: FormController<ServiceForm>,
    claimant_form: FormController<ClaimantForm>,
    notifier: Box<dyn Notifier>,
}

pub struct Orchestrator<G: Gateway> {
    gateway: G,
    state: RefCell<SyncState>,
    views: RefCell<Views>,
}

impl<G: Gateway> Orchestrator<G> {
    pub fn new(gateway: G, surfaces: Surfaces) -> Self {
        Self {
            gateway,
            state: RefCell::new(SyncState {
                store: EntityStore::new(),
                services: ScopeTracker::new(),
                claimants: ScopeTracker::new(),
            }),
            views: RefCell::new(Views {
                service_list: ListRenderer::new(surfaces.service_list),
                claimant_list: ListRenderer::new(surfaces.claimant_list),
                picker: ClaimantPicker::new(surfaces.claimant_picker),
                map: MapRenderer::new(surfaces.map),
                service_form: FormController::new(surfaces.service_modal),
                claimant_form: FormController::new(surfaces.claimant_modal),
                notifier: surfaces.notifier,
            }),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Read-only view of the entity store.
    pub fn store(&self) -> Ref<'_, EntityStore> {
        Ref::map(self.state.borrow(), |s| &s.store)
    }

    pub fn services_state(&self) -> LoadState {
        self.state.borrow().services.state()
    }

    pub fn claimants_state(&self) -> LoadState {
        self.state.borrow().claimants.state()
    }

    pub fn has_travel_overlay(&self) -> bool {
        self.views.borrow().map.has_overlay()
    }

    /// Initial load: services and claimants are independent scopes and load concurrently.
    pub async fn load_all(&self) -> (LoadResult, LoadResult) {
        tokio::join!(self.refresh_services(), self.refresh_claimants())
    }

    /// Submit text filters. Ends any claimant selection.
    pub async fn apply_filter(&self, filter: ServiceFilter) -> LoadResult {
        debug!("Applying filter {:?}", filter);
        self.views.borrow_mut().map.clear_travel_area();
        self.state.borrow_mut().store.set_filter(filter);
        self.render_picker();
        self.refresh_services().await
    }

    pub async fn clear_filter(&self) -> LoadResult {
        self.apply_filter(ServiceFilter::default()).await
    }

    /// Change the claimant selection and re-query the visible services.
    ///
    /// The previous travel-area overlay is removed before anything else.
    pub async fn select_claimant(&self, claimant_id: Option<i64>) -> LoadResult {
        self.views.borrow_mut().map.clear_travel_area();

        match claimant_id {
            None => self.state.borrow_mut().store.clear_selection(),
            Some(id) => {
                let snapshot = {
                    let mut state = self.state.borrow_mut();
                    state.store.select_claimant(id);
                    state.store.claimant(id).cloned()
                };
                match snapshot {
                    Some(claimant) => {
                        if let Some(bounds) = self.views.borrow_mut().map.show_travel_area(&claimant)
                        {
                            debug!("Fitted map to travel area of claimant {}: {:?}", id, bounds);
                        }
                    }
                    None => warn!("Claimant {} is not loaded, querying without an overlay", id),
                }
            }
        }
        self.render_picker();

        self.refresh_services().await
    }

    /// Re-issue the query for the current services scope.
    pub async fn refresh_services(&self) -> LoadResult {
        let (ticket, scope) = {
            let mut state = self.state.borrow_mut();
            let scope = state.store.service_scope();
            (state.services.begin(), scope)
        };
        debug!("Loading services {} for {:?}", ticket, scope);

        let result = match &scope {
            ServiceScope::Filtered(filter) => self.gateway.list_services(filter).await,
            ServiceScope::WithinClaimant(id) => {
                self.gateway.list_services_within_claimant(*id).await
            }
        };
        self.settle_services(ticket, result)
    }

    fn settle_services(&self, ticket: Ticket, result: GatewayResult<Vec<Service>>) -> LoadResult {
        let mut state = self.state.borrow_mut();
        if !state.services.settle(ticket, result.is_ok()) {
            debug!("Discarding stale services response {}", ticket);
            return Ok(LoadOutcome::Discarded);
        }

        let mut views = self.views.borrow_mut();
        match result {
            Ok(services) => {
                views.service_list.render(&services);
                let markers = views.map.render_services(&services);
                let count = services.len();
                info!("Loaded {} services ({} on the map)", count, markers);
                state.store.replace_services(services);
                Ok(LoadOutcome::Applied { count })
            }
            Err(err) => {
                // The store keeps its last good snapshot; only the list shows the failure.
                warn!("Failed to load services: {}", err);
                views.service_list.render_error(&err);
                Err(err)
            }
        }
    }

    pub async fn refresh_claimants(&self) -> LoadResult {
        let ticket = self.state.borrow_mut().claimants.begin();
        debug!("Loading claimants {}", ticket);
        let result = self.gateway.list_claimants().await;
        let (result, selection_dropped) = self.settle_claimants(ticket, result);
        if selection_dropped {
            // Back to the last text filters.
            if let Err(err) = self.refresh_services().await {
                debug!("Reloading services after dropping the selection failed: {}", err);
            }
        }
        result
    }

    /// Apply a claimants response. The flag is set when the selected
    /// claimant is missing from the applied snapshot and the selection was
    /// dropped, so the services scope changed.
    fn settle_claimants(
        &self,
        ticket: Ticket,
        result: GatewayResult<Vec<Claimant>>,
    ) -> (LoadResult, bool) {
        let mut state = self.state.borrow_mut();
        if !state.claimants.settle(ticket, result.is_ok()) {
            debug!("Discarding stale claimants response {}", ticket);
            return (Ok(LoadOutcome::Discarded), false);
        }

        let mut views = self.views.borrow_mut();
        match result {
            Ok(claimants) => {
                let count = claimants.len();
                info!("Loaded {} claimants", count);
                state.store.replace_claimants(claimants);

                let mut dropped = false;
                if let Selection::Claimant(id) = state.store.selection() {
                    if state.store.claimant(id).is_none() {
                        info!("Selected claimant {} no longer exists, clearing selection", id);
                        state.store.clear_selection();
                        views.map.clear_travel_area();
                        dropped = true;
                    }
                }

                views.claimant_list.render(state.store.claimants());
                views
                    .picker
                    .render(state.store.claimants(), state.store.selection());
                (Ok(LoadOutcome::Applied { count }), dropped)
            }
            Err(err) => {
                warn!("Failed to load claimants: {}", err);
                views.claimant_list.render_error(&err);
                (Err(err), false)
            }
        }
    }

    fn render_picker(&self) {
        let state = self.state.borrow();
        self.views
            .borrow_mut()
            .picker
            .render(state.store.claimants(), state.store.selection());
    }

    /// Dispatch a list row affordance.
    pub async fn activate(&self, action: &RowAction) -> Result<ActionOutcome, RequestError> {
        match action {
            RowAction::EditService(service) => {
                self.open_service_edit(service);
                Ok(ActionOutcome::EditorOpened)
            }
            RowAction::EditClaimant(claimant) => {
                self.open_claimant_edit(claimant);
                Ok(ActionOutcome::EditorOpened)
            }
            RowAction::DeleteService(target) => self.delete_service(target).await,
            RowAction::DeleteClaimant(target) => self.delete_claimant(target).await,
        }
    }

    pub fn open_service_create(&self) {
        self.views.borrow_mut().service_form.open_create();
    }

    pub fn open_service_edit(&self, service: &Service) {
        self.views.borrow_mut().service_form.open_edit(service);
    }

    pub fn service_form_mode(&self) -> FormMode {
        self.views.borrow().service_form.mode()
    }

    /// Validate and submit the service form, then refresh services on success.
    pub async fn submit_service_form(&self) -> Result<SubmitOutcome, SubmitError> {
        let prepared = self.views.borrow().service_form.prepare();
        let submission = match prepared {
            Ok(submission) => submission,
            Err(err) => {
                self.views.borrow_mut().service_form.failed(&err.to_string());
                return Err(err.into());
            }
        };

        let (result, verb) = match submission {
            Submission::Create(payload) => (
                self.gateway
                    .create_service(&payload)
                    .await
                    .map(|s| SubmitOutcome::Created { id: s.id }),
                "adding",
            ),
            Submission::Update { id, payload } => (
                self.gateway
                    .update_service(id, &payload)
                    .await
                    .map(|s| SubmitOutcome::Updated { id: s.id }),
                "updating",
            ),
        };

        match result {
            Ok(outcome) => {
                info!("Saved service: {:?}", outcome);
                self.views.borrow_mut().service_form.succeeded();
                if let Err(err) = self.refresh_services().await {
                    debug!("Refresh after saving a service failed: {}", err);
                }
                self.views
                    .borrow_mut()
                    .notifier
                    .acknowledge(&saved_message(ServiceForm::LABEL, outcome));
                Ok(outcome)
            }
            Err(err) => {
                let message = format!("Error {} service: {}", verb, err.message());
                self.views.borrow_mut().service_form.failed(&message);
                Err(err.into())
            }
        }
    }

    pub fn open_claimant_create(&self) {
        self.views.borrow_mut().claimant_form.open_create();
    }

    pub fn open_claimant_edit(&self, claimant: &Claimant) {
        self.views.borrow_mut().claimant_form.open_edit(claimant);
    }

    pub fn claimant_form_mode(&self) -> FormMode {
        self.views.borrow().claimant_form.mode()
    }

    /// Validate and submit the claimant form, then refresh claimants on success.
    pub async fn submit_claimant_form(&self) -> Result<SubmitOutcome, SubmitError> {
        let prepared = self.views.borrow().claimant_form.prepare();
        let submission = match prepared {
            Ok(submission) => submission,
            Err(err) => {
                self.views.borrow_mut().claimant_form.failed(&err.to_string());
                return Err(err.into());
            }
        };

        let (result, verb) = match submission {
            Submission::Create(payload) => (
                self.gateway
                    .create_claimant(&payload)
                    .await
                    .map(|c| SubmitOutcome::Created { id: c.id }),
                "adding",
            ),
            Submission::Update { id, payload } => (
                self.gateway
                    .update_claimant(id, &payload)
                    .await
                    .map(|c| SubmitOutcome::Updated { id: c.id }),
                "updating",
            ),
        };

        match result {
            Ok(outcome) => {
                info!("Saved claimant: {:?}", outcome);
                self.views.borrow_mut().claimant_form.succeeded();
                self.refresh_claimants_and_selection().await;
                self.views
                    .borrow_mut()
                    .notifier
                    .acknowledge(&saved_message(ClaimantForm::LABEL, outcome));
                Ok(outcome)
            }
            Err(err) => {
                let message = format!("Error {} claimant: {}", verb, err.message());
                self.views.borrow_mut().claimant_form.failed(&message);
                Err(err.into())
            }
        }
    }

    /// Delete a service after the user confirms.
    pub async fn delete_service(&self, target: &EntityRef) -> Result<ActionOutcome, RequestError> {
        let prompt = format!(
            "Are you sure you want to delete the service: \"{}\" (ID: {})?",
            target.name, target.id
        );
        if !self.views.borrow_mut().notifier.confirm(&prompt) {
            debug!("Delete of service {} cancelled", target.id);
            return Ok(ActionOutcome::Cancelled);
        }

        match self.gateway.delete_service(target.id).await {
            Ok(()) => {
                info!("Deleted service {}", target.id);
                if let Err(err) = self.refresh_services().await {
                    debug!("Refresh after deleting a service failed: {}", err);
                }
                self.views
                    .borrow_mut()
                    .notifier
                    .acknowledge(&format!("Service \"{}\" deleted successfully.", target.name));
                Ok(ActionOutcome::Deleted)
            }
            Err(err) => {
                self.views
                    .borrow_mut()
                    .notifier
                    .alert(&format!("Error deleting service: {}", err.message()));
                Err(err)
            }
        }
    }

    /// Delete a claimant after the user confirms.
    pub async fn delete_claimant(&self, target: &EntityRef) -> Result<ActionOutcome, RequestError> {
        let prompt = format!(
            "Are you sure you want to delete claimant: \"{}\" (ID: {})?",
            target.name, target.id
        );
        if !self.views.borrow_mut().notifier.confirm(&prompt) {
            debug!("Delete of claimant {} cancelled", target.id);
            return Ok(ActionOutcome::Cancelled);
        }

        match self.gateway.delete_claimant(target.id).await {
            Ok(()) => {
                info!("Deleted claimant {}", target.id);
                self.refresh_claimants_and_selection().await;
                self.views
                    .borrow_mut()
                    .notifier
                    .acknowledge(&format!("Claimant \"{}\" deleted successfully.", target.name));
                Ok(ActionOutcome::Deleted)
            }
            Err(err) => {
                self.views
                    .borrow_mut()
                    .notifier
                    .alert(&format!("Error deleting claimant: {}", err.message()));
                Err(err)
            }
        }
    }

    /// Refresh claimants after a mutation. A selection that survived the
    /// refresh is re-applied so the overlay reflects the fresh snapshot; a
    /// vanished one was already dropped when the snapshot was applied.
    async fn refresh_claimants_and_selection(&self) {
        match self.refresh_claimants().await {
            Ok(LoadOutcome::Applied { .. }) => {}
            Ok(LoadOutcome::Discarded) => return,
            Err(err) => {
                debug!("Refresh after a claimant mutation failed: {}", err);
                return;
            }
        }

        let selected = self
            .state
            .borrow()
            .store
            .selected_claimant()
            .map(|c| c.id);
        if let Some(id) = selected {
            if let Err(err) = self.select_claimant(Some(id)).await {
                debug!("Reloading services for the selection failed: {}", err);
            }
        }
    }
}

fn saved_message(label: &str, outcome: SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Created { .. } => format!("{} added successfully!", label),
        SubmitOutcome::Updated { .. } => format!("{} updated successfully!", label),
    }
}

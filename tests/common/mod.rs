//! Shared fixtures: a scripted in-memory backend and recording surfaces.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use servicefinder::forms::{ClaimantFields, ModalSurface, ServiceFields};
use servicefinder::gateway::{Gateway, GatewayResult, RequestError};
use servicefinder::models::{
    Bounds, Claimant, ClaimantCreate, ClaimantUpdate, Service, ServiceCreate, ServiceFilter,
    ServiceUpdate,
};
use servicefinder::render::{
    LayerId, ListRow, ListSurface, MapSurface, Marker, OverlayStyle, PickerOption, PickerSurface,
    Placeholder,
};
use servicefinder::sync::{Notifier, Orchestrator, Surfaces};

pub fn service(id: i64, name: &str, category: Option<&str>, point: Option<(f64, f64)>) -> Service {
    Service {
        id,
        name: name.to_string(),
        description: None,
        category: category.map(str::to_string),
        url: None,
        email: None,
        fees: None,
        location: point.map(|(lat, lon)| point_geojson(lat, lon)),
    }
}

pub fn claimant(id: i64, name: &str, extent: Option<Value>) -> Claimant {
    Claimant {
        id,
        name: name.to_string(),
        home_latitude: 51.5,
        home_longitude: -0.12,
        travel_extent_geojson: extent,
    }
}

pub fn point_geojson(lat: f64, lon: f64) -> Value {
    json!({"type": "Point", "coordinates": [lon, lat]})
}

/// A square polygon around (lat, lon).
pub fn square_extent(lat: f64, lon: f64, half: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon - half, lat - half],
            [lon + half, lat - half],
            [lon + half, lat + half],
            [lon - half, lat + half],
            [lon - half, lat - half]
        ]]
    })
}

/// A gateway call as seen by the backend. Payloads are recorded as the JSON
/// they would be sent as.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListServices(ServiceFilter),
    ListWithinClaimant(i64),
    CreateService(Value),
    UpdateService(i64, Value),
    DeleteService(i64),
    ListClaimants,
    GetClaimant(i64),
    CreateClaimant(Value),
    UpdateClaimant(i64, Value),
    DeleteClaimant(i64),
}

impl Call {
    fn op(&self) -> &'static str {
        match self {
            Call::ListServices(_) => "list_services",
            Call::ListWithinClaimant(_) => "list_within",
            Call::CreateService(_) => "create_service",
            Call::UpdateService(..) => "update_service",
            Call::DeleteService(_) => "delete_service",
            Call::ListClaimants => "list_claimants",
            Call::GetClaimant(_) => "get_claimant",
            Call::CreateClaimant(_) => "create_claimant",
            Call::UpdateClaimant(..) => "update_claimant",
            Call::DeleteClaimant(_) => "delete_claimant",
        }
    }
}

#[derive(Default)]
struct Backend {
    services: Vec<Service>,
    claimants: Vec<Claimant>,
    within: HashMap<i64, Vec<i64>>,
    next_id: i64,
    calls: Vec<Call>,
    failures: HashMap<&'static str, VecDeque<RequestError>>,
    holds: HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>,
}

/// In-memory backend. Clones share state.
#[derive(Clone, Default)]
pub struct MockGateway {
    backend: Arc<Mutex<Backend>>,
}

impl MockGateway {
    pub fn new(services: Vec<Service>, claimants: Vec<Claimant>) -> Self {
        let gateway = Self::default();
        {
            let mut backend = gateway.backend.lock().unwrap();
            backend.next_id = 100;
            backend.services = services;
            backend.claimants = claimants;
        }
        gateway
    }

    /// Services returned by `list_services_within_claimant(claimant_id)`.
    pub fn set_within(&self, claimant_id: i64, service_ids: &[i64]) {
        self.backend
            .lock()
            .unwrap()
            .within
            .insert(claimant_id, service_ids.to_vec());
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: &'static str, err: RequestError) {
        self.backend
            .lock()
            .unwrap()
            .failures
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Hold the response of the next call of `op` until the returned sender
    /// fires (or is dropped). The response reflects the backend state at
    /// call time.
    pub fn hold_next(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.backend
            .lock()
            .unwrap()
            .holds
            .entry(op)
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.backend.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.backend.lock().unwrap().calls.clear();
    }

    pub fn remove_claimant(&self, id: i64) {
        self.backend.lock().unwrap().claimants.retain(|c| c.id != id);
    }

    pub fn service_ids(&self) -> Vec<i64> {
        self.backend
            .lock()
            .unwrap()
            .services
            .iter()
            .map(|s| s.id)
            .collect()
    }

    pub fn stored_service(&self, id: i64) -> Option<Service> {
        self.backend
            .lock()
            .unwrap()
            .services
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Record the call, then run `respond` unless a failure is scripted.
    async fn call<T>(
        &self,
        call: Call,
        respond: impl FnOnce(&mut Backend) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let (result, hold) = {
            let mut backend = self.backend.lock().unwrap();
            let op = call.op();
            backend.calls.push(call);
            let hold = backend.holds.get_mut(op).and_then(VecDeque::pop_front);
            let failure = backend.failures.get_mut(op).and_then(VecDeque::pop_front);
            let result = match failure {
                Some(err) => Err(err),
                None => respond(&mut backend),
            };
            (result, hold)
        };
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        result
    }
}

fn not_found(kind: &str) -> RequestError {
    RequestError::Api {
        status: 404,
        detail: format!("{} not found", kind),
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn apply_service_fields(service: &mut Service, payload: &Value) {
    let Some(fields) = payload.as_object() else {
        return;
    };
    for (key, value) in fields {
        match key.as_str() {
            "name" => service.name = text(value).unwrap_or_default(),
            "description" => service.description = text(value),
            "category" => service.category = text(value),
            "url" => service.url = text(value),
            "email" => service.email = text(value),
            "fees" => service.fees = text(value),
            _ => {}
        }
    }
    match (payload.get("latitude"), payload.get("longitude")) {
        (Some(Value::Null), Some(Value::Null)) => service.location = None,
        (Some(lat), Some(lon)) => {
            if let (Some(lat), Some(lon)) = (lat.as_f64(), lon.as_f64()) {
                service.location = Some(point_geojson(lat, lon));
            }
        }
        _ => {}
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn list_services(&self, filter: &ServiceFilter) -> GatewayResult<Vec<Service>> {
        let filter = filter.clone();
        self.call(Call::ListServices(filter.clone()), move |b| {
            Ok(b.services
                .iter()
                .filter(|s| filter.category.is_none() || s.category == filter.category)
                .filter(|s| filter.fees.is_none() || s.fees == filter.fees)
                .cloned()
                .collect())
        })
        .await
    }

    async fn list_services_within_claimant(
        &self,
        claimant_id: i64,
    ) -> GatewayResult<Vec<Service>> {
        self.call(Call::ListWithinClaimant(claimant_id), move |b| {
            if !b.claimants.iter().any(|c| c.id == claimant_id) {
                return Err(not_found("Claimant"));
            }
            let ids = b.within.get(&claimant_id).cloned().unwrap_or_default();
            Ok(b.services
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect())
        })
        .await
    }

    async fn create_service(&self, payload: &ServiceCreate) -> GatewayResult<Service> {
        let body = serde_json::to_value(payload).unwrap();
        self.call(Call::CreateService(body.clone()), move |b| {
            b.next_id += 1;
            let mut service = service(b.next_id, "", None, None);
            apply_service_fields(&mut service, &body);
            b.services.push(service.clone());
            Ok(service)
        })
        .await
    }

    async fn update_service(&self, id: i64, payload: &ServiceUpdate) -> GatewayResult<Service> {
        let body = serde_json::to_value(payload).unwrap();
        self.call(Call::UpdateService(id, body.clone()), move |b| {
            let service = b
                .services
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| not_found("Service"))?;
            apply_service_fields(service, &body);
            Ok(service.clone())
        })
        .await
    }

    async fn delete_service(&self, id: i64) -> GatewayResult<()> {
        self.call(Call::DeleteService(id), move |b| {
            let before = b.services.len();
            b.services.retain(|s| s.id != id);
            if b.services.len() == before {
                Err(not_found("Service"))
            } else {
                Ok(())
            }
        })
        .await
    }

    async fn list_claimants(&self) -> GatewayResult<Vec<Claimant>> {
        self.call(Call::ListClaimants, |b| Ok(b.claimants.clone()))
            .await
    }

    async fn get_claimant(&self, id: i64) -> GatewayResult<Claimant> {
        self.call(Call::GetClaimant(id), move |b| {
            b.claimants
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| not_found("Claimant"))
        })
        .await
    }

    async fn create_claimant(&self, payload: &ClaimantCreate) -> GatewayResult<Claimant> {
        let body = serde_json::to_value(payload).unwrap();
        let payload = payload.clone();
        self.call(Call::CreateClaimant(body), move |b| {
            b.next_id += 1;
            let created = Claimant {
                id: b.next_id,
                name: payload.name,
                home_latitude: payload.home_latitude,
                home_longitude: payload.home_longitude,
                travel_extent_geojson: None,
            };
            b.claimants.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn update_claimant(&self, id: i64, payload: &ClaimantUpdate) -> GatewayResult<Claimant> {
        let body = serde_json::to_value(payload).unwrap();
        let payload = payload.clone();
        self.call(Call::UpdateClaimant(id, body), move |b| {
            let claimant = b
                .claimants
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| not_found("Claimant"))?;
            if let Some(name) = payload.name {
                claimant.name = name;
            }
            if let Some(lat) = payload.home_latitude {
                claimant.home_latitude = lat;
            }
            if let Some(lon) = payload.home_longitude {
                claimant.home_longitude = lon;
            }
            Ok(claimant.clone())
        })
        .await
    }

    async fn delete_claimant(&self, id: i64) -> GatewayResult<()> {
        self.call(Call::DeleteClaimant(id), move |b| {
            let before = b.claimants.len();
            b.claimants.retain(|c| c.id != id);
            if b.claimants.len() == before {
                Err(not_found("Claimant"))
            } else {
                Ok(())
            }
        })
        .await
    }
}

#[derive(Debug, Default)]
pub struct ListScreen {
    pub rows: Vec<ListRow>,
    pub placeholder: Option<Placeholder>,
    pub renders: usize,
}

pub struct RecordingList(Rc<RefCell<ListScreen>>);

impl ListSurface for RecordingList {
    fn clear(&mut self) {
        let mut screen = self.0.borrow_mut();
        screen.rows.clear();
        screen.placeholder = None;
        screen.renders += 1;
    }
    fn push_row(&mut self, row: ListRow) {
        self.0.borrow_mut().rows.push(row);
    }
    fn show_placeholder(&mut self, placeholder: Placeholder) {
        self.0.borrow_mut().placeholder = Some(placeholder);
    }
}

#[derive(Debug, Default)]
pub struct PickerScreen {
    pub options: Vec<PickerOption>,
    pub selected: Option<i64>,
}

pub struct RecordingPicker(Rc<RefCell<PickerScreen>>);

impl PickerSurface for RecordingPicker {
    fn set_options(&mut self, options: Vec<PickerOption>, selected: Option<i64>) {
        let mut screen = self.0.borrow_mut();
        screen.options = options;
        screen.selected = selected;
    }
}

#[derive(Debug, Default)]
pub struct MapScreen {
    next: u64,
    pub groups: HashMap<LayerId, Vec<Marker>>,
    pub overlays: HashMap<LayerId, (Value, OverlayStyle)>,
    pub fitted: Vec<Bounds>,
}

impl MapScreen {
    pub fn markers(&self) -> Vec<Marker> {
        self.groups.values().flatten().cloned().collect()
    }

    pub fn marker_titles(&self) -> Vec<String> {
        let mut titles: Vec<_> = self.markers().into_iter().map(|m| m.popup.title).collect();
        titles.sort();
        titles
    }
}

pub struct RecordingMap(Rc<RefCell<MapScreen>>);

impl MapSurface for RecordingMap {
    fn create_layer_group(&mut self) -> LayerId {
        let mut screen = self.0.borrow_mut();
        screen.next += 1;
        let id = LayerId(screen.next);
        screen.groups.insert(id, Vec::new());
        id
    }
    fn clear_layer_group(&mut self, group: LayerId) {
        if let Some(markers) = self.0.borrow_mut().groups.get_mut(&group) {
            markers.clear();
        }
    }
    fn add_marker(&mut self, group: LayerId, marker: Marker) {
        self.0
            .borrow_mut()
            .groups
            .entry(group)
            .or_default()
            .push(marker);
    }
    fn add_overlay(&mut self, geometry: &Value, style: &OverlayStyle) -> LayerId {
        let mut screen = self.0.borrow_mut();
        screen.next += 1;
        let id = LayerId(screen.next);
        screen.overlays.insert(id, (geometry.clone(), *style));
        id
    }
    fn remove_layer(&mut self, layer: LayerId) {
        self.0.borrow_mut().overlays.remove(&layer);
    }
    fn fit_bounds(&mut self, bounds: Bounds) {
        self.0.borrow_mut().fitted.push(bounds);
    }
}

#[derive(Debug, Default)]
pub struct Dialog<F> {
    pub open: bool,
    pub fields: F,
    pub error: Option<String>,
    pub resets: usize,
}

pub struct RecordingModal<F>(Rc<RefCell<Dialog<F>>>);

impl<F: Clone + Default> ModalSurface<F> for RecordingModal<F> {
    fn open(&mut self, fields: &F) {
        let mut dialog = self.0.borrow_mut();
        dialog.open = true;
        dialog.fields = fields.clone();
        dialog.error = None;
    }
    fn close(&mut self) {
        self.0.borrow_mut().open = false;
    }
    fn reset(&mut self) {
        let mut dialog = self.0.borrow_mut();
        dialog.fields = F::default();
        dialog.resets += 1;
    }
    fn read(&self) -> F {
        self.0.borrow().fields.clone()
    }
    fn show_error(&mut self, message: &str) {
        self.0.borrow_mut().error = Some(message.to_string());
    }
}

#[derive(Debug)]
pub struct Dialogs {
    pub answer: bool,
    pub prompts: Vec<String>,
    pub acks: Vec<String>,
    pub alerts: Vec<String>,
}

impl Default for Dialogs {
    fn default() -> Self {
        Self {
            answer: true,
            prompts: Vec::new(),
            acks: Vec::new(),
            alerts: Vec::new(),
        }
    }
}

pub struct RecordingNotifier(Rc<RefCell<Dialogs>>);

impl Notifier for RecordingNotifier {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut dialogs = self.0.borrow_mut();
        dialogs.prompts.push(prompt.to_string());
        dialogs.answer
    }
    fn acknowledge(&mut self, message: &str) {
        self.0.borrow_mut().acks.push(message.to_string());
    }
    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().alerts.push(message.to_string());
    }
}

/// An orchestrator wired to recording surfaces.
pub struct Harness {
    pub orchestrator: Orchestrator<MockGateway>,
    pub gateway: MockGateway,
    pub service_list: Rc<RefCell<ListScreen>>,
    pub claimant_list: Rc<RefCell<ListScreen>>,
    pub picker: Rc<RefCell<PickerScreen>>,
    pub map: Rc<RefCell<MapScreen>>,
    pub service_modal: Rc<RefCell<Dialog<ServiceFields>>>,
    pub claimant_modal: Rc<RefCell<Dialog<ClaimantFields>>>,
    pub dialogs: Rc<RefCell<Dialogs>>,
}

impl Harness {
    pub fn new(gateway: MockGateway) -> Self {
        let service_list = Rc::new(RefCell::new(ListScreen::default()));
        let claimant_list = Rc::new(RefCell::new(ListScreen::default()));
        let picker = Rc::new(RefCell::new(PickerScreen::default()));
        let map = Rc::new(RefCell::new(MapScreen::default()));
        let service_modal = Rc::new(RefCell::new(Dialog::default()));
        let claimant_modal = Rc::new(RefCell::new(Dialog::default()));
        let dialogs = Rc::new(RefCell::new(Dialogs::default()));

        let surfaces = Surfaces {
            service_list: Box::new(RecordingList(service_list.clone())),
            claimant_list: Box::new(RecordingList(claimant_list.clone())),
            claimant_picker: Box::new(RecordingPicker(picker.clone())),
            map: Box::new(RecordingMap(map.clone())),
            service_modal: Box::new(RecordingModal(service_modal.clone())),
            claimant_modal: Box::new(RecordingModal(claimant_modal.clone())),
            notifier: Box::new(RecordingNotifier(dialogs.clone())),
        };

        Self {
            orchestrator: Orchestrator::new(gateway.clone(), surfaces),
            gateway,
            service_list,
            claimant_list,
            picker,
            map,
            service_modal,
            claimant_modal,
            dialogs,
        }
    }

    pub fn service_titles(&self) -> Vec<String> {
        self.service_list
            .borrow()
            .rows
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.map.borrow().overlays.len()
    }
}

/// Three services, two in the "Health" category; claimant 1 has a travel
/// extent containing services 1 and 3.
pub fn seeded() -> Harness {
    let gateway = MockGateway::new(
        vec![
            service(1, "Clinic", Some("Health"), Some((51.50, -0.12))),
            service(2, "Library", Some("Education"), Some((51.52, -0.10))),
            service(3, "Pharmacy", Some("Health"), None),
        ],
        vec![
            claimant(1, "Alice", Some(square_extent(51.5, -0.12, 0.05))),
            claimant(2, "Bob", None),
        ],
    );
    gateway.set_within(1, &[1, 3]);
    Harness::new(gateway)
}

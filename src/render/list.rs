//! List and picker rendering.

use std::marker::PhantomData;

use crate::gateway::RequestError;
use crate::models::{Claimant, Service};
use crate::store::Selection;

/// Identity and display name of an entity, carried by delete affordances.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    pub id: i64,
    pub name: String,
}

/// An affordance attached to a list row.
///
/// Edit actions carry the full snapshot the row was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    EditService(Service),
    DeleteService(EntityRef),
    EditClaimant(Claimant),
    DeleteClaimant(EntityRef),
}

/// One rendered entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: i64,
    pub title: String,
    pub detail: String,
    pub edit: RowAction,
    pub delete: RowAction,
}

/// Shown in place of rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    Empty(String),
    Error(String),
}

/// A list on screen.
pub trait ListSurface {
    /// Remove every row and placeholder.
    fn clear(&mut self);
    fn push_row(&mut self, row: ListRow);
    fn show_placeholder(&mut self, placeholder: Placeholder);
}

/// Entities that can be shown as list rows.
pub trait ListItem {
    /// Plural noun used in placeholder messages.
    const NOUN: &'static str;

    fn to_row(&self) -> ListRow;
}

impl ListItem for Service {
    const NOUN: &'static str = "services";

    fn to_row(&self) -> ListRow {
        ListRow {
            id: self.id,
            title: self.name.clone(),
            detail: self.description_or_default().to_string(),
            edit: RowAction::EditService(self.clone()),
            delete: RowAction::DeleteService(EntityRef {
                id: self.id,
                name: self.name.clone(),
            }),
        }
    }
}

impl ListItem for Claimant {
    const NOUN: &'static str = "claimants";

    fn to_row(&self) -> ListRow {
        let extent = if self.has_travel_extent() {
            "Travel extent defined"
        } else {
            "No travel extent defined"
        };
        ListRow {
            id: self.id,
            title: self.name.clone(),
            detail: format!(
                "ID: {}, Home: ({}, {}) ({})",
                self.id, self.home_latitude, self.home_longitude, extent
            ),
            edit: RowAction::EditClaimant(self.clone()),
            delete: RowAction::DeleteClaimant(EntityRef {
                id: self.id,
                name: self.name.clone(),
            }),
        }
    }
}

/// Owns one list surface and renders a single entity kind into it.
pub struct ListRenderer<T: ListItem> {
    surface: Box<dyn ListSurface>,
    _item: PhantomData<fn(&T)>,
}

impl<T: ListItem> ListRenderer<T> {
    pub fn new(surface: Box<dyn ListSurface>) -> Self {
        Self {
            surface,
            _item: PhantomData,
        }
    }

    /// Replace the list with one row per item, or the empty placeholder.
    pub fn render(&mut self, items: &[T]) {
        self.surface.clear();
        if items.is_empty() {
            self.surface
                .show_placeholder(Placeholder::Empty(format!("No {} found.", T::NOUN)));
            return;
        }
        for item in items {
            self.surface.push_row(item.to_row());
        }
    }

    /// Replace the list with the error placeholder.
    pub fn render_error(&mut self, err: &RequestError) {
        self.surface.clear();
        self.surface.show_placeholder(Placeholder::Error(format!(
            "Failed to load {}: {}",
            T::NOUN,
            err.message()
        )));
    }
}

/// One selectable claimant.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption {
    pub id: i64,
    pub label: String,
}

/// The claimant selector. The "no selection" entry belongs to the surface.
pub trait PickerSurface {
    fn set_options(&mut self, options: Vec<PickerOption>, selected: Option<i64>);
}

pub struct ClaimantPicker {
    surface: Box<dyn PickerSurface>,
}

impl ClaimantPicker {
    pub fn new(surface: Box<dyn PickerSurface>) -> Self {
        Self { surface }
    }

    /// Replace the options, keeping the selection only if it still exists.
    pub fn render(&mut self, claimants: &[Claimant], selection: Selection) {
        let options = claimants
            .iter()
            .map(|c| PickerOption {
                id: c.id,
                label: format!("{} (ID: {})", c.name, c.id),
            })
            .collect();
        let selected = selection
            .claimant_id()
            .filter(|id| claimants.iter().any(|c| c.id == *id));
        self.surface.set_options(options, selected);
    }
}

//! Projections of the entity store onto the list, picker and map surfaces.
//!
//! Every render is a full replace: prior content is cleared before new
//! content is written, so repeated renders never accumulate.

mod list;
mod map;

pub use list::{
    ClaimantPicker, EntityRef, ListItem, ListRenderer, ListRow, ListSurface, PickerOption,
    PickerSurface, Placeholder, RowAction,
};
pub use map::{LayerId, MapRenderer, MapSurface, Marker, OverlayStyle, Popup, TRAVEL_AREA_STYLE};

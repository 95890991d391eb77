//! Terminal implementations of the view surfaces.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use console::style;
use serde_json::Value;
use tracing::debug;

use super::icons::{bullet, dim_arrow, error, success, warn};
use crate::forms::ModalSurface;
use crate::models::Bounds;
use crate::render::{
    LayerId, ListRow, ListSurface, MapSurface, Marker, OverlayStyle, PickerOption, PickerSurface,
    Placeholder,
};
use crate::sync::Notifier;

/// Truncate a string for column display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Prints rows as a table. A hidden list swallows output, for commands
/// whose follow-up refresh should not be echoed.
pub struct TerminalList {
    title: &'static str,
    visible: bool,
}

impl TerminalList {
    pub fn new(title: &'static str, visible: bool) -> Self {
        Self { title, visible }
    }
}

impl ListSurface for TerminalList {
    fn clear(&mut self) {
        if self.visible {
            println!("\n{}", style(self.title).bold());
            println!("{}", "-".repeat(72));
        }
    }

    fn push_row(&mut self, row: ListRow) {
        if self.visible {
            println!("{:<6} {}", style(row.id).cyan(), truncate(&row.title, 64));
            println!("       {}", style(row.detail).dim());
        }
    }

    fn show_placeholder(&mut self, placeholder: Placeholder) {
        if !self.visible {
            return;
        }
        match placeholder {
            Placeholder::Empty(message) => println!("{} {}", warn(), message),
            Placeholder::Error(message) => println!("{} {}", error(), style(message).red()),
        }
    }
}

/// Keeps the last picker options; shown as a hint line when visible.
pub struct TerminalPicker {
    visible: bool,
}

impl TerminalPicker {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }
}

impl PickerSurface for TerminalPicker {
    fn set_options(&mut self, options: Vec<PickerOption>, selected: Option<i64>) {
        debug!("Picker has {} options, selected {:?}", options.len(), selected);
        if !self.visible {
            return;
        }
        if let Some(option) = selected.and_then(|id| options.iter().find(|o| o.id == id)) {
            println!("{} Showing services for {}", dim_arrow(), option.label);
        }
    }
}

/// Text summary of what a map would show.
pub struct TerminalMap {
    visible: bool,
    next_layer: u64,
}

impl TerminalMap {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            next_layer: 0,
        }
    }

    fn allocate(&mut self) -> LayerId {
        self.next_layer += 1;
        LayerId(self.next_layer)
    }
}

impl MapSurface for TerminalMap {
    fn create_layer_group(&mut self) -> LayerId {
        self.allocate()
    }

    fn clear_layer_group(&mut self, _group: LayerId) {
        if self.visible {
            println!("\n{}", style("Map").bold());
        }
    }

    fn add_marker(&mut self, _group: LayerId, marker: Marker) {
        if self.visible {
            println!(
                "  {} {} at ({:.5}, {:.5})",
                bullet(),
                marker.popup.title,
                marker.position.lat,
                marker.position.lon
            );
        }
    }

    fn add_overlay(&mut self, geometry: &Value, overlay_style: &OverlayStyle) -> LayerId {
        if self.visible {
            let kind = geometry
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("geometry");
            println!(
                "  {} Travel area overlay ({}, {})",
                dim_arrow(),
                kind,
                overlay_style.color
            );
        }
        self.allocate()
    }

    fn remove_layer(&mut self, layer: LayerId) {
        debug!("Removed map layer {:?}", layer);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        if self.visible {
            println!(
                "  {} View fitted to ({:.4}, {:.4}) - ({:.4}, {:.4})",
                dim_arrow(),
                bounds.south,
                bounds.west,
                bounds.north,
                bounds.east
            );
        }
    }
}

#[derive(Debug, Default)]
struct Dialog<F> {
    open: bool,
    fields: F,
    error: Option<String>,
}

/// A form dialog whose fields are filled in from command-line flags.
///
/// The orchestrator pre-fills it; the command patches the shared fields
/// through a [`ModalHandle`] before submitting.
pub struct TerminalModal<F> {
    dialog: Rc<RefCell<Dialog<F>>>,
}

/// Command-side access to a [`TerminalModal`].
#[derive(Clone)]
pub struct ModalHandle<F> {
    dialog: Rc<RefCell<Dialog<F>>>,
}

impl<F: Default> TerminalModal<F> {
    pub fn new() -> (Self, ModalHandle<F>) {
        let dialog = Rc::new(RefCell::new(Dialog::default()));
        (
            Self {
                dialog: dialog.clone(),
            },
            ModalHandle { dialog },
        )
    }
}

impl<F> ModalHandle<F> {
    /// Apply edits to the fields as currently entered.
    pub fn edit(&self, f: impl FnOnce(&mut F)) {
        f(&mut self.dialog.borrow_mut().fields);
    }

    pub fn is_open(&self) -> bool {
        self.dialog.borrow().open
    }

    pub fn error(&self) -> Option<String> {
        self.dialog.borrow().error.clone()
    }
}

impl<F: Clone + Default> ModalSurface<F> for TerminalModal<F> {
    fn open(&mut self, fields: &F) {
        let mut dialog = self.dialog.borrow_mut();
        dialog.open = true;
        dialog.fields = fields.clone();
        dialog.error = None;
    }

    fn close(&mut self) {
        self.dialog.borrow_mut().open = false;
    }

    fn reset(&mut self) {
        self.dialog.borrow_mut().fields = F::default();
    }

    fn read(&self) -> F {
        self.dialog.borrow().fields.clone()
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("{} {}", error(), message);
        self.dialog.borrow_mut().error = Some(message.to_string());
    }
}

/// Prints acknowledgments and prompts on stdin for confirmations.
pub struct ConsoleNotifier {
    assume_yes: bool,
}

impl ConsoleNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for ConsoleNotifier {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} {} [y/N] ", warn(), prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }

    fn acknowledge(&mut self, message: &str) {
        eprintln!("{} {}", success(), message);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{} {}", error(), message);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

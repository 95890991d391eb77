//! servicefinder - client for a services/claimants geo backend.
//!
//! Keeps list, map and form views consistent with the backend's data:
//! services and claimants are fetched through a [`gateway::Gateway`], held in
//! an [`store::EntityStore`] and drawn onto pluggable surfaces by the
//! [`sync::Orchestrator`].

pub mod cli;
pub mod config;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod render;
pub mod store;
pub mod sync;

pub use config::Config;
pub use gateway::{Gateway, HttpGateway, RequestError};
pub use store::{EntityStore, Selection};
pub use sync::{LoadOutcome, LoadState, Orchestrator, Surfaces};

//! An orchestrator bound to terminal surfaces for one command invocation.

use crate::config::Config;
use crate::forms::{ClaimantFields, ServiceFields};
use crate::gateway::HttpGateway;
use crate::sync::{Orchestrator, Surfaces};

use super::terminal::{
    ConsoleNotifier, ModalHandle, TerminalList, TerminalMap, TerminalModal, TerminalPicker,
};

/// Which views print to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Show {
    Services,
    Claimants,
    /// Mutations only report acknowledgments and errors.
    Nothing,
}

pub struct Session {
    pub orchestrator: Orchestrator<HttpGateway>,
    pub service_fields: ModalHandle<ServiceFields>,
    pub claimant_fields: ModalHandle<ClaimantFields>,
}

impl Session {
    pub fn open(config: &Config, show: Show, assume_yes: bool) -> anyhow::Result<Self> {
        let gateway = HttpGateway::from_config(config)?;
        let (service_modal, service_fields) = TerminalModal::<ServiceFields>::new();
        let (claimant_modal, claimant_fields) = TerminalModal::<ClaimantFields>::new();

        let services = show == Show::Services;
        let surfaces = Surfaces {
            service_list: Box::new(TerminalList::new("Services", services)),
            claimant_list: Box::new(TerminalList::new("Claimants", show == Show::Claimants)),
            claimant_picker: Box::new(TerminalPicker::new(services)),
            map: Box::new(TerminalMap::new(services)),
            service_modal: Box::new(service_modal),
            claimant_modal: Box::new(claimant_modal),
            notifier: Box::new(ConsoleNotifier::new(assume_yes)),
        };

        Ok(Self {
            orchestrator: Orchestrator::new(gateway, surfaces),
            service_fields,
            claimant_fields,
        })
    }
}

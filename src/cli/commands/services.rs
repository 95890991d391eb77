//! Service commands.

use console::style;

use super::ServiceArgs;
use crate::cli::icons::error;
use crate::cli::session::{Session, Show};
use crate::config::Config;
use crate::forms::ServiceFields;
use crate::models::ServiceFilter;
use crate::render::ListItem;
use crate::sync::LoadOutcome;

/// List services by filter, or those within a claimant's travel extent.
pub async fn cmd_services_list(
    config: &Config,
    category: Option<&str>,
    fees: Option<&str>,
    claimant: Option<i64>,
) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Services, false)?;
    let orchestrator = &session.orchestrator;

    let result = match claimant {
        Some(id) => {
            // The overlay needs the claimant snapshot.
            if orchestrator.refresh_claimants().await.is_err() {
                return Ok(false);
            }
            if orchestrator.store().claimant(id).is_none() {
                eprintln!("{} Claimant {} not found", error(), id);
                return Ok(false);
            }
            orchestrator.select_claimant(Some(id)).await
        }
        None => {
            orchestrator
                .apply_filter(ServiceFilter::new(category, fees))
                .await
        }
    };

    if let Ok(LoadOutcome::Applied { count }) = result {
        println!("\n{} {}", style(count).bold(), style("service(s)").dim());
    }
    Ok(result.is_ok())
}

/// Add a service from command-line fields.
pub async fn cmd_services_create(config: &Config, args: ServiceArgs) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, false)?;
    let orchestrator = &session.orchestrator;

    orchestrator.open_service_create();
    session.service_fields.edit(|fields| apply_args(fields, args));
    Ok(orchestrator.submit_service_form().await.is_ok())
}

/// Edit a service, starting from its current values.
pub async fn cmd_services_edit(
    config: &Config,
    id: i64,
    args: ServiceArgs,
    clear_location: bool,
) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, false)?;
    let orchestrator = &session.orchestrator;

    if orchestrator.refresh_services().await.is_err() {
        eprintln!("{} Could not load services", error());
        return Ok(false);
    }
    let Some(service) = orchestrator.store().service(id).cloned() else {
        eprintln!("{} Service {} not found", error(), id);
        return Ok(false);
    };

    orchestrator.open_service_edit(&service);
    session.service_fields.edit(|fields| {
        apply_args(fields, args);
        if clear_location {
            fields.latitude.clear();
            fields.longitude.clear();
        }
    });
    Ok(orchestrator.submit_service_form().await.is_ok())
}

/// Delete a service after confirmation.
pub async fn cmd_services_delete(config: &Config, id: i64, yes: bool) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, yes)?;
    let orchestrator = &session.orchestrator;

    if orchestrator.refresh_services().await.is_err() {
        eprintln!("{} Could not load services", error());
        return Ok(false);
    }
    let Some(row) = orchestrator.store().service(id).map(|s| s.to_row()) else {
        eprintln!("{} Service {} not found", error(), id);
        return Ok(false);
    };

    Ok(orchestrator.activate(&row.delete).await.is_ok())
}

/// Overwrite the fields given on the command line.
fn apply_args(fields: &mut ServiceFields, args: ServiceArgs) {
    let ServiceArgs {
        name,
        description,
        category,
        url,
        email,
        fees,
        lat,
        lon,
    } = args;
    let targets = [
        (name, &mut fields.name),
        (description, &mut fields.description),
        (category, &mut fields.category),
        (url, &mut fields.url),
        (email, &mut fields.email),
        (fees, &mut fields.fees),
        (lat, &mut fields.latitude),
        (lon, &mut fields.longitude),
    ];
    for (value, field) in targets {
        if let Some(value) = value {
            *field = value;
        }
    }
}

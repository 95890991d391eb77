//! Claimant commands.

use console::style;

use super::ClaimantArgs;
use crate::cli::icons::{dim_arrow, error};
use crate::cli::session::{Session, Show};
use crate::config::Config;
use crate::forms::ClaimantFields;
use crate::gateway::Gateway;
use crate::render::ListItem;

pub async fn cmd_claimants_list(config: &Config) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Claimants, false)?;
    Ok(session.orchestrator.refresh_claimants().await.is_ok())
}

/// Fetch a single claimant and print its details.
pub async fn cmd_claimants_show(config: &Config, id: i64) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, false)?;

    let claimant = match session.orchestrator.gateway().get_claimant(id).await {
        Ok(claimant) => claimant,
        Err(e) => {
            eprintln!("{} {}", error(), e.message());
            return Ok(false);
        }
    };

    let row = claimant.to_row();
    println!("\n{}", style(&row.title).bold());
    println!("{}", "-".repeat(60));
    println!("{}", row.detail);
    if let Some(bounds) = claimant.travel_bounds() {
        println!(
            "  {} Travel extent spans ({:.4}, {:.4}) - ({:.4}, {:.4})",
            dim_arrow(),
            bounds.south,
            bounds.west,
            bounds.north,
            bounds.east
        );
    }
    Ok(true)
}

pub async fn cmd_claimants_create(config: &Config, args: ClaimantArgs) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, false)?;
    let orchestrator = &session.orchestrator;

    orchestrator.open_claimant_create();
    session.claimant_fields.edit(|fields| apply_args(fields, args));
    Ok(orchestrator.submit_claimant_form().await.is_ok())
}

/// Edit a claimant, starting from its current values.
pub async fn cmd_claimants_edit(
    config: &Config,
    id: i64,
    args: ClaimantArgs,
) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, false)?;
    let orchestrator = &session.orchestrator;

    if orchestrator.refresh_claimants().await.is_err() {
        eprintln!("{} Could not load claimants", error());
        return Ok(false);
    }
    let Some(claimant) = orchestrator.store().claimant(id).cloned() else {
        eprintln!("{} Claimant {} not found", error(), id);
        return Ok(false);
    };

    orchestrator.open_claimant_edit(&claimant);
    session.claimant_fields.edit(|fields| apply_args(fields, args));
    Ok(orchestrator.submit_claimant_form().await.is_ok())
}

pub async fn cmd_claimants_delete(config: &Config, id: i64, yes: bool) -> anyhow::Result<bool> {
    let session = Session::open(config, Show::Nothing, yes)?;
    let orchestrator = &session.orchestrator;

    if orchestrator.refresh_claimants().await.is_err() {
        eprintln!("{} Could not load claimants", error());
        return Ok(false);
    }
    let Some(row) = orchestrator.store().claimant(id).map(|c| c.to_row()) else {
        eprintln!("{} Claimant {} not found", error(), id);
        return Ok(false);
    };

    Ok(orchestrator.activate(&row.delete).await.is_ok())
}

fn apply_args(fields: &mut ClaimantFields, args: ClaimantArgs) {
    if let Some(name) = args.name {
        fields.name = name;
    }
    if let Some(lat) = args.lat {
        fields.home_latitude = lat;
    }
    if let Some(lon) = args.lon {
        fields.home_longitude = lon;
    }
}

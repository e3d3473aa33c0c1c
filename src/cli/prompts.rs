//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, Select};

use super::args::{GenderChoice, PlacementChoice};

/// Prompt for the gender filter, starting at the current selection
pub fn select_gender(current: GenderChoice) -> Result<GenderChoice> {
    let labels: Vec<&str> = GenderChoice::ALL.iter().map(|c| c.label()).collect();
    let default = GenderChoice::ALL
        .iter()
        .position(|c| *c == current)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Gender")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(GenderChoice::ALL[idx])
}

/// Prompt for the placement status filter, starting at the current selection
pub fn select_placement(current: PlacementChoice) -> Result<PlacementChoice> {
    let labels: Vec<&str> = PlacementChoice::ALL.iter().map(|c| c.label()).collect();
    let default = PlacementChoice::ALL
        .iter()
        .position(|c| *c == current)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Placement Status")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(PlacementChoice::ALL[idx])
}

/// Ask whether to change the filters again
pub fn confirm_another_filter() -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt("Change filters?")
        .default(true)
        .interact()?;
    Ok(confirmed)
}

//! List command handler

use anyhow::Result;

use hexrang_core::ColorStore;

use crate::output::Output;

/// List saved colors, newest first
pub fn run(
    store: &ColorStore,
    unsynced: bool,
    limit: Option<usize>,
    output: &Output,
) -> Result<()> {
    let mut records = if unsynced {
        store.get_unsynced()?
    } else {
        store.get_all()?
    };

    if let Some(limit) = limit {
        records.truncate(limit);
    }

    output.print_records(&records);
    Ok(())
}

//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Remove everything `generate` wrote
pub fn run(folio: &Folio) -> Result<()> {
    if folio.public_dir.exists() {
        fs::remove_dir_all(&folio.public_dir)?;
        tracing::info!("Deleted: {:?}", folio.public_dir);
    }

    Ok(())
}

//! First-run seed data.
//!
//! A small bundled set of prospects so a fresh database is immediately
//! usable. Seeding is skipped entirely once the store holds any record.

use crate::db::ProspectDb;
use crate::error::StoreError;
use crate::types::Prospect;

const SEED_JSON: &str = include_str!("fixtures/seed_prospects.json");

/// Insert the bundled prospects if the store is empty.
///
/// Returns the number of prospects inserted (0 when the store already has
/// data). Never overwrites existing records.
pub fn seed_if_empty(db: &ProspectDb) -> Result<usize, StoreError> {
    if db.count()? > 0 {
        log::debug!("Store already populated, skipping seed");
        return Ok(0);
    }

    let prospects: Vec<Prospect> = serde_json::from_str(SEED_JSON)?;
    let inserted = prospects.len();
    for prospect in &prospects {
        db.insert(prospect)?;
    }
    log::info!("Seeded {inserted} prospects into empty store");
    Ok(inserted)
}

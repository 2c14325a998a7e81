// Seeding in-memory collections from a JSON file
// Author: Gabriel Demetrios Lafis

use std::path::Path;
use std::sync::Arc;

use chrono::FixedOffset;
use log::info;

use crate::data::{read_document, records_at};
use super::{Collections, MemoryStore, StoreError};

/// Fields searched in the users collection
pub const USER_SEARCH_FIELDS: &[&str] = &["email", "profile.first_name", "profile.last_name"];

/// Fields searched in the lifeguards collection
pub const LIFEGUARD_SEARCH_FIELDS: &[&str] = &["email", "first_name", "last_name", "phone"];

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Build the in-memory collections, optionally loading records from a seed file.
///
/// The seed file is a JSON object with `users`, `appointments` and
/// `lifeguards` arrays.
pub fn memory_collections(seed: Option<&Path>, time_zone: FixedOffset) -> Result<Collections, StoreError> {
    let users = MemoryStore::new()
        .with_text_index(fields(USER_SEARCH_FIELDS))
        .with_time_zone(time_zone);
    let appointments = MemoryStore::new().with_time_zone(time_zone);
    let lifeguards = MemoryStore::new()
        .with_text_index(fields(LIFEGUARD_SEARCH_FIELDS))
        .with_time_zone(time_zone);

    if let Some(path) = seed {
        let document = read_document(path)?;
        let loaded = (
            users.insert_many(records_at(&document, Some("users"))?)?,
            appointments.insert_many(records_at(&document, Some("appointments"))?)?,
            lifeguards.insert_many(records_at(&document, Some("lifeguards"))?)?,
        );
        info!(
            "Seeded {} users, {} appointments and {} lifeguards from {}",
            loaded.0,
            loaded.1,
            loaded.2,
            path.display()
        );
    }

    Ok(Collections::new(Arc::new(users), Arc::new(appointments), Arc::new(lifeguards)))
}

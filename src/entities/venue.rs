// 🏛️ Venue Entity - candidate venues under consideration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dates::iso_date;
use crate::error::{PlannerError, Result};
use crate::store::{new_id, Record, RecordStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Stable identity (UUID)
    #[serde(default)]
    pub id: String,

    pub name: String,
    pub address: String,

    /// Available date, stored as "YYYY-MM-DD"
    #[serde(with = "iso_date")]
    pub date: NaiveDate,

    pub capacity: u32,

    /// Price per head for the venue's menu
    #[serde(default)]
    pub menu_price: f64,

    #[serde(default)]
    pub contact: String,
}

impl Record for Venue {
    const COLLECTION: &'static str = "venue";
    const FILE: &'static str = "venues.json";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Every editable venue field. Used for both add and edit.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueFields {
    pub name: String,
    pub address: String,
    pub date: NaiveDate,
    pub capacity: u32,
    pub menu_price: f64,
    pub contact: String,
}

impl Venue {
    pub fn new(fields: VenueFields) -> Self {
        Venue {
            id: new_id(),
            name: fields.name,
            address: fields.address,
            date: fields.date,
            capacity: fields.capacity,
            menu_price: fields.menu_price,
            contact: fields.contact,
        }
    }

    fn apply(&mut self, fields: VenueFields) {
        self.name = fields.name;
        self.address = fields.address;
        self.date = fields.date;
        self.capacity = fields.capacity;
        self.menu_price = fields.menu_price;
        self.contact = fields.contact;
    }
}

// ============================================================================
// VENUE SERVICE
// ============================================================================

#[derive(Debug, Clone)]
pub struct VenueService {
    store: RecordStore,
}

impl VenueService {
    pub fn new(store: RecordStore) -> Self {
        VenueService { store }
    }

    pub fn list(&self) -> Vec<Venue> {
        self.store.load::<Venue>().records
    }

    pub fn get(&self, id: &str) -> Result<Venue> {
        self.list()
            .into_iter()
            .find(|v| v.id == id)
            .ok_or_else(|| PlannerError::not_found(Venue::COLLECTION, id))
    }

    pub fn add(&self, fields: VenueFields) -> Result<Venue> {
        let venue = Venue::new(fields);

        let mut venues = self.store.load_for_update::<Venue>()?;
        venues.push(venue.clone());
        self.store.save(&venues)?;

        info!(id = %venue.id, "Added venue {}", venue.name);
        Ok(venue)
    }

    /// Overwrite every field of an existing venue.
    pub fn edit(&self, id: &str, fields: VenueFields) -> Result<Venue> {
        let mut venues = self.store.load_for_update::<Venue>()?;
        let venue = venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| PlannerError::not_found(Venue::COLLECTION, id))?;

        venue.apply(fields);
        let updated = venue.clone();

        self.store.save(&venues)?;
        info!(id = %id, "Updated venue");
        Ok(updated)
    }

    /// Remove a venue; `false` if it did not exist.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut venues = self.store.load_for_update::<Venue>()?;
        let before = venues.len();
        venues.retain(|v| v.id != id);

        if venues.len() == before {
            return Ok(false);
        }

        self.store.save(&venues)?;
        info!(id = %id, "Deleted venue");
        Ok(true)
    }
}

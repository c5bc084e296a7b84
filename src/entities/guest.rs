// 💌 Guest Entity - guest list, RSVPs and seating
//
// Identity is the `id` (UUID). List position is display order only, so
// deleting a guest never changes which record another request refers to.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::error::{PlannerError, Result};
use crate::forms;
use crate::store::{new_id, Record, RecordStore};

/// RSVP value given to a freshly added guest.
pub const NO_RESPONSE: &str = "No Response";

// ============================================================================
// GUEST ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    /// Stable identity (UUID)
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// "Yes" / "No" / "No Response" or any free text; compared case-insensitively
    #[serde(default = "default_rsvp")]
    pub rsvp: String,

    #[serde(default)]
    pub dietary: String,

    #[serde(default)]
    pub plus_ones: u32,

    /// Table number, `None` when unassigned
    #[serde(default)]
    pub table: Option<u32>,
}

fn default_rsvp() -> String {
    NO_RESPONSE.to_string()
}

impl Guest {
    /// Create a guest in the default state: no response, no plus-ones.
    pub fn new(name: String) -> Self {
        Guest {
            id: new_id(),
            name,
            rsvp: default_rsvp(),
            dietary: String::new(),
            plus_ones: 0,
            table: None,
        }
    }

    pub fn is_attending(&self) -> bool {
        self.rsvp.eq_ignore_ascii_case("yes")
    }

    pub fn is_declined(&self) -> bool {
        self.rsvp.eq_ignore_ascii_case("no")
    }

    /// Heads this guest brings if attending (themself plus plus-ones).
    pub fn party_size(&self) -> u64 {
        1 + u64::from(self.plus_ones)
    }

    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

impl Record for Guest {
    const COLLECTION: &'static str = "guest";
    const FILE: &'static str = "guest_list.json";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Fields a guest edit overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestUpdate {
    pub rsvp: String,
    pub dietary: String,
    pub plus_ones: u32,
}

// ============================================================================
// COUNTS
// ============================================================================

/// Total heads confirmed: every "yes" guest plus their plus-ones.
pub fn count_attending(guests: &[Guest]) -> u64 {
    guests
        .iter()
        .filter(|g| g.is_attending())
        .map(Guest::party_size)
        .sum()
}

/// Number of guests who said no (plus-ones are not counted).
pub fn count_declined(guests: &[Guest]) -> usize {
    guests.iter().filter(|g| g.is_declined()).count()
}

/// Headline numbers for the guest list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestSummary {
    pub invited: usize,
    pub attending: u64,
    pub declined: usize,
    /// Guests who have neither accepted nor declined
    pub awaiting: usize,
}

impl GuestSummary {
    pub fn from_guests(guests: &[Guest]) -> Self {
        GuestSummary {
            invited: guests.len(),
            attending: count_attending(guests),
            declined: count_declined(guests),
            awaiting: guests
                .iter()
                .filter(|g| !g.is_attending() && !g.is_declined())
                .count(),
        }
    }
}

// ============================================================================
// GUEST SERVICE
// ============================================================================

#[derive(Debug, Clone)]
pub struct GuestService {
    store: RecordStore,
}

impl GuestService {
    pub fn new(store: RecordStore) -> Self {
        GuestService { store }
    }

    /// All guests in stored order.
    pub fn list(&self) -> Vec<Guest> {
        self.store.load::<Guest>().records
    }

    pub fn get(&self, id: &str) -> Result<Guest> {
        self.list()
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| PlannerError::not_found(Guest::COLLECTION, id))
    }

    /// Append a guest in the default state. Duplicate names are allowed.
    pub fn add(&self, name: &str) -> Result<Guest> {
        let guest = Guest::new(forms::required("name", name)?);

        let mut guests = self.store.load_for_update::<Guest>()?;
        guests.push(guest.clone());
        self.store.save(&guests)?;

        info!(id = %guest.id, "Added guest {}", guest.name);
        Ok(guest)
    }

    /// Overwrite RSVP, dietary needs and plus-ones.
    pub fn edit(&self, id: &str, update: GuestUpdate) -> Result<Guest> {
        let mut guests = self.store.load_for_update::<Guest>()?;
        let guest = guests
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| PlannerError::not_found(Guest::COLLECTION, id))?;

        guest.rsvp = update.rsvp;
        guest.dietary = update.dietary;
        guest.plus_ones = update.plus_ones;
        let updated = guest.clone();

        self.store.save(&guests)?;
        info!(id = %id, rsvp = %updated.rsvp, "Updated guest");
        Ok(updated)
    }

    /// Remove a guest. Returns `false` (and writes nothing) if no such guest.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut guests = self.store.load_for_update::<Guest>()?;
        let before = guests.len();
        guests.retain(|g| g.id != id);

        if guests.len() == before {
            return Ok(false);
        }

        self.store.save(&guests)?;
        info!(id = %id, "Deleted guest");
        Ok(true)
    }

    /// Case-insensitive substring search on names.
    ///
    /// An empty query returns nothing rather than the whole list.
    pub fn search(&self, query: &str) -> Vec<Guest> {
        if query.is_empty() {
            return Vec::new();
        }

        self.list().into_iter().filter(|g| g.matches(query)).collect()
    }

    pub fn count_attending(&self) -> u64 {
        count_attending(&self.list())
    }

    pub fn count_declined(&self) -> usize {
        count_declined(&self.list())
    }

    pub fn summary(&self) -> GuestSummary {
        GuestSummary::from_guests(&self.list())
    }

    /// Reassign every guest's table from a submission keyed by guest id.
    ///
    /// Guests missing from the submission, or submitted with anything other
    /// than a positive integer, end up unassigned. Returns how many guests
    /// hold a table afterwards.
    pub fn assign_tables(&self, submitted: &HashMap<String, String>) -> Result<usize> {
        let mut guests = self.store.load_for_update::<Guest>()?;

        for guest in guests.iter_mut() {
            guest.table = forms::parse_table(submitted.get(&guest.id).map(String::as_str));
        }

        self.store.save(&guests)?;

        let seated = guests.iter().filter(|g| g.table.is_some()).count();
        info!("Assigned tables: {} of {} guests seated", seated, guests.len());
        Ok(seated)
    }
}

// ============================================================================
// TESTS
// ============================================================================

// Entity Models
//
// Each entity has:
// - Stable identity (UUID) assigned at creation
// - A service doing load / mutate / save over its collection

pub mod guest;
pub mod venue;
pub mod expense;
pub mod task;

pub use guest::{count_attending, count_declined, Guest, GuestService, GuestSummary, GuestUpdate};
pub use venue::{Venue, VenueFields, VenueService};
pub use expense::{Expense, ExpenseFields, ExpenseService};
pub use task::{Progress, Task, TaskService};

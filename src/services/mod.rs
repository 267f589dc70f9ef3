pub mod cache_sweeper;
pub mod form;
pub mod listing;
pub mod makeup;
pub mod reconciliation;
pub mod slot_grid;

pub use cache_sweeper::CacheSweeper;
pub use form::{Draft, FormMode, FormSession, SubmitOutcome, SubmitState};
pub use listing::{ListQuery, Page, Searchable, filter_by_term, paginate};
pub use makeup::{MakeupGroup, group_makeup_records};
pub use reconciliation::{WalletReport, WalletTotals, reconcile};
pub use slot_grid::{SlotGrid, TeacherAvailability, slot_grid};

//! Day planner domain model.
//!
//! # Responsibility
//! - Define canonical day-record types used by the store and its callers.
//! - Keep id generation, the zero-value factory and closed enumerations here.
//!
//! # Invariants
//! - Every day-record is identified by a `DateKey`.
//! - Every task is identified by a `TaskId` unique within its day.

pub mod date_key;
pub mod day;
pub mod icon;
pub mod id;
pub mod mood;

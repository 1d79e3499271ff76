//! Presentation-facing helpers built on the day-record store.
//!
//! # Responsibility
//! - Keep UI rules (input trimming, debounce, grid layout) out of the store.
//! - Read and write only through `PlannerStore` public operations.

pub mod calendar;
pub mod checklist;
pub mod day_summary;
pub mod notes_draft;

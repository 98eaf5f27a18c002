//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows one session; never holds rows across requests
//! - One statement per call, `RETURNING` instead of insert-then-select
//! - Store faults propagate untouched

pub mod dishes;

pub use dishes::{DbError, Dish, DishRepo};

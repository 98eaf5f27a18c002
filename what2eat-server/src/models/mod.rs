//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod dish;
pub mod listing;

pub use validation::ValidationError;
pub use dish::{DishChanges, DishName, Field, NewDish, MAX_DISH_NAME_LEN};
pub use listing::{DishListQuery, ListParams, Page, SortColumn, SortDirection};

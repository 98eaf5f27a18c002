//! Use-case services between the HTTP layer and repositories

pub mod dishes;

pub use dishes::{DishService, ServiceError, DUPLICATE_NAME_MESSAGE};

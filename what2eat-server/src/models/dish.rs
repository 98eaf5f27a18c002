//! Dish input types
//!
//! Names are validated at construction. Partial updates carry a [`Field`]
//! per column so "not supplied" never collapses into "null" or "empty".

use serde::{Deserialize, Deserializer};

use super::ValidationError;

/// Maximum dish name length, in characters
pub const MAX_DISH_NAME_LEN: usize = 255;

/// Validated dish name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DishName(String);

impl DishName {
    /// Create a dish name.
    ///
    /// # Rules
    /// - Not empty or whitespace-only
    /// - At most 255 characters
    ///
    /// # Example
    /// ```
    /// use what2eat_server::models::DishName;
    ///
    /// assert!(DishName::new("Mapo Tofu").is_ok());
    /// assert!(DishName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if s.chars().count() > MAX_DISH_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_DISH_NAME_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Presence-aware payload field.
///
/// Use with `#[serde(default)]`: a missing key deserializes to `Absent`, any
/// supplied value (including `null` when `T = Option<_>`) to `Present`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Transform a supplied value, keeping absence as is.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Field<U>, E> {
        match self {
            Self::Present(value) => f(value).map(Field::Present),
            Self::Absent => Ok(Field::Absent),
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Present)
    }
}

/// Fields for a new dish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDish {
    pub name: DishName,
    pub description: Option<String>,
}

/// Partial update: only `Present` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishChanges {
    pub name: Field<DishName>,
    /// `Present(None)` clears the description
    pub description: Field<Option<String>>,
}

impl DishChanges {
    /// True when the caller supplied no fields at all.
    pub fn is_empty(&self) -> bool {
        !self.name.is_present() && !self.description.is_present()
    }
}

//! List query types: search, sort and offset/limit paging

use std::str::FromStr;

use serde::Deserialize;

use super::ValidationError;

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Default items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Sortable dish columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Id,
    Name,
    CreatedAt,
}

impl SortColumn {
    /// Column name for ORDER BY. Only ever one of these fixed strings.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreatedAt => "created_at",
        }
    }
}

impl FromStr for SortColumn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(ValidationError::InvalidVariant {
                field: "order_by",
                value: s.to_owned(),
                expected: "id, name or created_at",
            }),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidVariant {
                field: "direction",
                value: s.to_owned(),
                expected: "asc or desc",
            }),
        }
    }
}

/// Offset/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    /// Limits above [`MAX_LIMIT`] are rejected, not truncated.
    pub fn new(limit: u32, offset: u32) -> Result<Self, ValidationError> {
        if limit > MAX_LIMIT {
            return Err(ValidationError::TooLarge {
                field: "limit",
                max: MAX_LIMIT,
            });
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Validated dish list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishListQuery {
    /// Case-insensitive substring to match against `name`
    pub search: Option<String>,
    pub order_by: SortColumn,
    pub direction: SortDirection,
    pub page: Page,
}

/// Query string for `GET /dishes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl TryFrom<ListParams> for DishListQuery {
    type Error = ValidationError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let order_by = match params.order_by.as_deref() {
            Some(s) => s.parse()?,
            None => SortColumn::default(),
        };
        let direction = match params.direction.as_deref() {
            Some(s) => s.parse()?,
            None => SortDirection::default(),
        };

        Ok(Self {
            // An empty search string means no filter
            search: params.search.filter(|s| !s.is_empty()),
            order_by,
            direction,
            page: Page::new(
                params.limit.unwrap_or(DEFAULT_LIMIT),
                params.offset.unwrap_or(0),
            )?,
        })
    }
}

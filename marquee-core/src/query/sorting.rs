//! Safelisted sort keys.
//!
//! A sort column is the one piece of caller input that ends up as SQL text
//! instead of a bound parameter. Each listable entity therefore has a closed
//! enum of sort keys; the column name is looked up from the variant and the
//! raw caller string is never formatted into a statement.

use std::fmt;

use super::validation::ValidationErrors;

/// Prefix that flips a sort key to descending order.
pub const DESCENDING_PREFIX: char = '-';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Closed set of sortable fields for one entity.
pub trait SortKey:
    Copy + Eq + fmt::Debug + Send + Sync + 'static
{
    /// Every key a caller may ask for.
    const SAFELIST: &'static [Self];

    /// Key used when the caller does not ask for one.
    const DEFAULT: Self;

    /// Public name, as it appears in `?sort=`.
    fn key(self) -> &'static str;

    /// Column the key orders by.
    fn column(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::SAFELIST.iter().copied().find(|k| k.key() == key)
    }
}

/// A safelisted key plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<K> {
    pub key: K,
    pub order: SortOrder,
}

impl<K: SortKey> SortSpec<K> {
    pub fn new(key: K, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Parse `field` or `-field`. Anything outside the safelist is rejected.
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        let (name, order) = match raw.strip_prefix(DESCENDING_PREFIX) {
            Some(rest) => (rest, SortOrder::Descending),
            None => (raw, SortOrder::Ascending),
        };

        K::from_key(name)
            .map(|key| Self { key, order })
            .ok_or_else(|| {
                ValidationErrors::single("sort", "invalid sort value")
            })
    }

    pub fn column(&self) -> &'static str {
        self.key.column()
    }
}

impl<K: SortKey> Default for SortSpec<K> {
    fn default() -> Self {
        Self::new(K::DEFAULT, SortOrder::Ascending)
    }
}

impl<K: SortKey> fmt::Display for SortSpec<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order == SortOrder::Descending {
            write!(f, "{DESCENDING_PREFIX}")?;
        }
        f.write_str(self.key.key())
    }
}

/// Sortable movie fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieSort {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortKey for MovieSort {
    const SAFELIST: &'static [Self] = &[
        MovieSort::Id,
        MovieSort::Title,
        MovieSort::Year,
        MovieSort::Runtime,
    ];
    const DEFAULT: Self = MovieSort::Id;

    fn key(self) -> &'static str {
        match self {
            MovieSort::Id => "id",
            MovieSort::Title => "title",
            MovieSort::Year => "year",
            MovieSort::Runtime => "runtime",
        }
    }

    fn column(self) -> &'static str {
        match self {
            MovieSort::Id => "id",
            MovieSort::Title => "title",
            MovieSort::Year => "year",
            MovieSort::Runtime => "runtime",
        }
    }
}

/// Sortable director fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectorSort {
    Id,
    Name,
    Surname,
}

impl SortKey for DirectorSort {
    const SAFELIST: &'static [Self] =
        &[DirectorSort::Id, DirectorSort::Name, DirectorSort::Surname];
    const DEFAULT: Self = DirectorSort::Id;

    fn key(self) -> &'static str {
        match self {
            DirectorSort::Id => "id",
            DirectorSort::Name => "name",
            DirectorSort::Surname => "surname",
        }
    }

    fn column(self) -> &'static str {
        match self {
            DirectorSort::Id => "id",
            DirectorSort::Name => "name",
            DirectorSort::Surname => "surname",
        }
    }
}

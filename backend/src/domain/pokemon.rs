//! Pokemon catalog primitives.
//!
//! Catalog records are fetched per request and never persisted; only the
//! identifiers are stored alongside users.

use std::fmt;

/// Error returned when a Pokemon identifier is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPokemonId {
    /// The rejected raw value.
    pub value: i64,
}

impl fmt::Display for InvalidPokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pokemon id must be a positive 32-bit integer, got {}",
            self.value
        )
    }
}

impl std::error::Error for InvalidPokemonId {}

/// Catalog identifier of a Pokemon species.
///
/// # Examples
/// ```
/// use trainer_roster::domain::PokemonId;
///
/// let pikachu = PokemonId::new(25).expect("positive id");
/// assert_eq!(pikachu.get(), 25);
/// assert!(PokemonId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PokemonId(i32);

impl PokemonId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i32) -> Result<Self, InvalidPokemonId> {
        if value <= 0 {
            return Err(InvalidPokemonId {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Raw identifier value.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for PokemonId {
    type Error = InvalidPokemonId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let narrowed = i32::try_from(value).map_err(|_| InvalidPokemonId { value })?;
        Self::new(narrowed)
    }
}

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Details of one Pokemon as published by the external catalog.
///
/// Optional attributes stay `None` when the catalog omits them; an empty
/// `types` list is distinct from an absent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonDetail {
    /// Catalog identifier.
    pub id: PokemonId,
    /// Species name, e.g. `pikachu`.
    pub name: String,
    /// Front sprite image URL.
    pub image_url: Option<String>,
    /// Type tags such as `electric`.
    pub types: Option<Vec<String>>,
    /// Height in decimetres.
    pub height: Option<u32>,
    /// Weight in hectograms.
    pub weight: Option<u32>,
}

impl PokemonDetail {
    /// Minimal detail with only the mandatory fields populated.
    pub fn named(id: PokemonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: None,
            types: None,
            height: None,
            weight: None,
        }
    }
}

//! DTOs for decoding PokeAPI `pokemon` resources.
//!
//! Only the fields the domain needs are modelled. Everything else in the
//! (large) upstream payload is ignored by serde.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{PokemonDetail, PokemonId};

#[derive(Debug, Deserialize)]
pub(super) struct PokemonDto {
    pub(super) id: Option<i64>,
    pub(super) name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub(super) height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub(super) weight: Option<u32>,
    pub(super) sprites: Option<SpritesDto>,
    pub(super) types: Option<Vec<TypeSlotDto>>,
}

/// Reads an optional measurement; anything that is not a `u32` becomes `None`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok()))
}

#[derive(Debug, Deserialize)]
pub(super) struct SpritesDto {
    pub(super) front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TypeSlotDto {
    #[serde(rename = "type")]
    pub(super) kind: Option<NamedResourceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NamedResourceDto {
    pub(super) name: Option<String>,
}

impl PokemonDto {
    pub(super) fn into_domain(self) -> Result<PokemonDetail, String> {
        let raw_id = self.id.ok_or("pokemon payload missing numeric id")?;
        let id = PokemonId::try_from(raw_id).map_err(|error| error.to_string())?;
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| format!("pokemon {raw_id} payload missing name"))?;

        let types = self.types.map(|slots| {
            slots
                .into_iter()
                .filter_map(|slot| slot.kind.and_then(|kind| kind.name))
                .collect()
        });

        Ok(PokemonDetail {
            id,
            name,
            image_url: self.sprites.and_then(|sprites| sprites.front_default),
            types,
            height: self.height,
            weight: self.weight,
        })
    }
}

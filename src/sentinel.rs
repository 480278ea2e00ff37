//! "No data" sentinels for failed backend calls.
//!
//! Pages never surface a fetch error. A failure is logged once, naming the
//! operation, and replaced with the operation's sentinel: `None` for
//! endpoints that return Pokémon or role groupings, an empty list for the
//! endpoints that return filter options.

use tracing::error;

use crate::error::FetchResult;
use crate::fetcher::PokemonSource;
use crate::models::{Pokemon, RoleGroups, TimePeriodDataset};

/// Collapse a [`FetchResult`] into its sentinel, logging the failure.
pub trait SentinelExt<T> {
    /// Null sentinel: `None` on failure.
    fn or_absent(self) -> Option<T>;

    /// Empty sentinel: `T::default()` on failure.
    fn or_empty(self) -> T
    where
        T: Default;
}

impl<T> SentinelExt<T> for FetchResult<T> {
    fn or_absent(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                error!(operation = e.operation.name(), "Error fetching Pokémon data: {}", e);
                None
            }
        }
    }

    fn or_empty(self) -> T
    where
        T: Default,
    {
        self.or_absent().unwrap_or_default()
    }
}

pub async fn fetch_pokemon_by_gender<S: PokemonSource>(
    source: &S,
    gender: &str,
) -> Option<Vec<Pokemon>> {
    source.pokemon_by_gender(gender).await.or_absent()
}

pub async fn filter_pokemon_by_type<S: PokemonSource>(
    source: &S,
    gender: &str,
    type_name: &str,
) -> Option<Vec<Pokemon>> {
    source.filter_gender_by_type(gender, type_name).await.or_absent()
}

pub async fn fetch_available_types<S: PokemonSource>(source: &S, gender: &str) -> Vec<String> {
    source.available_types(gender).await.or_empty()
}

pub async fn fetch_pokemon_by_type<S: PokemonSource>(
    source: &S,
    type_name: &str,
) -> Option<Vec<Pokemon>> {
    source.pokemon_by_type(type_name).await.or_absent()
}

pub async fn fetch_pokemon_roles<S: PokemonSource>(source: &S, gender: &str) -> Option<RoleGroups> {
    source.roles_for_gender(gender).await.or_absent()
}

pub async fn fetch_available_abilities<S: PokemonSource>(
    source: &S,
    type_name: &str,
) -> Vec<String> {
    source.available_abilities(type_name).await.or_empty()
}

pub async fn filter_pokemon_by_ability<S: PokemonSource>(
    source: &S,
    type_name: &str,
    ability: &str,
) -> Option<Vec<Pokemon>> {
    source.filter_type_by_ability(type_name, ability).await.or_absent()
}

pub async fn fetch_time_based_pokemon<S: PokemonSource>(source: &S) -> Option<TimePeriodDataset> {
    source.time_based_pokemon().await.or_absent()
}

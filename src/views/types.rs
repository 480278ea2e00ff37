//! Type page: every Pokémon of one type, filterable by ability.

use tracing::info;

use super::filter::{Baseline, FilterScope, FilterState};
use crate::fetcher::PokemonSource;
use crate::sentinel;

#[derive(Debug, Clone)]
pub struct TypePage {
    type_name: String,
    available_abilities: Vec<String>,
    filter: FilterState,
}

impl TypePage {
    /// Fetches the type's Pokémon and ability options.
    ///
    /// Clearing the ability filter later refetches the unfiltered list
    /// rather than replaying the mounted one.
    pub async fn mount<S: PokemonSource>(source: &S, type_name: &str) -> Self {
        let (initial, available_abilities) = tokio::join!(
            sentinel::fetch_pokemon_by_type(source, type_name),
            sentinel::fetch_available_abilities(source, type_name),
        );
        info!(
            type_name,
            pokemon = initial.as_ref().map_or(0, Vec::len),
            abilities = available_abilities.len(),
            "Mounted type page"
        );

        let scope = FilterScope::TypeByAbility {
            type_name: type_name.to_string(),
        };
        Self {
            type_name: type_name.to_string(),
            available_abilities,
            filter: FilterState::new(scope, Baseline::Refetch, initial),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn available_abilities(&self) -> &[String] {
        &self.available_abilities
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub async fn select_ability<S: PokemonSource>(&mut self, source: &S, ability: &str) {
        self.filter.select_filter(source, ability).await;
    }
}

//! In-memory `PokemonSource` for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use itertools::Itertools;

use crate::error::{FetchError, FetchErrorKind, FetchResult};
use crate::fetcher::{Operation, PokemonSource};
use crate::models::{Pokemon, RoleGroups, TimePeriodDataset};

pub struct FakeSource {
    fail: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

fn pokemon(name: &str, types: &[&str], abilities: &[&str]) -> Pokemon {
    Pokemon {
        name: name.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
        abilities: abilities.iter().map(|a| a.to_string()).collect(),
        stats: [("hp".to_string(), 44)].into_iter().collect(),
        sprite: Some(format!("https://sprites.test/{name}.png")),
    }
}

impl FakeSource {
    /// Every call succeeds against a three-Pokémon catalog.
    pub fn catalog() -> Self {
        Self {
            fail: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a 500.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::catalog()
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn all_pokemon() -> Vec<Pokemon> {
        vec![
            pokemon("squirtle", &["water"], &["torrent", "rain-dish"]),
            pokemon("charmander", &["fire"], &["blaze", "solar-power"]),
            pokemon("vulpix", &["fire"], &["flash-fire", "drought"]),
        ]
    }

    pub fn pokemon_of_type(type_name: &str) -> Vec<Pokemon> {
        Self::all_pokemon()
            .into_iter()
            .filter(|p| p.types.iter().any(|t| t == type_name))
            .collect()
    }

    /// Paths requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T>(&self, operation: Operation, value: impl FnOnce() -> T) -> FetchResult<T> {
        self.calls.lock().unwrap().push(operation.path());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(FetchError::new(
                operation,
                FetchErrorKind::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            ));
        }
        Ok(value())
    }
}

impl PokemonSource for FakeSource {
    async fn pokemon_by_gender(&self, gender: &str) -> FetchResult<Vec<Pokemon>> {
        let op = Operation::PokemonByGender {
            gender: gender.to_string(),
        };
        self.answer(op, Self::all_pokemon).await
    }

    async fn filter_gender_by_type(
        &self,
        gender: &str,
        type_name: &str,
    ) -> FetchResult<Vec<Pokemon>> {
        let op = Operation::FilterGenderByType {
            gender: gender.to_string(),
            type_name: type_name.to_string(),
        };
        self.answer(op, || Self::pokemon_of_type(type_name)).await
    }

    async fn available_types(&self, gender: &str) -> FetchResult<Vec<String>> {
        let op = Operation::AvailableTypes {
            gender: gender.to_string(),
        };
        self.answer(op, || vec!["water".to_string(), "fire".to_string()])
            .await
    }

    async fn pokemon_by_type(&self, type_name: &str) -> FetchResult<Vec<Pokemon>> {
        let op = Operation::PokemonByType {
            type_name: type_name.to_string(),
        };
        self.answer(op, || Self::pokemon_of_type(type_name)).await
    }

    async fn roles_for_gender(&self, gender: &str) -> FetchResult<RoleGroups> {
        let op = Operation::RolesForGender {
            gender: gender.to_string(),
        };
        self.answer(op, || {
            let mut groups = RoleGroups::new();
            groups.insert("Tank".to_string(), Self::pokemon_of_type("water"));
            groups.insert("Attacker".to_string(), Self::pokemon_of_type("fire"));
            groups
        })
        .await
    }

    async fn available_abilities(&self, type_name: &str) -> FetchResult<Vec<String>> {
        let op = Operation::AvailableAbilities {
            type_name: type_name.to_string(),
        };
        self.answer(op, || {
            Self::pokemon_of_type(type_name)
                .into_iter()
                .flat_map(|p| p.abilities)
                .unique()
                .collect()
        })
        .await
    }

    async fn filter_type_by_ability(
        &self,
        type_name: &str,
        ability: &str,
    ) -> FetchResult<Vec<Pokemon>> {
        let op = Operation::FilterTypeByAbility {
            type_name: type_name.to_string(),
            ability: ability.to_string(),
        };
        self.answer(op, || {
            Self::pokemon_of_type(type_name)
                .into_iter()
                .filter(|p| p.abilities.iter().any(|a| a == ability))
                .collect()
        })
        .await
    }

    async fn time_based_pokemon(&self) -> FetchResult<TimePeriodDataset> {
        self.answer(Operation::TimeBasedPokemon, || TimePeriodDataset {
            time_period: "night".to_string(),
            pokemon: Self::all_pokemon(),
        })
        .await
    }
}

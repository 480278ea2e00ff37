//! HTTP client for the Pokémon backend.
//!
//! One method per backend endpoint. Every method performs exactly one GET
//! and returns an explicit [`FetchResult`]; turning failures into the
//! "no data" sentinels is left to [`crate::sentinel`].

use std::fmt;
use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{FetchError, FetchErrorKind, FetchResult, PokeviewError};
use crate::models::{Pokemon, RoleGroups, TimePeriodDataset};

/// Backend used when no `POKEVIEW_API_URL` is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// A backend endpoint together with the parameters interpolated into its path.
///
/// Parameters are inserted verbatim; callers are responsible for passing
/// URL-safe values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    PokemonByGender { gender: String },
    FilterGenderByType { gender: String, type_name: String },
    AvailableTypes { gender: String },
    PokemonByType { type_name: String },
    RolesForGender { gender: String },
    AvailableAbilities { type_name: String },
    FilterTypeByAbility { type_name: String, ability: String },
    TimeBasedPokemon,
}

impl Operation {
    /// Path relative to the backend base URL.
    pub fn path(&self) -> String {
        match self {
            Self::PokemonByGender { gender } => format!("/pokemon-by-gender/{gender}"),
            Self::FilterGenderByType { gender, type_name } => {
                format!("/pokemon-by-gender/{gender}/filter/{type_name}")
            }
            Self::AvailableTypes { gender } => format!("/available-types/{gender}"),
            Self::PokemonByType { type_name } => format!("/pokemon-by-type/{type_name}"),
            Self::RolesForGender { gender } => format!("/pokemon-roles/{gender}"),
            Self::AvailableAbilities { type_name } => {
                format!("/available-abilities/{type_name}")
            }
            Self::FilterTypeByAbility { type_name, ability } => {
                format!("/pokemon-by-type/{type_name}/filter/{ability}")
            }
            Self::TimeBasedPokemon => "/pokemon-by-time".to_string(),
        }
    }

    /// Human-readable name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PokemonByGender { .. } => "fetch pokemon by gender",
            Self::FilterGenderByType { .. } => "filter pokemon by gender and type",
            Self::AvailableTypes { .. } => "fetch available types",
            Self::PokemonByType { .. } => "fetch pokemon by type",
            Self::RolesForGender { .. } => "fetch pokemon roles",
            Self::AvailableAbilities { .. } => "fetch available abilities",
            Self::FilterTypeByAbility { .. } => "filter pokemon by type and ability",
            Self::TimeBasedPokemon => "fetch time-based pokemon",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.path())
    }
}

/// Anything that can answer the backend's queries.
///
/// [`ApiClient`] is the real implementation; the view components are written
/// against this trait so they can be driven without a network.
pub trait PokemonSource: Send + Sync {
    fn pokemon_by_gender(
        &self,
        gender: &str,
    ) -> impl Future<Output = FetchResult<Vec<Pokemon>>> + Send;

    fn filter_gender_by_type(
        &self,
        gender: &str,
        type_name: &str,
    ) -> impl Future<Output = FetchResult<Vec<Pokemon>>> + Send;

    fn available_types(&self, gender: &str)
        -> impl Future<Output = FetchResult<Vec<String>>> + Send;

    fn pokemon_by_type(
        &self,
        type_name: &str,
    ) -> impl Future<Output = FetchResult<Vec<Pokemon>>> + Send;

    fn roles_for_gender(&self, gender: &str)
        -> impl Future<Output = FetchResult<RoleGroups>> + Send;

    fn available_abilities(
        &self,
        type_name: &str,
    ) -> impl Future<Output = FetchResult<Vec<String>>> + Send;

    fn filter_type_by_ability(
        &self,
        type_name: &str,
        ability: &str,
    ) -> impl Future<Output = FetchResult<Vec<Pokemon>>> + Send;

    fn time_based_pokemon(&self) -> impl Future<Output = FetchResult<TimePeriodDataset>> + Send;
}

/// Thin wrapper over `reqwest::Client` bound to one backend origin.
///
/// Every call is a fresh request without retries or a timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PokeviewError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pokeview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, operation: &Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: Operation) -> FetchResult<T> {
        let url = self.url_for(&operation);
        debug!("GET {}", url);

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => return Err(FetchError::new(operation, FetchErrorKind::Transport(e))),
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(operation, FetchErrorKind::Status(status)));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchError::new(operation, FetchErrorKind::Decode(e)))
    }
}

impl PokemonSource for ApiClient {
    async fn pokemon_by_gender(&self, gender: &str) -> FetchResult<Vec<Pokemon>> {
        self.get_json(Operation::PokemonByGender {
            gender: gender.to_string(),
        })
        .await
    }

    async fn filter_gender_by_type(
        &self,
        gender: &str,
        type_name: &str,
    ) -> FetchResult<Vec<Pokemon>> {
        self.get_json(Operation::FilterGenderByType {
            gender: gender.to_string(),
            type_name: type_name.to_string(),
        })
        .await
    }

    async fn available_types(&self, gender: &str) -> FetchResult<Vec<String>> {
        self.get_json(Operation::AvailableTypes {
            gender: gender.to_string(),
        })
        .await
    }

    async fn pokemon_by_type(&self, type_name: &str) -> FetchResult<Vec<Pokemon>> {
        self.get_json(Operation::PokemonByType {
            type_name: type_name.to_string(),
        })
        .await
    }

    async fn roles_for_gender(&self, gender: &str) -> FetchResult<RoleGroups> {
        self.get_json(Operation::RolesForGender {
            gender: gender.to_string(),
        })
        .await
    }

    async fn available_abilities(&self, type_name: &str) -> FetchResult<Vec<String>> {
        self.get_json(Operation::AvailableAbilities {
            type_name: type_name.to_string(),
        })
        .await
    }

    async fn filter_type_by_ability(
        &self,
        type_name: &str,
        ability: &str,
    ) -> FetchResult<Vec<Pokemon>> {
        self.get_json(Operation::FilterTypeByAbility {
            type_name: type_name.to_string(),
            ability: ability.to_string(),
        })
        .await
    }

    async fn time_based_pokemon(&self) -> FetchResult<TimePeriodDataset> {
        self.get_json(Operation::TimeBasedPokemon).await
    }
}

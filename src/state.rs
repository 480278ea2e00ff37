use std::collections::HashMap;
use std::env;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tera::Tera;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error::PokeviewError;
use crate::fetcher::{ApiClient, PokemonSource, DEFAULT_API_URL};
use crate::sentinel;
use crate::views::{GenderPage, Randomizer, SpinConfig, TypePage};

/// Mounted pages kept per kind and session before the session starts over.
const MAX_MOUNTED_PAGES: usize = 64;

/// Sessions kept before the store starts over.
const MAX_SESSIONS: usize = 1024;

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to.
    pub bind_address: String,
    /// Base URL of the Pokémon backend.
    pub api_url: String,
    /// Glob tera loads page templates from.
    pub templates_glob: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Randomizer pacing.
    pub spin: SpinConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".into(),
            api_url: DEFAULT_API_URL.into(),
            templates_glob: "templates/**/*.html".into(),
            static_dir: "static".into(),
            spin: SpinConfig::default(),
        }
    }
}

impl Config {
    /// Creates Config from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let spin = parse_spin(
            env::var("SPIN_STEPS").ok().as_deref(),
            env::var("SPIN_INTERVAL_MS").ok().as_deref(),
        );
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            api_url: env::var("POKEVIEW_API_URL").unwrap_or(defaults.api_url),
            templates_glob: env::var("TEMPLATES_GLOB").unwrap_or(defaults.templates_glob),
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
            spin,
        }
    }
}

/// Spin pacing from raw variable values. Missing, unparseable and zero
/// values fall back to the defaults.
fn parse_spin(steps: Option<&str>, interval_ms: Option<&str>) -> SpinConfig {
    let defaults = SpinConfig::default();
    SpinConfig {
        steps: steps
            .and_then(|v| v.parse().ok())
            .filter(|steps| *steps > 0)
            .unwrap_or(defaults.steps),
        base_interval: interval_ms
            .and_then(|v| v.parse().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.base_interval),
    }
}

/// Loads every template matching `glob`.
pub fn load_templates(glob: &str) -> Result<Tera, PokeviewError> {
    Ok(Tera::new(glob)?)
}

/// Shared application state passed to all request handlers.
#[derive(Debug)]
pub struct AppState {
    /// Template engine for rendering HTML pages.
    pub tera: Tera,
    /// Client for the Pokémon backend.
    pub api: ApiClient,
    pub spin: SpinConfig,
    /// View state of every browser session.
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl AppState {
    pub fn new(tera: Tera, api: ApiClient, spin: SpinConfig) -> Self {
        Self {
            tera,
            api,
            spin,
            sessions: RwLock::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, PokeviewError> {
        let tera = load_templates(&config.templates_glob)?;
        let api = ApiClient::new(config.api_url.clone())?;
        Ok(Self::new(tera, api, config.spin))
    }

    /// The session for `id`, created empty on first use.
    pub async fn session(&self, id: Uuid) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(&id) {
            return session.clone();
        }
        insert_bounded(&mut *sessions, id, Arc::default(), MAX_SESSIONS).clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Page components owned by one browser session, keyed by the path
/// parameter that identifies them.
///
/// Handlers hold the session's mutex for a whole mount or interaction, so
/// one browser's requests are applied one at a time and never see a page
/// mounted twice.
#[derive(Debug, Default)]
pub struct Session {
    genders: HashMap<String, GenderPage>,
    types: HashMap<String, TypePage>,
    randomizer: Option<Arc<Randomizer>>,
}

impl Session {
    /// Fetches a gender page from scratch and makes it the current one.
    pub async fn mount_gender<S: PokemonSource>(
        &mut self,
        source: &S,
        gender: &str,
    ) -> &mut GenderPage {
        let page = GenderPage::mount(source, gender).await;
        insert_bounded(&mut self.genders, gender.to_string(), page, MAX_MOUNTED_PAGES)
    }

    /// The current page for `gender`, mounting one if none exists.
    pub async fn gender_page<S: PokemonSource>(
        &mut self,
        source: &S,
        gender: &str,
    ) -> &mut GenderPage {
        let page = match self.genders.remove(gender) {
            Some(page) => page,
            None => GenderPage::mount(source, gender).await,
        };
        insert_bounded(&mut self.genders, gender.to_string(), page, MAX_MOUNTED_PAGES)
    }

    pub async fn mount_type<S: PokemonSource>(
        &mut self,
        source: &S,
        type_name: &str,
    ) -> &mut TypePage {
        let page = TypePage::mount(source, type_name).await;
        insert_bounded(&mut self.types, type_name.to_string(), page, MAX_MOUNTED_PAGES)
    }

    pub async fn type_page<S: PokemonSource>(
        &mut self,
        source: &S,
        type_name: &str,
    ) -> &mut TypePage {
        let page = match self.types.remove(type_name) {
            Some(page) => page,
            None => TypePage::mount(source, type_name).await,
        };
        insert_bounded(&mut self.types, type_name.to_string(), page, MAX_MOUNTED_PAGES)
    }

    /// Fetches a fresh time-based pool and replaces the current randomizer.
    ///
    /// A spin still running on the replaced randomizer finishes on its own.
    pub async fn mount_randomizer<S: PokemonSource>(
        &mut self,
        source: &S,
        spin: SpinConfig,
    ) -> Arc<Randomizer> {
        let dataset = sentinel::fetch_time_based_pokemon(source).await;
        let randomizer = Arc::new(Randomizer::from_fetch(dataset, spin));
        self.randomizer = Some(randomizer.clone());
        randomizer
    }

    pub async fn randomizer<S: PokemonSource>(
        &mut self,
        source: &S,
        spin: SpinConfig,
    ) -> Arc<Randomizer> {
        if let Some(randomizer) = &self.randomizer {
            return randomizer.clone();
        }
        self.mount_randomizer(source, spin).await
    }

    pub fn current_randomizer(&self) -> Option<&Arc<Randomizer>> {
        self.randomizer.as_ref()
    }

    pub fn mounted_counts(&self) -> (usize, usize) {
        (self.genders.len(), self.types.len())
    }
}

fn insert_bounded<K: Eq + Hash, V>(
    map: &mut HashMap<K, V>,
    key: K,
    value: V,
    limit: usize,
) -> &mut V {
    // Keys come from request paths and cookies; keep the map from growing
    // without bound.
    if map.len() >= limit && !map.contains_key(&key) {
        debug!("Store full, dropping {} entries", map.len());
        map.clear();
    }
    map.entry(key).insert_entry(value).into_mut()
}

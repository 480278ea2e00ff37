//! Gender page: a type filter plus a "battle roles" view.
//!
//! The two views are backed by independently fetched datasets. Switching
//! between them never discards the other view's data.

use tracing::info;

use super::filter::{FilterScope, FilterState};
use crate::fetcher::PokemonSource;
use crate::models::{Pokemon, RoleGroups, ViewMode};
use crate::sentinel;

#[derive(Debug, Clone)]
pub struct GenderPage {
    gender: String,
    available_types: Vec<String>,
    filter: FilterState,
    view_mode: ViewMode,
    roles_loading: bool,
    roles: Option<RoleGroups>,
}

impl GenderPage {
    /// Builds a page around data that has already been fetched.
    pub fn new(
        gender: impl Into<String>,
        initial: Option<Vec<Pokemon>>,
        available_types: Vec<String>,
    ) -> Self {
        let gender = gender.into();
        let scope = FilterScope::GenderByType {
            gender: gender.clone(),
        };
        Self {
            gender,
            available_types,
            filter: FilterState::seeded(scope, initial),
            view_mode: ViewMode::Types,
            roles_loading: false,
            roles: None,
        }
    }

    /// Fetches the gender's Pokémon and its type options, then builds the page.
    ///
    /// The unfiltered list becomes the baseline the type filter returns to.
    pub async fn mount<S: PokemonSource>(source: &S, gender: &str) -> Self {
        let (initial, available_types) = tokio::join!(
            sentinel::fetch_pokemon_by_gender(source, gender),
            sentinel::fetch_available_types(source, gender),
        );
        info!(
            gender,
            pokemon = initial.as_ref().map_or(0, Vec::len),
            types = available_types.len(),
            "Mounted gender page"
        );
        Self::new(gender, initial, available_types)
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn available_types(&self) -> &[String] {
        &self.available_types
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn roles_loading(&self) -> bool {
        self.roles_loading
    }

    pub fn roles(&self) -> Option<&RoleGroups> {
        self.roles.as_ref()
    }

    /// Whichever view is on screen is busy.
    pub fn is_loading(&self) -> bool {
        match self.view_mode {
            ViewMode::Types => self.filter.is_loading(),
            ViewMode::Roles => self.roles_loading,
        }
    }

    pub async fn select_type<S: PokemonSource>(&mut self, source: &S, type_name: &str) {
        self.filter.select_filter(source, type_name).await;
    }

    /// Switches the visible dataset.
    ///
    /// Role groupings are fetched on entering the roles view unless a
    /// previous fetch already succeeded. A failed fetch leaves them unloaded
    /// so the next entry tries again.
    pub async fn set_view_mode<S: PokemonSource>(&mut self, source: &S, mode: ViewMode) {
        self.view_mode = mode;
        if mode != ViewMode::Roles || self.roles.is_some() {
            return;
        }

        info!(gender = %self.gender, %mode, "Fetching role groupings");
        let mut page = scopeguard::guard(self, |page| page.roles_loading = false);
        page.roles_loading = true;
        let roles = sentinel::fetch_pokemon_roles(source, &page.gender).await;
        page.roles = roles;
    }
}

//! Filter-state component shared by the gender and type pages.
//!
//! Holds the selected filter, a loading flag and the result set on screen.
//! Selecting a filter always replaces the result set with one complete
//! response; results from two fetches are never merged.

use tracing::debug;

use crate::fetcher::PokemonSource;
use crate::models::Pokemon;
use crate::sentinel;

/// Which endpoints a filter talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterScope {
    /// Gender page: filter the gender's Pokémon by type.
    GenderByType { gender: String },
    /// Type page: filter the type's Pokémon by ability.
    TypeByAbility { type_name: String },
}

impl FilterScope {
    async fn fetch_unfiltered<S: PokemonSource>(&self, source: &S) -> Option<Vec<Pokemon>> {
        match self {
            Self::GenderByType { gender } => sentinel::fetch_pokemon_by_gender(source, gender).await,
            Self::TypeByAbility { type_name } => {
                sentinel::fetch_pokemon_by_type(source, type_name).await
            }
        }
    }

    async fn fetch_filtered<S: PokemonSource>(
        &self,
        source: &S,
        value: &str,
    ) -> Option<Vec<Pokemon>> {
        match self {
            Self::GenderByType { gender } => {
                sentinel::filter_pokemon_by_type(source, gender, value).await
            }
            Self::TypeByAbility { type_name } => {
                sentinel::filter_pokemon_by_ability(source, type_name, value).await
            }
        }
    }
}

/// What "show all" falls back to when the filter is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Baseline {
    /// Restore the set the page was mounted with.
    Seeded(Option<Vec<Pokemon>>),
    /// Fetch the unfiltered list again.
    Refetch,
}

#[derive(Debug, Clone)]
pub struct FilterState {
    scope: FilterScope,
    baseline: Baseline,
    selected_filter: String,
    is_loading: bool,
    results: Option<Vec<Pokemon>>,
}

impl FilterState {
    /// Creates a filter showing `initial` with no filter selected.
    pub fn new(scope: FilterScope, baseline: Baseline, initial: Option<Vec<Pokemon>>) -> Self {
        Self {
            scope,
            baseline,
            selected_filter: String::new(),
            is_loading: false,
            results: initial,
        }
    }

    /// Creates a filter whose baseline is exactly the set it starts with.
    pub fn seeded(scope: FilterScope, initial: Option<Vec<Pokemon>>) -> Self {
        Self::new(scope, Baseline::Seeded(initial.clone()), initial)
    }

    pub fn scope(&self) -> &FilterScope {
        &self.scope
    }

    pub fn selected_filter(&self) -> &str {
        &self.selected_filter
    }

    /// True only while `select_filter` is in flight. Pages are rendered
    /// after the operation completes, so templates never see it set.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn results(&self) -> Option<&[Pokemon]> {
        self.results.as_deref()
    }

    /// Applies `value` as the active filter; an empty value restores the
    /// baseline.
    ///
    /// `is_loading` is cleared on every exit path, including when the
    /// returned future is dropped before it completes.
    pub async fn select_filter<S: PokemonSource>(&mut self, source: &S, value: &str) {
        let mut state = scopeguard::guard(self, |state| state.is_loading = false);
        state.is_loading = true;
        state.selected_filter = value.to_string();

        let results = if value.is_empty() {
            match &state.baseline {
                Baseline::Seeded(set) => set.clone(),
                Baseline::Refetch => state.scope.fetch_unfiltered(source).await,
            }
        } else {
            state.scope.fetch_filtered(source, value).await
        };

        debug!(
            filter = value,
            count = results.as_ref().map_or(0, Vec::len),
            "Filter applied"
        );
        state.results = results;
    }
}

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
};
use axum_extra::extract::cookie::CookieJar;
use futures_util::stream::{self, Stream};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tera::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::models::{Pokemon, ViewMode};
use crate::session;
use crate::state::AppState;
use crate::views::{GenderPage, SpinStep, TypePage};

/// Query parameters for the gender page.
///
/// A request without any parameter mounts the page afresh; otherwise each
/// present parameter is an interaction with the mounted page. `type=` (empty)
/// clears the type filter.
#[derive(Debug, Deserialize)]
pub struct GenderQuery {
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub view: Option<ViewMode>,
}

impl GenderQuery {
    fn is_mount(&self) -> bool {
        self.type_.is_none() && self.view.is_none()
    }
}

/// Query parameters for the type page. `ability=` (empty) clears the filter.
#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    pub ability: Option<String>,
}

/// A Pokémon as the card templates show it.
#[derive(Debug, Serialize)]
struct Card {
    name: String,
    sprite: Option<String>,
    types: String,
    abilities: String,
    stats: Vec<(String, i64)>,
    /// Type whose page the card leads to.
    primary_type: Option<String>,
}

impl From<&Pokemon> for Card {
    fn from(pokemon: &Pokemon) -> Self {
        Self {
            name: pokemon.name.clone(),
            sprite: pokemon.sprite.clone(),
            types: pokemon.types.iter().join(", "),
            abilities: pokemon.abilities.iter().join(", "),
            stats: pokemon
                .stats
                .iter()
                .map(|(stat, value)| (stat.clone(), *value))
                .collect(),
            primary_type: pokemon.primary_type(),
        }
    }
}

/// One button of a filter bar.
#[derive(Debug, Serialize)]
struct FilterOption {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct RoleSection {
    name: String,
    description: String,
    cards: Vec<Card>,
}

fn render_template(
    tera: &tera::Tera,
    template: &str,
    context: &Context,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    tera.render(template, context).map(Html).map_err(|e| {
        error!("Template render error for '{}': {}", template, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Render error")
    })
}

/// Upper-cases the first character.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "solar-power" → "Solar Power".
fn ability_label(ability: &str) -> String {
    ability.split('-').map(capitalize).join(" ")
}

fn role_description(role: &str) -> String {
    format!(
        "{role} type Pokemon with specialized {} capabilities",
        role.to_lowercase()
    )
}

fn cards(results: Option<&[Pokemon]>) -> Vec<Card> {
    results.unwrap_or_default().iter().map(Card::from).collect()
}

/// "All" followed by one option per value.
fn filter_options(
    values: &[String],
    selected: &str,
    label: fn(&str) -> String,
) -> Vec<FilterOption> {
    std::iter::once(FilterOption {
        value: String::new(),
        label: "All".to_string(),
        selected: selected.is_empty(),
    })
    .chain(values.iter().map(|value| FilterOption {
        value: value.clone(),
        label: label(value),
        selected: value == selected,
    }))
    .collect()
}

fn gender_context(page: &GenderPage) -> Context {
    let filter = page.filter();
    let roles: Vec<RoleSection> = page
        .roles()
        .map(|groups| {
            groups
                .iter()
                .map(|(name, members)| RoleSection {
                    name: name.clone(),
                    description: role_description(name),
                    cards: members.iter().map(Card::from).collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("gender", page.gender());
    context.insert("title", &capitalize(page.gender()));
    context.insert("view_mode", &page.view_mode());
    context.insert(
        "type_options",
        &filter_options(page.available_types(), filter.selected_filter(), capitalize),
    );
    context.insert("cards", &cards(filter.results()));
    context.insert("roles", &roles);
    context
}

fn type_context(page: &TypePage) -> Context {
    let filter = page.filter();
    let mut context = Context::new();
    context.insert("type_name", page.type_name());
    context.insert("title", &capitalize(page.type_name()));
    context.insert(
        "ability_options",
        &filter_options(page.available_abilities(), filter.selected_filter(), ability_label),
    );
    context.insert("cards", &cards(filter.results()));
    context
}

/// GET / - Landing page.
pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, _) = session::resolve(jar);
    (jar, render_template(&state.tera, "home.html", &Context::new()))
}

/// GET /gender - Pick male or female.
pub async fn gender_choice(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, _) = session::resolve(jar);
    let mut context = Context::new();
    context.insert("genders", &["male", "female"]);
    (jar, render_template(&state.tera, "gender_choice.html", &context))
}

/// GET /gender/{gender} - Type filter and battle-role views for one gender.
pub async fn gender_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(gender): Path<String>,
    Query(query): Query<GenderQuery>,
) -> impl IntoResponse {
    let (jar, id) = session::resolve(jar);
    let session = state.session(id).await;
    let mut session = session.lock().await;

    let page = if query.is_mount() {
        session.mount_gender(&state.api, &gender).await
    } else {
        session.gender_page(&state.api, &gender).await
    };
    if let Some(mode) = query.view {
        page.set_view_mode(&state.api, mode).await;
    }
    if let Some(type_name) = query.type_.as_deref() {
        page.select_type(&state.api, type_name).await;
    }
    let context = gender_context(page);
    drop(session);

    (jar, render_template(&state.tera, "gender.html", &context))
}

/// GET /types/{type_name} - Pokémon of one type, filterable by ability.
pub async fn type_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(type_name): Path<String>,
    Query(query): Query<TypeQuery>,
) -> impl IntoResponse {
    let (jar, id) = session::resolve(jar);
    let session = state.session(id).await;
    let mut session = session.lock().await;

    let page = match query.ability.as_deref() {
        None => session.mount_type(&state.api, &type_name).await,
        Some(ability) => {
            let page = session.type_page(&state.api, &type_name).await;
            page.select_ability(&state.api, ability).await;
            page
        }
    };
    let context = type_context(page);
    drop(session);

    (jar, render_template(&state.tera, "type.html", &context))
}

/// GET /time-pokemon - Fresh time-of-day pool and the spin button.
pub async fn time_pokemon(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, id) = session::resolve(jar);
    let randomizer = state
        .session(id)
        .await
        .lock()
        .await
        .mount_randomizer(&state.api, state.spin)
        .await;
    let dataset = randomizer.dataset();

    let mut context = Context::new();
    context.insert("title", &format!("{} Pokemon", capitalize(&dataset.time_period)));
    context.insert("unavailable", &randomizer.is_unavailable());
    context.insert("is_spinning", &randomizer.is_spinning());
    context.insert("cards", &cards(Some(dataset.pokemon.as_slice())));
    (jar, render_template(&state.tera, "time_pokemon.html", &context))
}

fn step_event(step: &SpinStep) -> Event {
    Event::default()
        .event("step")
        .json_data(step)
        .unwrap_or_else(|e| {
            error!("Cannot encode spin step: {}", e);
            Event::default().event("step").data(step.pokemon.name.clone())
        })
}

/// GET /time-pokemon/spin - Streams one `step` event per pick, then `done`
/// with the outcome, or a single `rejected` event.
///
/// Only a spin already running in the same session is rejected.
pub async fn spin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Sse<impl Stream<Item = Result<Event, Infallible>>>) {
    let (jar, id) = session::resolve(jar);
    let randomizer = state
        .session(id)
        .await
        .lock()
        .await
        .randomizer(&state.api, state.spin)
        .await;
    let (tx, rx) = mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        let mut rng = StdRng::from_os_rng();
        let step_tx = tx.clone();
        let outcome = randomizer
            .spin(&mut rng, move |step| {
                // The browser may have gone away; the spin still finishes.
                let _ = step_tx.send(step_event(&step));
            })
            .await;

        let last = match outcome {
            Ok(pokemon) => {
                info!(name = %pokemon.name, "Randomizer picked");
                Event::default().event("done").data(pokemon.name)
            }
            Err(e) => {
                info!("Spin rejected: {}", e);
                Event::default().event("rejected").data(e.to_string())
            }
        };
        let _ = tx.send(last);
    });

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok(event), rx))
    });
    (jar, Sse::new(events).keep_alive(KeepAlive::default()))
}

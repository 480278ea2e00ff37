//! pokeview: a browser front end for a Pokémon filtering backend.
//!
//! The backend does all filtering and classification. This crate wraps its
//! endpoints ([`fetcher`], [`sentinel`]), keeps per-page view state for
//! each browser session ([`views`], [`session`]) and renders it as HTML
//! ([`handlers`], [`routes`]).

pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sentinel;
pub mod session;
pub mod state;
pub mod views;

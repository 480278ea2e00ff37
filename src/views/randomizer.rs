//! Time-of-day randomizer.
//!
//! A spin publishes a fixed number of uniformly random picks from the
//! dataset, pausing a little longer after each one so the display
//! decelerates. The last pick is the outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{Pokemon, TimePeriodDataset};

/// Step count and pacing of a spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinConfig {
    pub steps: u32,
    pub base_interval: Duration,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            base_interval: Duration::from_millis(100),
        }
    }
}

impl SpinConfig {
    /// Pause after `step` (1-based): `base * (1 + step / steps)`.
    ///
    /// Grows linearly, so successive pauses are strictly increasing for any
    /// non-zero base interval.
    pub fn delay_after(&self, step: u32) -> Duration {
        let steps = self.steps.max(1);
        self.base_interval + self.base_interval * step / steps
    }
}

/// One published pick.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SpinStep {
    /// 1-based step number.
    pub step: u32,
    pub total: u32,
    pub pokemon: Pokemon,
}

impl SpinStep {
    pub fn is_final(&self) -> bool {
        self.step == self.total
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    #[error("a spin is already in progress")]
    AlreadySpinning,
    #[error("there are no Pokémon to pick from")]
    EmptyDataset,
}

#[derive(Debug)]
pub struct Randomizer {
    dataset: TimePeriodDataset,
    config: SpinConfig,
    spinning: AtomicBool,
    selected: RwLock<Option<Pokemon>>,
}

impl Randomizer {
    pub fn new(dataset: TimePeriodDataset, config: SpinConfig) -> Self {
        Self {
            dataset,
            config,
            spinning: AtomicBool::new(false),
            selected: RwLock::new(None),
        }
    }

    /// Builds a randomizer from a fetch that may have failed; a failure
    /// leaves an empty "day" pool.
    pub fn from_fetch(dataset: Option<TimePeriodDataset>, config: SpinConfig) -> Self {
        Self::new(dataset.unwrap_or_default(), config)
    }

    pub fn dataset(&self) -> &TimePeriodDataset {
        &self.dataset
    }

    pub fn config(&self) -> SpinConfig {
        self.config
    }

    /// Nothing to spin over; the page shows an error instead of the button.
    pub fn is_unavailable(&self) -> bool {
        self.dataset.pokemon.is_empty()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.load(Ordering::Acquire)
    }

    pub async fn selected(&self) -> Option<Pokemon> {
        self.selected.read().await.clone()
    }

    /// Runs a full spin, handing every pick to `publish` as it is made.
    ///
    /// Rejected without publishing anything if the dataset is empty or
    /// another spin is running. The spinning flag is cleared when the spin
    /// ends or its future is dropped.
    pub async fn spin<R, F>(&self, rng: &mut R, mut publish: F) -> Result<Pokemon, SpinError>
    where
        R: Rng + Send,
        F: FnMut(SpinStep) + Send,
    {
        let pool = &self.dataset.pokemon;
        if pool.is_empty() {
            return Err(SpinError::EmptyDataset);
        }
        if self.spinning.swap(true, Ordering::AcqRel) {
            return Err(SpinError::AlreadySpinning);
        }
        let _release = scopeguard::guard(&self.spinning, |flag| {
            flag.store(false, Ordering::Release)
        });

        let total = self.config.steps.max(1);
        let mut step = 1;
        loop {
            let pick = pool[rng.random_range(0..pool.len())].clone();
            *self.selected.write().await = Some(pick.clone());
            debug!(step, total, name = %pick.name, "Spin step");
            publish(SpinStep {
                step,
                total,
                pokemon: pick.clone(),
            });

            if step == total {
                info!(
                    time_period = %self.dataset.time_period,
                    name = %pick.name,
                    "Spin finished"
                );
                return Ok(pick);
            }
            tokio::time::sleep(self.config.delay_after(step)).await;
            step += 1;
        }
    }
}

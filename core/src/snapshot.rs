//! Snapshot serialization: full simulation state to/from JSON.
//!
//! A snapshot captures everything needed to resume a game: the city
//! (resources, turn, robots, buildings with their residents and the
//! training queue) plus the master seed, so random events after a load
//! match an uninterrupted game.

use serde::{Deserialize, Serialize};

use crate::{city::City, types::Turn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitySnapshot {
    pub seed: u64,
    pub city: City,
}

impl CitySnapshot {
    pub fn name(&self) -> &str {
        &self.city.name
    }

    pub fn turn(&self) -> Turn {
        self.city.turn()
    }
}

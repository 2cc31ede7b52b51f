//! Robots and the shared robot contract.
//!
//! All three variants share one struct; per-variant behaviour is looked
//! up from `RobotKind::profile()` instead of being overridden.
//! Vital stats are clamped to [0, 100] by every mutator.

use serde::{Deserialize, Serialize};

use crate::types::{Position, RobotId, Turn};

pub const STAT_MIN: f64 = 0.0;
pub const STAT_MAX: f64 = 100.0;

/// Stats at or below this make work and upkeep cost happiness.
pub const STRAIN_THRESHOLD: f64 = 40.0;
pub const MAINTENANCE_TURNS: u32 = 2;

const INTEGRITY_WEAR: f64 = 5.0;
const UPKEEP_ENERGY: f64 = 10.0;
const STRAIN_HAPPINESS_LOSS: f64 = 10.0;
const REST_HAPPINESS: f64 = 20.0;
const REST_ENERGY: f64 = 40.0;
const MAINTENANCE_HAPPINESS: f64 = 20.0;
pub const BLACKOUT_LOSS: f64 = 40.0;
pub const STRIKE_LOSS: f64 = 30.0;
const RARE_PARTS_MORALE: f64 = 15.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RobotKind {
    Worker,
    Engineer,
    Guard,
}

/// Per-variant constants.
#[derive(Debug, Clone, Copy)]
pub struct RobotProfile {
    pub label:          &'static str,
    pub work_energy:    f64,
    pub training_turns: Turn,
}

impl RobotKind {
    pub const ALL: [RobotKind; 3] = [RobotKind::Worker, RobotKind::Engineer, RobotKind::Guard];

    pub const fn profile(self) -> RobotProfile {
        match self {
            Self::Worker => RobotProfile {
                label: "Worker",
                work_energy: 10.0,
                training_turns: 2,
            },
            Self::Engineer => RobotProfile {
                label: "Engineer",
                work_energy: 15.0,
                training_turns: 4,
            },
            Self::Guard => RobotProfile {
                label: "Guard",
                work_energy: 10.0,
                training_turns: 3,
            },
        }
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Robot {
    pub id:                  RobotId,
    pub kind:                RobotKind,
    energy:                  f64,
    happiness:               f64,
    integrity:               f64,
    /// Kept equal to the host building's origin while hosted; only
    /// allocation moves it. See `City::location_of`.
    position:                Position,
    in_maintenance:          bool,
    maintenance_turns_left:  u32,
    turns_since_maintenance: u32,
}

fn clamp_stat(value: f64) -> f64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

impl Robot {
    /// A freshly trained robot: all vitals full.
    pub fn new(id: RobotId, kind: RobotKind, position: Position) -> Self {
        Self {
            id,
            kind,
            energy: STAT_MAX,
            happiness: STAT_MAX,
            integrity: STAT_MAX,
            position,
            in_maintenance: false,
            maintenance_turns_left: 0,
            turns_since_maintenance: 0,
        }
    }

    pub fn energy(&self) -> f64 { self.energy }
    pub fn happiness(&self) -> f64 { self.happiness }
    pub fn integrity(&self) -> f64 { self.integrity }
    pub fn position(&self) -> Position { self.position }
    pub fn in_maintenance(&self) -> bool { self.in_maintenance }
    pub fn maintenance_turns_left(&self) -> u32 { self.maintenance_turns_left }
    pub fn turns_since_maintenance(&self) -> u32 { self.turns_since_maintenance }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Overwrite the vitals, clamped. Used by tests and scenario setup.
    pub fn set_vitals(&mut self, energy: f64, happiness: f64, integrity: f64) {
        self.energy = clamp_stat(energy);
        self.happiness = clamp_stat(happiness);
        self.integrity = clamp_stat(integrity);
    }

    pub fn adjust_energy(&mut self, delta: f64) {
        self.energy = clamp_stat(self.energy + delta);
    }

    pub fn adjust_happiness(&mut self, delta: f64) {
        self.happiness = clamp_stat(self.happiness + delta);
    }

    fn is_strained(&self) -> bool {
        self.energy <= STRAIN_THRESHOLD || self.integrity <= STRAIN_THRESHOLD
    }

    fn wear(&mut self, energy_cost: f64) {
        self.adjust_energy(-energy_cost);
        self.integrity = clamp_stat(self.integrity - INTEGRITY_WEAR);
        if self.is_strained() {
            self.adjust_happiness(-STRAIN_HAPPINESS_LOSS);
        }
    }

    /// One shift in a commercial building.
    pub fn work(&mut self) {
        self.wear(self.kind.profile().work_energy);
    }

    pub fn rest(&mut self) {
        self.adjust_happiness(REST_HAPPINESS);
        self.adjust_energy(REST_ENERGY);
    }

    /// Returns false if the robot is already being serviced.
    pub fn start_maintenance(&mut self) -> bool {
        if self.in_maintenance {
            return false;
        }
        self.in_maintenance = true;
        self.maintenance_turns_left = MAINTENANCE_TURNS;
        true
    }

    /// Advance an ongoing service by one turn. Returns true on the turn
    /// the service completes.
    pub fn tick_maintenance(&mut self) -> bool {
        if !self.in_maintenance || self.maintenance_turns_left == 0 {
            return false;
        }
        self.maintenance_turns_left -= 1;
        if self.maintenance_turns_left > 0 {
            return false;
        }
        self.integrity = STAT_MAX;
        self.adjust_happiness(MAINTENANCE_HAPPINESS);
        self.turns_since_maintenance = 0;
        self.in_maintenance = false;
        true
    }

    /// End-of-turn running cost. A robot under maintenance only advances
    /// its service. Returns true if a service completed this turn.
    pub fn daily_upkeep(&mut self) -> bool {
        if self.in_maintenance {
            return self.tick_maintenance();
        }
        self.wear(UPKEEP_ENERGY);
        self.turns_since_maintenance += 1;
        false
    }

    /// Blackout hit.
    pub fn shock(&mut self) {
        self.adjust_energy(-BLACKOUT_LOSS);
        self.adjust_happiness(-BLACKOUT_LOSS);
    }

    /// Strike: the robot stops caring, but spends no energy.
    pub fn strike(&mut self) {
        self.adjust_happiness(-STRIKE_LOSS);
    }

    /// Rare-parts discovery cheer.
    pub fn bonus_morale(&mut self) {
        self.adjust_happiness(RARE_PARTS_MORALE);
    }
}

//! The city ledger: resources, turn counter, and the robot and
//! building sets.
//!
//! INVARIANTS:
//!   - money and parts never go negative; a spend that cannot be
//!     covered changes nothing.
//!   - a robot is hosted by at most one building. Hosting is recorded
//!     only in the building's resident list; the robot's own position
//!     is kept in step on every move.

use serde::{Deserialize, Serialize};

use crate::{
    building::{Building, BuildingKind},
    config::SimConfig,
    construction,
    robot::{Robot, RobotKind},
    training::TrainingCenter,
    types::{BuildingId, Cost, Footprint, Position, RobotId, Turn},
};

/// Average happiness reported for a city without robots.
pub const EMPTY_CITY_HAPPINESS: f64 = 100.0;

/// Where a robot is, derived from building membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Hosted { building: BuildingId, at: Position },
    Free(Position),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub name:             String,
    money:                f64,
    parts:                u64,
    turn:                 Turn,
    robots:               Vec<Robot>,
    buildings:            Vec<Building>,
    average_happiness:    f64,
    next_robot_serial:    u64,
    next_building_serial: u64,
}

/// Landmarks present in every new city.
const LANDMARKS: [(BuildingKind, i32, i32); 6] = [
    (BuildingKind::Monument, 5, 5),
    (BuildingKind::Monument, 22, 8),
    (BuildingKind::CommunicationTower, 15, 3),
    (BuildingKind::PowerStation, 8, 20),
    (BuildingKind::ZenGarden, 20, 20),
    (BuildingKind::Observatory, 3, 15),
];

/// Smallest square map that holds every founding landmark.
pub fn founding_map_size() -> i32 {
    LANDMARKS
        .iter()
        .filter_map(|&(kind, x, y)| {
            let spec = construction::build_spec(kind)?;
            Some((x + spec.footprint.width).max(y + spec.footprint.height))
        })
        .max()
        .unwrap_or(0)
}

impl City {
    /// Found a city: training center at the map centre plus the fixed
    /// landmarks.
    pub fn new(name: impl Into<String>, config: &SimConfig) -> Self {
        let mut city = Self {
            name: name.into(),
            money: config.city.starting_money,
            parts: config.city.starting_parts,
            turn: 0,
            robots: Vec::new(),
            buildings: Vec::new(),
            average_happiness: EMPTY_CITY_HAPPINESS,
            next_robot_serial: 0,
            next_building_serial: 0,
        };

        let centre = config.city.map_size / 2;
        let center = TrainingCenter::new(Cost::new(
            config.training.money_cost,
            config.training.parts_cost,
        ));
        let id = city.next_building_id();
        city.buildings
            .push(Building::training_center(id, Position::new(centre, centre), center));

        for (kind, x, y) in LANDMARKS {
            if let Some(spec) = construction::build_spec(kind) {
                let _ = city.add_building(kind, Position::new(x, y), spec.footprint, Cost::default());
            }
        }
        city
    }

    // ── Resources ──────────────────────────────────────────────

    pub fn money(&self) -> f64 { self.money }
    pub fn parts(&self) -> u64 { self.parts }

    pub fn add_money(&mut self, amount: f64) {
        self.money += amount.max(0.0);
    }

    pub fn add_parts(&mut self, amount: u64) {
        self.parts = self.parts.saturating_add(amount);
    }

    pub fn spend_money(&mut self, amount: f64) -> bool {
        if self.money >= amount {
            self.money -= amount;
            true
        } else {
            false
        }
    }

    pub fn spend_parts(&mut self, amount: u64) -> bool {
        if self.parts >= amount {
            self.parts -= amount;
            true
        } else {
            false
        }
    }

    /// Money first, then parts; the money is refunded if parts fall short.
    pub fn spend(&mut self, cost: Cost) -> bool {
        if !self.spend_money(cost.money) {
            return false;
        }
        if !self.spend_parts(cost.parts) {
            self.money += cost.money;
            return false;
        }
        true
    }

    // ── Turn & morale ──────────────────────────────────────────

    pub fn turn(&self) -> Turn { self.turn }

    /// Bump the turn counter and return the new turn number.
    pub fn next_turn(&mut self) -> Turn {
        self.turn += 1;
        self.turn
    }

    pub fn average_happiness(&self) -> f64 { self.average_happiness }

    pub fn set_average_happiness(&mut self, value: f64) {
        self.average_happiness = value.clamp(0.0, 100.0);
    }

    /// Mean robot happiness, or 100 for an empty city.
    pub fn mean_happiness(&self) -> f64 {
        if self.robots.is_empty() {
            return EMPTY_CITY_HAPPINESS;
        }
        self.robots.iter().map(Robot::happiness).sum::<f64>() / self.robots.len() as f64
    }

    // ── Robots ─────────────────────────────────────────────────

    pub fn robots(&self) -> &[Robot] { &self.robots }
    pub fn robots_mut(&mut self) -> &mut [Robot] { &mut self.robots }

    pub fn robot(&self, id: &str) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == id)
    }

    pub fn robot_mut(&mut self, id: &str) -> Option<&mut Robot> {
        self.robots.iter_mut().find(|r| r.id == id)
    }

    pub fn count_kind(&self, kind: RobotKind) -> usize {
        self.robots.iter().filter(|r| r.kind == kind).count()
    }

    /// Create a robot with full vitals and return its id.
    pub fn add_robot(&mut self, kind: RobotKind, position: Position) -> RobotId {
        self.next_robot_serial += 1;
        let id = format!("r-{:05}", self.next_robot_serial);
        self.robots.push(Robot::new(id.clone(), kind, position));
        id
    }

    /// Drop a robot from the robot set. Building membership is the
    /// caller's concern; see `allocation::delete_robot`.
    pub(crate) fn remove_robot(&mut self, id: &str) -> Option<Robot> {
        let index = self.robots.iter().position(|r| r.id == id)?;
        Some(self.robots.remove(index))
    }

    // ── Buildings ──────────────────────────────────────────────

    pub fn buildings(&self) -> &[Building] { &self.buildings }
    pub fn buildings_mut(&mut self) -> &mut [Building] { &mut self.buildings }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn building_mut(&mut self, id: &str) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    fn next_building_id(&mut self) -> BuildingId {
        self.next_building_serial += 1;
        format!("b-{:05}", self.next_building_serial)
    }

    /// Append a hosting building. Placement rules live in `construction`.
    /// None for the training center, which is only placed at founding.
    pub(crate) fn add_building(
        &mut self,
        kind: BuildingKind,
        origin: Position,
        footprint: Footprint,
        cost: Cost,
    ) -> Option<BuildingId> {
        if kind == BuildingKind::TrainingCenter {
            return None;
        }
        let id = self.next_building_id();
        let building = Building::new(id.clone(), kind, origin, footprint, cost)?;
        self.buildings.push(building);
        Some(id)
    }

    pub fn training_center(&self) -> Option<&TrainingCenter> {
        self.buildings.iter().find_map(Building::center)
    }

    pub fn training_center_mut(&mut self) -> Option<&mut TrainingCenter> {
        self.buildings.iter_mut().find_map(Building::center_mut)
    }

    pub fn host_of(&self, robot_id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.hosts(robot_id))
    }

    pub fn location_of(&self, robot_id: &str) -> Option<Location> {
        let robot = self.robot(robot_id)?;
        Some(match self.host_of(robot_id) {
            Some(host) => Location::Hosted {
                building: host.id.clone(),
                at: host.origin,
            },
            None => Location::Free(robot.position()),
        })
    }
}

//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A simulation turn. Turn 0 is the freshly founded city.
pub type Turn = u64;

/// Stable identifier of a robot, e.g. `r-00012`.
pub type RobotId = String;

/// Stable identifier of a building, e.g. `b-00003`.
pub type BuildingId = String;

/// A tile coordinate on the city map. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width × height of a building, in tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Footprint {
    pub width:  i32,
    pub height: i32,
}

impl Footprint {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Money and parts charged for something.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Cost {
    pub money: f64,
    pub parts: u64,
}

impl Cost {
    pub const fn new(money: f64, parts: u64) -> Self {
        Self { money, parts }
    }
}

/// Axis-aligned rectangle overlap test between two placed footprints.
pub fn footprints_overlap(a: Position, a_size: Footprint, b: Position, b_size: Footprint) -> bool {
    a.x < b.x + b_size.width
        && a.x + a_size.width > b.x
        && a.y < b.y + b_size.height
        && a.y + a_size.height > b.y
}

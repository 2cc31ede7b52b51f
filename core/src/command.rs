use serde::{Deserialize, Serialize};

use crate::{building::BuildingKind, robot::RobotKind, types::{BuildingId, RobotId}};

/// All player-issued actions. Each runs between turns as one atomic call.
/// Variants may be appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Build {
        kind: BuildingKind,
        x:    i32,
        y:    i32,
    },
    Train {
        kind: RobotKind,
    },
    Move {
        robot_id:    RobotId,
        building_id: BuildingId,
    },
    Evict {
        robot_id: RobotId,
    },
    Delete {
        robot_id: RobotId,
    },
    Maintain {
        robot_id: RobotId,
    },
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Build { .. }    => "build",
            Self::Train { .. }    => "train",
            Self::Move { .. }     => "move",
            Self::Evict { .. }    => "evict",
            Self::Delete { .. }   => "delete",
            Self::Maintain { .. } => "maintain",
        }
    }
}

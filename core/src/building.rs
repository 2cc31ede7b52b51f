//! Buildings: one struct, a closed set of kinds, and a per-kind profile
//! table for capacity and admission rules.

use serde::{Deserialize, Serialize};

use crate::{
    robot::{Robot, RobotKind},
    training::TrainingCenter,
    types::{BuildingId, Cost, Footprint, Position, RobotId},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    TrainingCenter,
    Commercial,
    Residential,
    Monument,
    CommunicationTower,
    PowerStation,
    ZenGarden,
    Observatory,
}

/// What a building does each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingRole {
    Training,
    Production,
    Housing,
    /// No turn effect; only an allocation target for exploring robots.
    Landmark,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildingProfile {
    pub label:    &'static str,
    pub role:     BuildingRole,
    pub capacity: usize,
}

impl BuildingKind {
    pub const fn profile(self) -> BuildingProfile {
        match self {
            Self::TrainingCenter => BuildingProfile {
                label: "Training Center",
                role: BuildingRole::Training,
                capacity: 0,
            },
            Self::Commercial => BuildingProfile {
                label: "Commercial",
                role: BuildingRole::Production,
                capacity: 5,
            },
            Self::Residential => BuildingProfile {
                label: "Residential",
                role: BuildingRole::Housing,
                capacity: 5,
            },
            Self::Monument => BuildingProfile {
                label: "Monument",
                role: BuildingRole::Landmark,
                capacity: 5,
            },
            Self::ZenGarden => BuildingProfile {
                label: "Zen Garden",
                role: BuildingRole::Landmark,
                capacity: 5,
            },
            Self::CommunicationTower => BuildingProfile {
                label: "Communication Tower",
                role: BuildingRole::Landmark,
                capacity: 3,
            },
            Self::PowerStation => BuildingProfile {
                label: "Power Station",
                role: BuildingRole::Landmark,
                capacity: 3,
            },
            Self::Observatory => BuildingProfile {
                label: "Observatory",
                role: BuildingRole::Landmark,
                capacity: 3,
            },
        }
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn is_decorative(self) -> bool {
        self.profile().role == BuildingRole::Landmark
    }

    /// Commercial sites take only Workers and Engineers.
    pub fn accepts(self, robot: RobotKind) -> bool {
        match self.profile().role {
            BuildingRole::Training => false,
            BuildingRole::Production => matches!(robot, RobotKind::Worker | RobotKind::Engineer),
            BuildingRole::Housing | BuildingRole::Landmark => true,
        }
    }
}

/// Kind-specific contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tenancy", rename_all = "snake_case")]
pub enum Tenancy {
    Training { center: TrainingCenter },
    /// Insertion order is display order only.
    Residents { robots: Vec<RobotId> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Building {
    pub id:        BuildingId,
    pub kind:      BuildingKind,
    pub origin:    Position,
    pub footprint: Footprint,
    pub cost:      Cost,
    tenancy:       Tenancy,
}

impl Building {
    /// A hosting building. None for `TrainingCenter`, which has its
    /// own constructor.
    pub fn new(
        id: BuildingId,
        kind: BuildingKind,
        origin: Position,
        footprint: Footprint,
        cost: Cost,
    ) -> Option<Self> {
        if kind == BuildingKind::TrainingCenter {
            return None;
        }
        Some(Self {
            id,
            kind,
            origin,
            footprint,
            cost,
            tenancy: Tenancy::Residents { robots: Vec::new() },
        })
    }

    pub fn training_center(id: BuildingId, origin: Position, center: TrainingCenter) -> Self {
        Self {
            id,
            kind: BuildingKind::TrainingCenter,
            origin,
            footprint: Footprint::new(3, 3),
            cost: Cost::default(),
            tenancy: Tenancy::Training { center },
        }
    }

    pub fn capacity(&self) -> usize {
        self.kind.profile().capacity
    }

    pub fn residents(&self) -> &[RobotId] {
        match &self.tenancy {
            Tenancy::Residents { robots } => robots,
            Tenancy::Training { .. } => &[],
        }
    }

    pub fn hosts(&self, robot_id: &str) -> bool {
        self.residents().iter().any(|id| id == robot_id)
    }

    pub fn is_full(&self) -> bool {
        self.residents().len() >= self.capacity()
    }

    /// Add a robot if the kind is accepted, there is room, and it is not
    /// already here.
    pub fn admit(&mut self, robot: &Robot) -> bool {
        if !self.kind.accepts(robot.kind) || self.is_full() || self.hosts(&robot.id) {
            return false;
        }
        match &mut self.tenancy {
            Tenancy::Residents { robots } => {
                robots.push(robot.id.clone());
                true
            }
            Tenancy::Training { .. } => false,
        }
    }

    /// Remove a robot; false if it was not hosted here.
    pub fn evict(&mut self, robot_id: &str) -> bool {
        match &mut self.tenancy {
            Tenancy::Residents { robots } => {
                let before = robots.len();
                robots.retain(|id| id != robot_id);
                robots.len() != before
            }
            Tenancy::Training { .. } => false,
        }
    }

    pub fn center(&self) -> Option<&TrainingCenter> {
        match &self.tenancy {
            Tenancy::Training { center } => Some(center),
            Tenancy::Residents { .. } => None,
        }
    }

    pub fn center_mut(&mut self) -> Option<&mut TrainingCenter> {
        match &mut self.tenancy {
            Tenancy::Training { center } => Some(center),
            Tenancy::Residents { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot(id: &str, kind: RobotKind) -> Robot {
        Robot::new(id.into(), kind, Position::default())
    }

    fn site(kind: BuildingKind) -> Building {
        Building::new("b-1".into(), kind, Position::new(1, 1), Footprint::new(2, 2), Cost::default())
            .expect("hosting kind")
    }

    #[test]
    fn training_center_needs_its_own_constructor() {
        let center = Building::new(
            "b-1".into(),
            BuildingKind::TrainingCenter,
            Position::new(15, 15),
            Footprint::new(3, 3),
            Cost::default(),
        );
        assert!(center.is_none());
    }

    #[test]
    fn commercial_turns_guards_away() {
        let mut shop = site(BuildingKind::Commercial);
        assert!(!shop.admit(&robot("g", RobotKind::Guard)));
        assert!(shop.admit(&robot("w", RobotKind::Worker)));
        assert!(shop.admit(&robot("e", RobotKind::Engineer)));
    }

    #[test]
    fn capacity_is_enforced_per_kind() {
        let mut tower = site(BuildingKind::CommunicationTower);
        for i in 0..3 {
            assert!(tower.admit(&robot(&format!("r{i}"), RobotKind::Guard)));
        }
        assert!(!tower.admit(&robot("r9", RobotKind::Guard)));

        let mut garden = site(BuildingKind::ZenGarden);
        for i in 0..5 {
            assert!(garden.admit(&robot(&format!("r{i}"), RobotKind::Worker)));
        }
        assert!(garden.is_full());
    }

    #[test]
    fn same_robot_is_not_admitted_twice() {
        let mut home = site(BuildingKind::Residential);
        let w = robot("w", RobotKind::Worker);
        assert!(home.admit(&w));
        assert!(!home.admit(&w));
        assert!(home.evict("w"));
        assert!(!home.evict("w"));
    }
}

//! Per-turn building effects.
//!
//!   TrainingCenter : counts tickets down, turns finished ones into robots
//!   Commercial     : productive residents earn money/parts and work a shift
//!   Residential    : every resident rests
//!   landmarks      : nothing

use crate::{
    building::BuildingRole,
    city::City,
    config::EconomyConfig,
    error::SimResult,
    event::{CityEvent, TurnLog},
    rng::TurnRng,
    robot::RobotKind,
    subsystem::SimSubsystem,
};

pub struct BuildingSubsystem {
    economy: EconomyConfig,
}

impl BuildingSubsystem {
    pub fn new(economy: EconomyConfig) -> Self {
        Self { economy }
    }
}

impl SimSubsystem for BuildingSubsystem {
    fn name(&self) -> &'static str { "buildings" }

    fn update(&mut self, city: &mut City, log: &mut TurnLog, _rng: &mut TurnRng) -> SimResult<()> {
        // Index loop: training may append robots, never buildings.
        for index in 0..city.buildings().len() {
            apply_turn_effect(city, index, &self.economy, log);
        }
        Ok(())
    }
}

/// Apply the effect of the building at `index` in `city.buildings()`.
pub fn apply_turn_effect(city: &mut City, index: usize, economy: &EconomyConfig, log: &mut TurnLog) {
    let Some(building) = city.buildings().get(index) else {
        return;
    };
    match building.kind.profile().role {
        BuildingRole::Training => run_training(city, index, log),
        BuildingRole::Production => run_commercial(city, index, economy, log),
        BuildingRole::Housing => run_residential(city, index),
        BuildingRole::Landmark => {}
    }
}

fn run_training(city: &mut City, index: usize, log: &mut TurnLog) {
    let building = &mut city.buildings_mut()[index];
    let origin = building.origin;
    let Some(center) = building.center_mut() else {
        return;
    };
    let ready = center.advance();
    for kind in ready {
        let robot_id = city.add_robot(kind, origin);
        log::info!("trained {} {robot_id}", kind.label());
        log.record(CityEvent::RobotTrained { robot_id, kind });
    }
}

fn run_commercial(city: &mut City, index: usize, economy: &EconomyConfig, log: &mut TurnLog) {
    let building = &city.buildings()[index];
    if building.residents().is_empty() {
        return;
    }
    let building_id = building.id.clone();
    let residents = building.residents().to_vec();

    let mut workers = 0u32;
    let mut engineers = 0u32;
    let mut money = 0.0;
    let mut parts = 0u64;
    for robot_id in &residents {
        let Some(robot) = city.robot_mut(robot_id) else {
            continue;
        };
        let productive = robot.integrity() > economy.production_threshold
            && robot.energy() > economy.production_threshold
            && !robot.in_maintenance();
        if !productive {
            continue;
        }
        match robot.kind {
            RobotKind::Engineer => {
                engineers += 1;
                parts += economy.engineer_parts_rate;
            }
            RobotKind::Worker => {
                workers += 1;
                money += economy.worker_money_rate;
            }
            RobotKind::Guard => {}
        }
        robot.work();
    }

    let boost = if engineers > 0 && workers > 0 {
        economy.worker_money_rate * f64::from(workers) * economy.engineer_boost
    } else {
        0.0
    };
    city.add_money(money + boost);
    city.add_parts(parts);

    if workers + engineers > 0 {
        log.record(CityEvent::CommercialOutput {
            building_id,
            money: money + boost,
            parts,
            boost,
        });
    }
}

fn run_residential(city: &mut City, index: usize) {
    let residents = city.buildings()[index].residents().to_vec();
    for robot_id in &residents {
        if let Some(robot) = city.robot_mut(robot_id) {
            robot.rest();
        }
    }
}

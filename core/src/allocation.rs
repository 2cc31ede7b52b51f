//! Robot allocation: moving robots between buildings, lookups, and the
//! guard morale bonus.
//!
//! A robot's host is whichever building lists it as a resident. Moving
//! a robot also moves its position to the host's origin.

use crate::{
    building::Building,
    city::City,
    config::MoraleConfig,
    robot::{Robot, RobotKind},
};

/// Move `robot_id` into `building_id`. The robot always leaves its
/// current host first; if the target refuses it (full, wrong kind, or
/// the training center) it stays unhoused and this returns false.
pub fn move_to_building(city: &mut City, robot_id: &str, building_id: &str) -> bool {
    let Some(robot) = city.robot(robot_id).cloned() else {
        return false;
    };
    if city.building(building_id).is_none() {
        return false;
    }

    remove_from_building(city, robot_id);

    let Some(target) = city.building_mut(building_id) else {
        return false;
    };
    if !target.admit(&robot) {
        log::warn!(
            "{} {robot_id} refused by {} {building_id} ({}/{} residents)",
            robot.kind.label(),
            target.kind.label(),
            target.residents().len(),
            target.capacity(),
        );
        return false;
    }
    let origin = target.origin;
    if let Some(robot) = city.robot_mut(robot_id) {
        robot.set_position(origin);
    }
    true
}

/// Evict a robot from its host. False if it was not hosted anywhere.
/// The robot keeps standing at the host's origin.
pub fn remove_from_building(city: &mut City, robot_id: &str) -> bool {
    city.buildings_mut().iter_mut().any(|b| b.evict(robot_id))
}

pub fn find_host_building<'a>(city: &'a City, robot_id: &str) -> Option<&'a Building> {
    city.host_of(robot_id)
}

pub fn list_by_kind(city: &City, kind: RobotKind) -> Vec<&Robot> {
    city.robots().iter().filter(|r| r.kind == kind).collect()
}

/// Robots not hosted by any building, in city order.
pub fn list_unhoused(city: &City) -> Vec<&Robot> {
    city.robots()
        .iter()
        .filter(|r| city.host_of(&r.id).is_none())
        .collect()
}

/// Guards keep the peace: `bonus_per_guard` for each of the first
/// `max_counted_guards` guards.
pub fn guard_morale_bonus(city: &City, config: &MoraleConfig) -> f64 {
    let guards = city.count_kind(RobotKind::Guard).min(config.max_counted_guards);
    guards as f64 * config.bonus_per_guard
}

/// Add the guard bonus to the cached average; never beyond 100.
pub fn apply_guard_morale_bonus(city: &mut City, config: &MoraleConfig) {
    let bonus = guard_morale_bonus(city, config);
    city.set_average_happiness((city.average_happiness() + bonus).min(100.0));
}

/// Remove a robot from its host and from the city. False if unknown.
pub fn delete_robot(city: &mut City, robot_id: &str) -> bool {
    remove_from_building(city, robot_id);
    city.remove_robot(robot_id).is_some()
}

/// Send a robot for a two-turn service. False if unknown or already in
/// maintenance.
pub fn start_maintenance(city: &mut City, robot_id: &str) -> bool {
    city.robot_mut(robot_id)
        .map(Robot::start_maintenance)
        .unwrap_or(false)
}

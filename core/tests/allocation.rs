//! Robot allocation between buildings and the guard morale bonus.

use robot_city_core::{
    allocation,
    building::BuildingKind,
    city::{City, Location},
    config::{MoraleConfig, SimConfig},
    construction,
    robot::RobotKind,
    types::Position,
};

struct Fixture {
    city:        City,
    shop:        String,
    home:        String,
    tower:       String,
}

fn fixture() -> Fixture {
    let mut city = City::new("Allocations", &SimConfig::default());
    let shop = construction::try_build(&mut city, BuildingKind::Commercial, Position::new(0, 0), 30)
        .expect("shop");
    let home = construction::try_build(&mut city, BuildingKind::Residential, Position::new(0, 3), 30)
        .expect("home");
    let tower = city
        .buildings()
        .iter()
        .find(|b| b.kind == BuildingKind::CommunicationTower)
        .map(|b| b.id.clone())
        .expect("tower");
    Fixture { city, shop, home, tower }
}

#[test]
fn move_hosts_the_robot_and_syncs_its_position() {
    let mut f = fixture();
    let worker = f.city.add_robot(RobotKind::Worker, Position::new(15, 15));

    assert!(allocation::move_to_building(&mut f.city, &worker, &f.home));

    assert_eq!(allocation::find_host_building(&f.city, &worker).unwrap().id, f.home);
    assert_eq!(f.city.robot(&worker).unwrap().position(), Position::new(0, 3));
    assert_eq!(
        f.city.location_of(&worker),
        Some(Location::Hosted { building: f.home.clone(), at: Position::new(0, 3) })
    );
}

#[test]
fn moving_leaves_the_previous_host() {
    let mut f = fixture();
    let worker = f.city.add_robot(RobotKind::Worker, Position::default());
    assert!(allocation::move_to_building(&mut f.city, &worker, &f.home));
    assert!(allocation::move_to_building(&mut f.city, &worker, &f.shop));

    assert!(!f.city.building(&f.home).unwrap().hosts(&worker));
    assert!(f.city.building(&f.shop).unwrap().hosts(&worker));
    let hosts = f.city.buildings().iter().filter(|b| b.hosts(&worker)).count();
    assert_eq!(hosts, 1);
}

#[test]
fn rejected_move_leaves_robot_unhoused() {
    let mut f = fixture();
    let guard = f.city.add_robot(RobotKind::Guard, Position::default());
    assert!(allocation::move_to_building(&mut f.city, &guard, &f.home));

    assert!(!allocation::move_to_building(&mut f.city, &guard, &f.shop), "guards cannot work");
    assert!(allocation::find_host_building(&f.city, &guard).is_none());
    assert_eq!(allocation::list_unhoused(&f.city).len(), 1);
    assert_eq!(
        f.city.location_of(&guard),
        Some(Location::Free(Position::new(0, 3))),
        "robot stays where its last host stood"
    );
}

#[test]
fn full_building_refuses_more_robots() {
    let mut f = fixture();
    for _ in 0..3 {
        let id = f.city.add_robot(RobotKind::Guard, Position::default());
        assert!(allocation::move_to_building(&mut f.city, &id, &f.tower));
    }
    let extra = f.city.add_robot(RobotKind::Guard, Position::default());
    assert!(!allocation::move_to_building(&mut f.city, &extra, &f.tower));
    assert_eq!(f.city.building(&f.tower).unwrap().residents().len(), 3);
}

#[test]
fn training_center_hosts_nobody() {
    let mut f = fixture();
    let center = f.city.buildings()[0].id.clone();
    let worker = f.city.add_robot(RobotKind::Worker, Position::default());
    assert!(!allocation::move_to_building(&mut f.city, &worker, &center));
}

#[test]
fn unknown_ids_are_refused() {
    let mut f = fixture();
    let worker = f.city.add_robot(RobotKind::Worker, Position::default());
    assert!(allocation::move_to_building(&mut f.city, &worker, &f.home));

    assert!(!allocation::move_to_building(&mut f.city, &worker, "b-missing"));
    assert!(f.city.building(&f.home).unwrap().hosts(&worker), "no eviction for a bad target");
    assert!(!allocation::move_to_building(&mut f.city, "r-missing", &f.home));
    assert!(!allocation::delete_robot(&mut f.city, "r-missing"));
    assert!(!allocation::start_maintenance(&mut f.city, "r-missing"));
}

#[test]
fn queries_list_by_kind_and_unhoused() {
    let mut f = fixture();
    let w1 = f.city.add_robot(RobotKind::Worker, Position::default());
    let _w2 = f.city.add_robot(RobotKind::Worker, Position::default());
    let e = f.city.add_robot(RobotKind::Engineer, Position::default());
    assert!(allocation::move_to_building(&mut f.city, &w1, &f.shop));
    assert!(allocation::move_to_building(&mut f.city, &e, &f.shop));

    assert_eq!(allocation::list_by_kind(&f.city, RobotKind::Worker).len(), 2);
    assert_eq!(allocation::list_by_kind(&f.city, RobotKind::Guard).len(), 0);
    let unhoused: Vec<_> = allocation::list_unhoused(&f.city).iter().map(|r| r.id.clone()).collect();
    assert_eq!(unhoused, vec!["r-00002".to_string()]);

    assert!(allocation::remove_from_building(&mut f.city, &w1));
    assert!(!allocation::remove_from_building(&mut f.city, &w1));
    assert_eq!(allocation::list_unhoused(&f.city).len(), 2);
}

#[test]
fn delete_evicts_then_forgets_the_robot() {
    let mut f = fixture();
    let worker = f.city.add_robot(RobotKind::Worker, Position::default());
    assert!(allocation::move_to_building(&mut f.city, &worker, &f.shop));

    assert!(allocation::delete_robot(&mut f.city, &worker));
    assert!(f.city.robot(&worker).is_none());
    assert!(f.city.building(&f.shop).unwrap().residents().is_empty());
}

#[test]
fn guard_bonus_counts_at_most_five_guards() {
    let mut f = fixture();
    let morale = MoraleConfig::default();
    assert_eq!(allocation::guard_morale_bonus(&f.city, &morale), 0.0);

    for _ in 0..2 {
        f.city.add_robot(RobotKind::Guard, Position::default());
    }
    assert_eq!(allocation::guard_morale_bonus(&f.city, &morale), 6.0);

    for _ in 0..5 {
        f.city.add_robot(RobotKind::Guard, Position::default());
    }
    assert_eq!(allocation::guard_morale_bonus(&f.city, &morale), 15.0);
}

#[test]
fn guard_bonus_never_pushes_average_past_100() {
    let mut f = fixture();
    for _ in 0..5 {
        f.city.add_robot(RobotKind::Guard, Position::default());
    }
    f.city.set_average_happiness(95.0);
    allocation::apply_guard_morale_bonus(&mut f.city, &MoraleConfig::default());
    assert_eq!(f.city.average_happiness(), 100.0);

    f.city.set_average_happiness(40.0);
    allocation::apply_guard_morale_bonus(&mut f.city, &MoraleConfig::default());
    assert_eq!(f.city.average_happiness(), 55.0);
}

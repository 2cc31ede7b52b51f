//! Construction: cost table, bounds, overlap, and atomic payment.

use robot_city_core::{
    building::BuildingKind,
    city::City,
    config::SimConfig,
    construction::{self, BuildRejection},
    types::Position,
};

const MAP: i32 = 30;

fn city() -> City {
    City::new("Builders", &SimConfig::default())
}

fn state(city: &City) -> (f64, u64, usize) {
    (city.money(), city.parts(), city.buildings().len())
}

#[test]
fn commercial_and_residential_charge_table_prices() {
    let mut city = city();
    assert!(construction::build(&mut city, BuildingKind::Commercial, 0, 0, MAP));
    assert_eq!(city.money(), 14_500.0);
    assert_eq!(city.parts(), 9_700);

    assert!(construction::build(&mut city, BuildingKind::Residential, 10, 0, MAP));
    assert_eq!(city.money(), 14_200.0);
    assert_eq!(city.parts(), 9_550);

    let home = city.buildings().last().unwrap();
    assert_eq!(home.kind, BuildingKind::Residential);
    assert_eq!(home.origin, Position::new(10, 0));
    assert_eq!(home.capacity(), 5);
}

#[test]
fn insufficient_money_leaves_city_untouched() {
    let mut city = city();
    assert!(city.spend_money(city.money() - 100.0));
    let before = state(&city);

    assert!(!construction::build(&mut city, BuildingKind::Commercial, 0, 0, MAP));
    assert_eq!(state(&city), before);
}

#[test]
fn insufficient_parts_refunds_the_money() {
    let mut city = city();
    assert!(city.spend_parts(city.parts() - 10));
    let before = state(&city);

    let result = construction::try_build(&mut city, BuildingKind::Residential, Position::new(0, 0), MAP);
    assert_eq!(result, Err(BuildRejection::InsufficientParts));
    assert_eq!(state(&city), before);
}

#[test]
fn overlapping_footprint_always_fails() {
    let mut city = city();
    assert!(construction::build(&mut city, BuildingKind::Commercial, 0, 0, MAP));
    let before = state(&city);

    assert_eq!(
        construction::try_build(&mut city, BuildingKind::Residential, Position::new(1, 1), MAP),
        Err(BuildRejection::Overlap)
    );
    assert_eq!(state(&city), before, "rejected before any payment");

    // Adjacent is fine.
    assert!(construction::build(&mut city, BuildingKind::Residential, 2, 0, MAP));
}

#[test]
fn landmarks_block_construction() {
    let mut city = city();
    // Monument occupies (5,5)..(8,8).
    assert_eq!(
        construction::try_build(&mut city, BuildingKind::Commercial, Position::new(7, 7), MAP),
        Err(BuildRejection::Overlap)
    );
}

#[test]
fn training_center_does_not_block_construction() {
    let mut city = city();
    assert!(construction::build(&mut city, BuildingKind::Commercial, 15, 15, MAP));
    assert!(construction::build(&mut city, BuildingKind::Residential, 17, 17, MAP));
}

#[test]
fn footprint_must_fit_the_map() {
    let mut city = city();
    for (x, y) in [(29, 0), (0, 29), (-1, 0), (0, -1), (40, 40)] {
        assert_eq!(
            construction::try_build(&mut city, BuildingKind::Commercial, Position::new(x, y), MAP),
            Err(BuildRejection::OutOfBounds),
            "({x}, {y})"
        );
    }
    assert!(construction::build(&mut city, BuildingKind::Commercial, 28, 28, MAP));
}

#[test]
fn player_cannot_build_center_or_landmarks() {
    let mut city = city();
    let before = state(&city);
    for kind in [
        BuildingKind::TrainingCenter,
        BuildingKind::Monument,
        BuildingKind::CommunicationTower,
        BuildingKind::PowerStation,
        BuildingKind::ZenGarden,
        BuildingKind::Observatory,
    ] {
        assert_eq!(
            construction::try_build(&mut city, kind, Position::new(0, 0), MAP),
            Err(BuildRejection::NotBuildable),
            "{kind:?}"
        );
    }
    assert_eq!(state(&city), before);
}

#[test]
fn cost_table_matches_landmark_footprints() {
    let city = city();
    for building in city.buildings().iter().filter(|b| b.kind.is_decorative()) {
        let spec = construction::build_spec(building.kind).unwrap();
        assert_eq!(building.footprint, spec.footprint, "{:?}", building.kind);
    }
    assert!(construction::build_spec(BuildingKind::TrainingCenter).is_none());
}

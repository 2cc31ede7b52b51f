//! Player construction against a fixed cost table.
//!
//! Checks, in order: kind is player-buildable, footprint inside the
//! map, no overlap with an existing building (the training center is
//! exempt), and money then parts affordable. A failed build leaves the
//! city untouched.

use crate::{
    building::BuildingKind,
    city::City,
    types::{footprints_overlap, BuildingId, Cost, Footprint, Position},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildSpec {
    pub cost:      Cost,
    pub footprint: Footprint,
}

/// Cost and footprint per kind. None for the training center, which is
/// never placed.
pub fn build_spec(kind: BuildingKind) -> Option<BuildSpec> {
    let (money, parts, width, height) = match kind {
        BuildingKind::TrainingCenter => return None,
        BuildingKind::Commercial => (500.0, 300, 2, 2),
        BuildingKind::Residential => (300.0, 150, 2, 2),
        BuildingKind::Monument => (200.0, 100, 3, 3),
        BuildingKind::CommunicationTower => (150.0, 80, 2, 3),
        BuildingKind::PowerStation => (250.0, 150, 3, 3),
        BuildingKind::ZenGarden => (100.0, 50, 3, 3),
        BuildingKind::Observatory => (180.0, 120, 2, 2),
    };
    Some(BuildSpec {
        cost: Cost::new(money, parts),
        footprint: Footprint::new(width, height),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildRejection {
    NotBuildable,
    OutOfBounds,
    Overlap,
    InsufficientMoney,
    InsufficientParts,
}

/// Whether a footprint placed at `origin` collides with any building
/// other than the training center.
pub fn overlaps_existing(city: &City, origin: Position, footprint: Footprint) -> bool {
    city.buildings()
        .iter()
        .filter(|b| b.kind != BuildingKind::TrainingCenter)
        .any(|b| footprints_overlap(b.origin, b.footprint, origin, footprint))
}

pub fn try_build(
    city: &mut City,
    kind: BuildingKind,
    origin: Position,
    map_size: i32,
) -> Result<BuildingId, BuildRejection> {
    if kind.is_decorative() {
        return Err(BuildRejection::NotBuildable);
    }
    let spec = build_spec(kind).ok_or(BuildRejection::NotBuildable)?;

    let fits = origin.x >= 0
        && origin.y >= 0
        && origin.x + spec.footprint.width <= map_size
        && origin.y + spec.footprint.height <= map_size;
    if !fits {
        return Err(BuildRejection::OutOfBounds);
    }
    if overlaps_existing(city, origin, spec.footprint) {
        return Err(BuildRejection::Overlap);
    }

    if !city.spend_money(spec.cost.money) {
        return Err(BuildRejection::InsufficientMoney);
    }
    if !city.spend_parts(spec.cost.parts) {
        city.add_money(spec.cost.money);
        return Err(BuildRejection::InsufficientParts);
    }

    city.add_building(kind, origin, spec.footprint, spec.cost)
        .ok_or(BuildRejection::NotBuildable)
}

/// Boolean form of `try_build`; rejections are logged, never raised.
pub fn build(city: &mut City, kind: BuildingKind, x: i32, y: i32, map_size: i32) -> bool {
    match try_build(city, kind, Position::new(x, y), map_size) {
        Ok(id) => {
            log::info!("built {} {id} at ({x}, {y})", kind.label());
            true
        }
        Err(reason) => {
            log::warn!("cannot build {} at ({x}, {y}): {reason:?}", kind.label());
            false
        }
    }
}

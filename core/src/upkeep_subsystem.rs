use crate::{
    building::BuildingKind,
    city::City,
    error::SimResult,
    event::{CityEvent, TurnLog},
    rng::TurnRng,
    subsystem::SimSubsystem,
};

/// Daily running cost for every robot except those housed in a
/// Residential building, who already rested this turn.
pub struct UpkeepSubsystem;

impl SimSubsystem for UpkeepSubsystem {
    fn name(&self) -> &'static str { "upkeep" }

    fn update(&mut self, city: &mut City, log: &mut TurnLog, _rng: &mut TurnRng) -> SimResult<()> {
        let resting: Vec<String> = city
            .buildings()
            .iter()
            .filter(|b| b.kind == BuildingKind::Residential)
            .flat_map(|b| b.residents().iter().cloned())
            .collect();

        for robot in city.robots_mut() {
            if resting.contains(&robot.id) {
                continue;
            }
            if robot.daily_upkeep() {
                log.record(CityEvent::MaintenanceCompleted { robot_id: robot.id.clone() });
            }
        }
        Ok(())
    }
}

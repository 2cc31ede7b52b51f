use crate::{
    allocation,
    city::City,
    config::MoraleConfig,
    error::SimResult,
    event::TurnLog,
    rng::TurnRng,
    subsystem::SimSubsystem,
};

/// Recompute the city's average happiness, then add the guard bonus.
pub struct MoraleSubsystem {
    config: MoraleConfig,
}

impl MoraleSubsystem {
    pub fn new(config: MoraleConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for MoraleSubsystem {
    fn name(&self) -> &'static str { "morale" }

    fn update(&mut self, city: &mut City, log: &mut TurnLog, _rng: &mut TurnRng) -> SimResult<()> {
        city.set_average_happiness(city.mean_happiness());
        allocation::apply_guard_morale_bonus(city, &self.config);
        log::debug!(
            "turn={} morale: average happiness {:.1}",
            log.turn,
            city.average_happiness()
        );
        Ok(())
    }
}

//! Random city events.
//!
//! Each turn there is a `trigger_percent` chance of one event:
//!   - blackout:    every robot shocked (energy and happiness -40)
//!   - strike:      every robot loses 30 happiness
//!   - rare parts:  the city finds parts and money, robots cheer up
//!
//! While at least one robot is unhappy AND the average is below the
//! unhappiness line, a strike is forced with `strike_bias_percent`
//! probability; otherwise the three outcomes are equally likely.
//! Guards soften the two negative events: each guard restores 5% of the
//! loss, capped at 25%.

use serde::{Deserialize, Serialize};

use crate::{
    city::City,
    config::EventConfig,
    error::SimResult,
    event::{CityEvent, TurnLog},
    rng::TurnRng,
    robot::{RobotKind, BLACKOUT_LOSS, STRIKE_LOSS},
    subsystem::SimSubsystem,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Blackout,
    Strike,
    RareParts,
}

impl EventKind {
    const UNIFORM: [EventKind; 3] = [EventKind::Blackout, EventKind::Strike, EventKind::RareParts];
}

pub struct EventSubsystem {
    config: EventConfig,
}

impl EventSubsystem {
    pub fn new(config: EventConfig) -> Self {
        Self { config }
    }

    /// Fraction of a negative event's loss that guards give back.
    pub fn mitigation(&self, guards: usize) -> f64 {
        (guards as f64 * self.config.mitigation_per_guard).min(self.config.mitigation_cap)
    }

    /// Robots strictly below the unhappiness line.
    fn unhappy_count(&self, city: &City) -> usize {
        city.robots()
            .iter()
            .filter(|r| r.happiness() < self.config.unhappy_below)
            .count()
    }

    fn in_unrest(&self, city: &City) -> bool {
        self.unhappy_count(city) > 0 && city.mean_happiness() < self.config.unhappy_below
    }

    /// Decide whether an event happens this turn and which one.
    pub fn pick(&self, city: &City, rng: &mut TurnRng) -> Option<EventKind> {
        if rng.roll_percent() >= self.config.trigger_percent {
            return None;
        }
        if self.in_unrest(city) && rng.roll_percent() < self.config.strike_bias_percent {
            return Some(EventKind::Strike);
        }
        Some(EventKind::UNIFORM[rng.next_u64_below(3) as usize])
    }

    /// Roll for and apply at most one event.
    pub fn roll(&self, city: &mut City, log: &mut TurnLog, rng: &mut TurnRng) -> Option<EventKind> {
        let kind = self.pick(city, rng)?;
        self.apply(kind, city, log, rng);
        Some(kind)
    }

    pub fn apply(&self, kind: EventKind, city: &mut City, log: &mut TurnLog, rng: &mut TurnRng) {
        match kind {
            EventKind::Blackout => self.blackout(city, log),
            EventKind::Strike => self.strike(city, log),
            EventKind::RareParts => self.rare_parts(city, log, rng),
        }
    }

    pub fn blackout(&self, city: &mut City, log: &mut TurnLog) {
        let guards = city.count_kind(RobotKind::Guard);
        let mitigation = self.mitigation(guards);
        let restored = BLACKOUT_LOSS * mitigation;
        for robot in city.robots_mut() {
            robot.shock();
            if guards > 0 {
                robot.adjust_energy(restored);
                robot.adjust_happiness(restored);
            }
        }
        log::info!("blackout hit {} robot(s), mitigation {mitigation:.2}", city.robots().len());
        log.record(CityEvent::Blackout {
            affected: city.robots().len(),
            mitigation,
        });
    }

    pub fn strike(&self, city: &mut City, log: &mut TurnLog) {
        if city.robots().is_empty() {
            log.record(CityEvent::StrikeFizzled);
            return;
        }
        let guards = city.count_kind(RobotKind::Guard);
        let mitigation = self.mitigation(guards);
        // Measured before the strike lands.
        let unhappy = self.unhappy_count(city);
        let average_happiness = city.mean_happiness();
        let unrest = self.in_unrest(city);

        let restored = STRIKE_LOSS * mitigation;
        for robot in city.robots_mut() {
            robot.strike();
            if guards > 0 {
                robot.adjust_happiness(restored);
            }
        }
        log::info!("strike: {unhappy} unhappy robot(s), mitigation {mitigation:.2}");
        log.record(CityEvent::Strike {
            affected: city.robots().len(),
            unhappy,
            average_happiness,
            unrest,
            mitigation,
        });
    }

    pub fn rare_parts(&self, city: &mut City, log: &mut TurnLog, rng: &mut TurnRng) {
        let parts = rng.range_inclusive(self.config.rare_parts_min, self.config.rare_parts_max);
        let money = rng.range_f64(self.config.rare_money_min, self.config.rare_money_max);
        city.add_parts(parts);
        city.add_money(money);
        for robot in city.robots_mut() {
            robot.bonus_morale();
        }
        log::info!("rare parts discovered: +{parts} parts, +{money:.2} money");
        log.record(CityEvent::RarePartsDiscovered { parts, money });
    }
}

impl SimSubsystem for EventSubsystem {
    fn name(&self) -> &'static str { "events" }

    fn update(&mut self, city: &mut City, log: &mut TurnLog, rng: &mut TurnRng) -> SimResult<()> {
        if let Some(kind) = self.roll(city, log, rng) {
            log::debug!("turn={} event {kind:?}", log.turn);
        }
        Ok(())
    }
}

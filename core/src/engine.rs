//! The turn engine: advances the city one turn at a time.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Turn counter +1, fresh TurnLog
//!   1. Building subsystem   (training, commercial output, residential rest)
//!   2. Upkeep subsystem     (everyone not housed in a Residential building)
//!   3. Event subsystem      (at most one random event)
//!   4. Morale subsystem     (average happiness, then guard bonus)
//!   5. TurnLog kept as "last turn" and recorded in the store
//!      (best effort: a failed write is logged, the turn stands)
//!
//! RULES:
//!   - Subsystems execute in registration order, every turn.
//!   - All randomness flows through the RngBank.
//!   - Player commands run between turns, never during one.

use crate::{
    allocation,
    building::BuildingKind,
    building_subsystem::BuildingSubsystem,
    city::City,
    command::PlayerCommand,
    config::SimConfig,
    construction,
    error::{SimError, SimResult},
    event::TurnLog,
    event_subsystem::EventSubsystem,
    morale_subsystem::MoraleSubsystem,
    rng::{RngBank, RngSlot},
    robot::RobotKind,
    snapshot::CitySnapshot,
    store::{CityRepository, SimStore},
    subsystem::SimSubsystem,
    upkeep_subsystem::UpkeepSubsystem,
};

pub struct CityEngine {
    pub city:   City,
    config:     SimConfig,
    rng_bank:   RngBank,
    subsystems: Vec<Box<dyn SimSubsystem>>,
    last_turn:  Option<TurnLog>,
    store:      Box<dyn CityRepository>,
}

impl CityEngine {
    /// Wire an engine around an existing city with every subsystem
    /// registered in the documented order. Fails if `config` does not
    /// validate.
    pub fn build(
        city: City,
        seed: u64,
        config: SimConfig,
        store: Box<dyn CityRepository>,
    ) -> SimResult<Self> {
        config.validate()?;
        let mut engine = Self {
            city,
            rng_bank: RngBank::new(seed),
            subsystems: Vec::new(),
            last_turn: None,
            store,
            config,
        };

        // EXECUTION ORDER: fixed, never reordered.
        engine.register(Box::new(BuildingSubsystem::new(engine.config.economy.clone())));
        engine.register(Box::new(UpkeepSubsystem));
        engine.register(Box::new(EventSubsystem::new(engine.config.events.clone())));
        engine.register(Box::new(MoraleSubsystem::new(engine.config.morale.clone())));
        Ok(engine)
    }

    /// Found a new city and wire an engine around it.
    pub fn new_game(
        name: &str,
        seed: u64,
        config: SimConfig,
        store: Box<dyn CityRepository>,
    ) -> SimResult<Self> {
        config.validate()?;
        let city = City::new(name, &config);
        log::info!("founded city '{name}' with seed {seed}");
        Self::build(city, seed, config, store)
    }

    /// Resume a saved city, with the seed it was saved with.
    pub fn resume(name: &str, config: SimConfig, store: Box<dyn CityRepository>) -> SimResult<Self> {
        let snapshot = store.load_city(name)?;
        log::info!("loaded city '{name}' at turn {}", snapshot.turn());
        Self::build(snapshot.city, snapshot.seed, config, store)
    }

    /// Engine on a migrated in-memory store with default tunables.
    pub fn build_test(name: &str, seed: u64) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        Self::new_game(name, seed, SimConfig::default(), Box::new(store))
    }

    fn register(&mut self, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push(subsystem);
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// What happened during the most recent turn, if any has run.
    pub fn last_turn_log(&self) -> Option<&TurnLog> {
        self.last_turn.as_ref()
    }

    /// Advance one turn. This is the core simulation step.
    ///
    /// Once the subsystems have run the turn is committed: a failure to
    /// write its history is logged, not returned, so a retry never plays
    /// the turn twice.
    pub fn advance_turn(&mut self) -> SimResult<()> {
        let turn = self.city.next_turn();
        let mut log = TurnLog::new(turn);
        let mut rng = self.rng_bank.for_turn(RngSlot::Events, turn);

        for subsystem in &mut self.subsystems {
            subsystem.update(&mut self.city, &mut log, &mut rng)?;
            log::trace!("turn={turn} {} done", subsystem.name());
        }

        if let Err(e) = self.store.record_turn(&self.city.name, &log) {
            log::warn!("turn {turn}: history not recorded: {e}");
        }
        log::info!(
            "turn {turn} complete: money={:.2} parts={} robots={} happiness={:.1} events={}",
            self.city.money(),
            self.city.parts(),
            self.city.robots().len(),
            self.city.average_happiness(),
            log.events().len(),
        );
        self.last_turn = Some(log);
        Ok(())
    }

    /// Run n turns in a loop.
    pub fn run_turns(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.advance_turn()?;
        }
        Ok(())
    }

    // ── Player actions ─────────────────────────────────────────

    pub fn build_building(&mut self, kind: BuildingKind, x: i32, y: i32) -> bool {
        construction::build(&mut self.city, kind, x, y, self.config.city.map_size)
    }

    pub fn start_training(&mut self, kind: RobotKind) -> bool {
        crate::training::start_training(&mut self.city, kind)
    }

    pub fn move_to_building(&mut self, robot_id: &str, building_id: &str) -> bool {
        allocation::move_to_building(&mut self.city, robot_id, building_id)
    }

    pub fn remove_from_building(&mut self, robot_id: &str) -> bool {
        allocation::remove_from_building(&mut self.city, robot_id)
    }

    pub fn delete_robot(&mut self, robot_id: &str) -> bool {
        allocation::delete_robot(&mut self.city, robot_id)
    }

    pub fn start_maintenance(&mut self, robot_id: &str) -> bool {
        allocation::start_maintenance(&mut self.city, robot_id)
    }

    /// Run a player command. Unknown robot or building ids are errors;
    /// every other refusal is a plain `false`.
    pub fn apply(&mut self, command: &PlayerCommand) -> SimResult<bool> {
        log::debug!("player command: {}", command.name());
        let applied = match command {
            PlayerCommand::Build { kind, x, y } => self.build_building(*kind, *x, *y),
            PlayerCommand::Train { kind } => self.start_training(*kind),
            PlayerCommand::Move { robot_id, building_id } => {
                self.require_robot(robot_id)?;
                if self.city.building(building_id).is_none() {
                    return Err(SimError::BuildingNotFound { id: building_id.clone() });
                }
                self.move_to_building(robot_id, building_id)
            }
            PlayerCommand::Evict { robot_id } => {
                self.require_robot(robot_id)?;
                self.remove_from_building(robot_id)
            }
            PlayerCommand::Delete { robot_id } => {
                self.require_robot(robot_id)?;
                self.delete_robot(robot_id)
            }
            PlayerCommand::Maintain { robot_id } => {
                self.require_robot(robot_id)?;
                self.start_maintenance(robot_id)
            }
        };
        Ok(applied)
    }

    fn require_robot(&self, robot_id: &str) -> SimResult<()> {
        match self.city.robot(robot_id) {
            Some(_) => Ok(()),
            None => Err(SimError::RobotNotFound { id: robot_id.to_string() }),
        }
    }

    // ── Persistence ────────────────────────────────────────────

    pub fn snapshot(&self) -> CitySnapshot {
        CitySnapshot {
            seed: self.seed(),
            city: self.city.clone(),
        }
    }

    /// Save the city under its own name. Returns the save revision id.
    pub fn save(&self) -> SimResult<String> {
        let save_id = self.store.save_city(&self.snapshot())?;
        log::info!("saved '{}' at turn {} ({save_id})", self.city.name, self.city.turn());
        Ok(save_id)
    }

    /// Replace the current city with a saved one. On failure, including
    /// `CityNotFound`, the current game is left as it was.
    pub fn load(&mut self, name: &str) -> SimResult<()> {
        let snapshot = self.store.load_city(name)?;
        log::info!("loaded '{name}' at turn {}", snapshot.turn());
        self.rng_bank = RngBank::new(snapshot.seed);
        self.city = snapshot.city;
        self.last_turn = None;
        Ok(())
    }
}

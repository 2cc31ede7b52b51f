//! Subsystem trait.
//!
//! RULE: Every turn phase implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, once per turn.
//! Execution order is fixed and documented in engine.rs.

use crate::{city::City, error::SimResult, event::TurnLog, rng::TurnRng};

/// The contract every turn phase must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per turn by the engine.
    ///
    /// - `city`: the city being advanced; the subsystem may mutate it
    /// - `log`:  this turn's log, for anything the player should see
    /// - `rng`:  the turn's deterministic stream
    fn update(&mut self, city: &mut City, log: &mut TurnLog, rng: &mut TurnRng) -> SimResult<()>;
}

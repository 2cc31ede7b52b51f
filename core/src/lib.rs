//! Turn-based simulation of a small city run by robots.
//!
//! Robots are trained at the training center, housed and employed in
//! buildings, and buffeted by random events. `engine::CityEngine`
//! advances the city one turn at a time; everything between turns is a
//! player command.

pub mod allocation;
pub mod building;
pub mod building_subsystem;
pub mod city;
pub mod command;
pub mod config;
pub mod construction;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_subsystem;
pub mod morale_subsystem;
pub mod rng;
pub mod robot;
pub mod snapshot;
pub mod store;
pub mod subsystem;
pub mod training;
pub mod types;
pub mod upkeep_subsystem;

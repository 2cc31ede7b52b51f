//! Turn events and the per-turn log.
//!
//! Every line a player sees for a turn is rendered from a structured
//! CityEvent, so the log can be persisted and replayed as data.

use serde::{Deserialize, Serialize};

use crate::{
    robot::RobotKind,
    types::{BuildingId, RobotId, Turn},
};

/// Every event recorded during a turn.
/// Variants may be appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CityEvent {
    // ── Building effects ───────────────────────────
    RobotTrained {
        robot_id: RobotId,
        kind:     RobotKind,
    },
    CommercialOutput {
        building_id: BuildingId,
        money:       f64,
        parts:       u64,
        boost:       f64,
    },

    // ── Upkeep ─────────────────────────────────────
    MaintenanceCompleted {
        robot_id: RobotId,
    },

    // ── Random events ──────────────────────────────
    Blackout {
        affected:   usize,
        mitigation: f64,
    },
    Strike {
        affected:          usize,
        unhappy:           usize,
        average_happiness: f64,
        /// True when the city's unhappiness explains the strike.
        unrest:            bool,
        mitigation:        f64,
    },
    StrikeFizzled,
    RarePartsDiscovered {
        parts: u64,
        money: f64,
    },
}

impl CityEvent {
    /// Stable name, used for the event_type column in turn_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RobotTrained { .. }        => "robot_trained",
            Self::CommercialOutput { .. }    => "commercial_output",
            Self::MaintenanceCompleted { .. } => "maintenance_completed",
            Self::Blackout { .. }            => "blackout",
            Self::Strike { .. }              => "strike",
            Self::StrikeFizzled              => "strike_fizzled",
            Self::RarePartsDiscovered { .. } => "rare_parts_discovered",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::RobotTrained { robot_id, kind } => {
                format!("Training complete: new {} {robot_id} joined the city.", kind.label())
            }
            Self::CommercialOutput { building_id, money, parts, boost } => {
                let mut line = format!("{building_id} produced {money:.2} money and {parts} parts");
                if *boost > 0.0 {
                    line.push_str(&format!(" (engineer boost +{boost:.2})"));
                }
                line.push('.');
                line
            }
            Self::MaintenanceCompleted { robot_id } => {
                format!("{robot_id} finished maintenance and is fully repaired.")
            }
            Self::Blackout { affected, mitigation } => {
                let mut line = format!(
                    "BLACKOUT! {affected} robot(s) lost 40 energy and 40 happiness."
                );
                push_mitigation(&mut line, *mitigation);
                line
            }
            Self::Strike { affected, unhappy, average_happiness, unrest, mitigation } => {
                let mut line = if *unrest {
                    format!(
                        "STRIKE! {unhappy} unhappy robot(s) (average happiness {average_happiness:.1}%) \
                         walked out; {affected} robot(s) lost 30 happiness."
                    )
                } else {
                    format!("STRIKE! The robots are dissatisfied; {affected} robot(s) lost 30 happiness.")
                };
                push_mitigation(&mut line, *mitigation);
                line
            }
            Self::StrikeFizzled => "Strike talk fizzled out: there are no robots to strike.".into(),
            Self::RarePartsDiscovered { parts, money } => format!(
                "RARE PARTS DISCOVERED! +{parts} parts and +{money:.2} money. \
                 Every robot is happier (+15 happiness)."
            ),
        }
    }
}

fn push_mitigation(line: &mut String, mitigation: f64) {
    if mitigation > 0.0 {
        line.push_str(&format!(" (guards reduced the impact by {:.0}%)", mitigation * 100.0));
    }
}

/// What happened during one turn. Written while the turn runs, read-only
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TurnLog {
    pub turn: Turn,
    events:   Vec<CityEvent>,
}

impl TurnLog {
    pub fn new(turn: Turn) -> Self {
        Self { turn, events: Vec::new() }
    }

    pub fn record(&mut self, event: CityEvent) {
        log::debug!("turn={} {}", self.turn, event.type_name());
        self.events.push(event);
    }

    pub fn events(&self) -> &[CityEvent] {
        &self.events
    }

    /// Human-readable lines, in the order things happened.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(CityEvent::describe).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mitigation_is_reported_as_percent() {
        let line = CityEvent::Blackout { affected: 4, mitigation: 0.15 }.describe();
        assert!(line.contains("reduced the impact by 15%"), "{line}");

        let plain = CityEvent::Blackout { affected: 4, mitigation: 0.0 }.describe();
        assert!(!plain.contains("guards"), "{plain}");
    }

    #[test]
    fn events_round_trip_with_type_tag() {
        let event = CityEvent::RarePartsDiscovered { parts: 321, money: 456.5 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"rare_parts_discovered""#));
        let back: CityEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

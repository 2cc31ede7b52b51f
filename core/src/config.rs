use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    pub starting_money: f64,
    pub starting_parts: u64,
    /// Side length of the square map, in tiles.
    pub map_size: i32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            starting_money: 15_000.0,
            starting_parts: 10_000,
            map_size: 30,
        }
    }
}

/// Commercial production rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money earned per productive Worker per turn.
    pub worker_money_rate: f64,
    /// Parts discovered per productive Engineer per turn.
    pub engineer_parts_rate: u64,
    /// Share of worker output added when an Engineer also worked this turn.
    pub engineer_boost: f64,
    /// A resident produces only with integrity AND energy strictly above this.
    pub production_threshold: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            worker_money_rate: 50.0,
            engineer_parts_rate: 25,
            engineer_boost: 0.20,
            production_threshold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub money_cost: f64,
    pub parts_cost: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            money_cost: 200.0,
            parts_cost: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Percent chance (0–100) that any event fires in a turn.
    pub trigger_percent: u32,
    /// Percent chance of a forced strike while the city is unhappy.
    pub strike_bias_percent: u32,
    /// Robots strictly below this happiness count as unhappy.
    pub unhappy_below: f64,
    pub mitigation_per_guard: f64,
    pub mitigation_cap: f64,
    pub rare_parts_min: u64,
    pub rare_parts_max: u64,
    pub rare_money_min: f64,
    pub rare_money_max: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            trigger_percent: 40,
            strike_bias_percent: 60,
            unhappy_below: 50.0,
            mitigation_per_guard: 0.05,
            mitigation_cap: 0.25,
            rare_parts_min: 200,
            rare_parts_max: 500,
            rare_money_min: 300.0,
            rare_money_max: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoraleConfig {
    pub bonus_per_guard: f64,
    pub max_counted_guards: usize,
}

impl Default for MoraleConfig {
    fn default() -> Self {
        Self {
            bonus_per_guard: 3.0,
            max_counted_guards: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub city:     CityConfig,
    pub economy:  EconomyConfig,
    pub training: TrainingConfig,
    pub events:   EventConfig,
    pub morale:   MoraleConfig,
}

impl SimConfig {
    /// Load tunables from a JSON file. Missing sections and fields keep
    /// their defaults. In tests, use SimConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tunables the simulation cannot run with. The engine calls
    /// this before it accepts a config.
    pub fn validate(&self) -> anyhow::Result<()> {
        let min_map = crate::city::founding_map_size();
        anyhow::ensure!(
            self.city.map_size >= min_map,
            "map_size must be at least {min_map} to hold the founding landmarks"
        );
        ensure_non_negative("city.starting_money", self.city.starting_money)?;
        ensure_non_negative("economy.worker_money_rate", self.economy.worker_money_rate)?;
        ensure_non_negative("economy.engineer_boost", self.economy.engineer_boost)?;
        ensure_non_negative("economy.production_threshold", self.economy.production_threshold)?;
        ensure_non_negative("training.money_cost", self.training.money_cost)?;
        ensure_non_negative("events.mitigation_per_guard", self.events.mitigation_per_guard)?;
        ensure_non_negative("events.rare_money_min", self.events.rare_money_min)?;
        ensure_non_negative("events.unhappy_below", self.events.unhappy_below)?;
        ensure_non_negative("morale.bonus_per_guard", self.morale.bonus_per_guard)?;
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.events.mitigation_cap),
            "events.mitigation_cap must be within 0..=1"
        );
        anyhow::ensure!(
            self.events.trigger_percent <= 100 && self.events.strike_bias_percent <= 100,
            "event percentages must be within 0..=100"
        );
        anyhow::ensure!(
            self.events.rare_parts_min <= self.events.rare_parts_max
                && self.events.rare_money_min <= self.events.rare_money_max,
            "rare-parts ranges must not be empty"
        );
        Ok(())
    }
}

/// Also rejects NaN.
fn ensure_non_negative(field: &str, value: f64) -> anyhow::Result<()> {
    anyhow::ensure!(value >= 0.0, "{field} must not be negative (got {value})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "economy": { "worker_money_rate": 75.0 } }"#).unwrap();
        assert_eq!(config.economy.worker_money_rate, 75.0);
        assert_eq!(config.economy.engineer_parts_rate, 25);
        assert_eq!(config.events.trigger_percent, 40);
        assert_eq!(config.city.map_size, 30);
    }

    #[test]
    fn empty_rare_range_is_rejected() {
        let mut config = SimConfig::default();
        config.events.rare_parts_min = 600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_prices_and_rates_are_rejected() {
        let mut config = SimConfig::default();
        config.training.money_cost = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.economy.worker_money_rate = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.events.mitigation_cap = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn map_must_fit_the_landmarks() {
        let mut config = SimConfig::default();
        config.city.map_size = 24;
        assert!(config.validate().is_err());
        config.city.map_size = 25;
        assert!(config.validate().is_ok());
    }
}

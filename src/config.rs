// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::board::GameRules;
use crate::error::ConfigError;
use crate::evaluation::HeuristicWeights;
use crate::strategy::StrategyKind;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub heuristic: HeuristicWeights,
    pub game_rules: GameRulesConfig,
    pub appearance: AppearanceConfig,
    pub debug: DebugConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub min_time_remaining_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Strategy selection and search depth limits
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub strategy: StrategyKind,
    pub initial_depth: u32,
    pub max_depth: u32,
    pub iterative_deepening: bool,
    pub parallel_root: bool,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
}

impl GameRulesConfig {
    pub fn rules(&self) -> GameRules {
        GameRules {
            max_health: self.health_on_food,
            health_loss_per_turn: self.health_loss_per_turn,
        }
    }
}

/// Metadata returned from GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                min_time_remaining_ms: 20,
            },
            search: SearchConfig {
                strategy: StrategyKind::Expectimax,
                initial_depth: 1,
                max_depth: 8,
                iterative_deepening: true,
                parallel_root: true,
            },
            heuristic: HeuristicWeights::default(),
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
            },
            appearance: AppearanceConfig {
                apiversion: "1".to_string(),
                author: "UltimateBot".to_string(),
                color: "#FFFFFF".to_string(),
                head: "all-seeing".to_string(),
                tail: "ghost".to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 350);
    }

    #[test]
    fn test_effective_budget_saturates() {
        let timing = TimingConfig {
            response_time_budget_ms: 30,
            network_overhead_ms: 50,
            min_time_remaining_ms: 5,
        };
        assert_eq!(timing.effective_budget_ms(), 0);
    }

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.search.initial_depth, 1);
        assert_eq!(config.search.strategy, StrategyKind::Expectimax);
        assert_eq!(config.heuristic.space_weight, 1.0);
        assert_eq!(config.heuristic.vitality_weight, 0.1);
        assert_eq!(config.heuristic.resource_weight, 5.0);
    }

    #[test]
    fn test_rules_from_config() {
        let rules = Config::default_hardcoded().game_rules.rules();
        assert_eq!(rules, GameRules::default());
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml")
            .expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        // Timing
        assert_eq!(
            file_config.timing.response_time_budget_ms,
            hardcoded_config.timing.response_time_budget_ms
        );
        assert_eq!(
            file_config.timing.network_overhead_ms,
            hardcoded_config.timing.network_overhead_ms
        );
        assert_eq!(
            file_config.timing.min_time_remaining_ms,
            hardcoded_config.timing.min_time_remaining_ms
        );

        // Search
        assert_eq!(file_config.search.strategy, hardcoded_config.search.strategy);
        assert_eq!(
            file_config.search.initial_depth,
            hardcoded_config.search.initial_depth
        );
        assert_eq!(file_config.search.max_depth, hardcoded_config.search.max_depth);
        assert_eq!(
            file_config.search.iterative_deepening,
            hardcoded_config.search.iterative_deepening
        );
        assert_eq!(
            file_config.search.parallel_root,
            hardcoded_config.search.parallel_root
        );

        // Heuristic
        assert_eq!(file_config.heuristic, hardcoded_config.heuristic);

        // Game Rules
        assert_eq!(
            file_config.game_rules.health_on_food,
            hardcoded_config.game_rules.health_on_food
        );
        assert_eq!(
            file_config.game_rules.health_loss_per_turn,
            hardcoded_config.game_rules.health_loss_per_turn
        );

        // Appearance and debug
        assert_eq!(file_config.appearance.author, hardcoded_config.appearance.author);
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert!(!file_config.debug.log_file_path.is_empty());
    }

    #[test]
    fn test_strategy_names_parse() {
        let text = std::fs::read_to_string("Snake.toml").expect("Snake.toml should exist");
        let swapped = text.replace("strategy = \"expectimax\"", "strategy = \"food_seeker\"");
        let config = Config::from_toml_str(&swapped).expect("food_seeker should parse");
        assert_eq!(config.search.strategy, StrategyKind::FoodSeeker);

        let swapped = text.replace("strategy = \"expectimax\"", "strategy = \"minimax\"");
        let config = Config::from_toml_str(&swapped).expect("minimax should parse");
        assert_eq!(config.search.strategy, StrategyKind::Minimax);
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.game_rules.health_on_food, 100);
    }

    #[test]
    fn test_missing_file_returns_read_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let result = Config::from_toml_str("[timing]\nresponse_time_budget_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

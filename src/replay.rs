// Replay module for analyzing historical game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Replay the configured strategy on historical states
// 3. Compare logged vs replayed moves
// 4. Generate analysis reports

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::board::BoardState;
use crate::config::Config;
use crate::strategy::{self, Strategy};
use crate::types::{Board, Direction};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    /// Controlled snake; older logs without it fall back to the first snake
    #[serde(default)]
    pub you_id: String,
    pub chosen_move: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub depth: u32,
    pub board: Board,
    pub timestamp: String,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub original_score: Option<f64>,
    pub replayed_score: f64,
    pub search_depth: u32,
    pub nodes: u64,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    strategy: Box<dyn Strategy>,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine running the strategy named in `config`
    pub fn new(config: Config, verbose: bool) -> Self {
        let strategy = strategy::from_config(&config);
        ReplayEngine {
            config,
            strategy,
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays the strategy on a single board state with the live turn budget
    /// Returns (move, score, depth, nodes, elapsed ms)
    pub fn replay_turn(
        &self,
        board: &Board,
        you_id: &str,
    ) -> Result<(Direction, f64, u32, u64, u128), String> {
        let state = BoardState::from_snapshot(board, you_id, self.config.game_rules.rules())
            .map_err(|e| e.to_string())?;

        let start_time = Instant::now();
        let deadline = start_time + Duration::from_millis(self.config.timing.effective_budget_ms());
        let decision = self.strategy.decide(&state, you_id, deadline);

        Ok((
            decision.direction,
            decision.score,
            decision.depth,
            decision.nodes,
            start_time.elapsed().as_millis(),
        ))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let you_id = Self::controlled_id(entry)?;
        let original_move: Direction = entry.chosen_move.parse()?;

        let (replayed_move, replayed_score, search_depth, nodes, computation_time) =
            self.replay_turn(&entry.board, you_id)?;

        let matches = original_move == replayed_move;

        let result = ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            original_score: entry.score,
            replayed_score,
            search_depth,
            nodes,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    replayed_move.as_str(),
                    replayed_score,
                    search_depth,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH logged {}, replayed {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    original_move.as_str(),
                    replayed_move.as_str(),
                    replayed_score,
                    search_depth,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file, skipping turns that fail to replay
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    /// Prints a report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n===========================================================");
        println!("  REPLAY REPORT ({})", self.strategy.name());
        println!("===========================================================");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("===========================================================\n");

        if !results.is_empty() {
            let count = results.len() as f64;
            let avg_time = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / count;
            let avg_depth = results.iter().map(|r| r.search_depth as f64).sum::<f64>() / count;
            let avg_nodes = results.iter().map(|r| r.nodes as f64).sum::<f64>() / count;

            println!("Average Search Depth:       {:.1}", avg_depth);
            println!("Average Nodes:              {:.0}", avg_nodes);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("===========================================================");
            println!("  MISMATCHES");
            println!("===========================================================");

            for result in mismatches {
                let logged_score = result
                    .original_score
                    .map_or_else(|| "-".to_string(), |s| format!("{:.2}", s));
                println!(
                    "Turn {}: {} (score {}) -> {} (score {}, depth: {}, time: {}ms)",
                    result.turn,
                    result.original_move.as_str(),
                    logged_score,
                    result.replayed_move.as_str(),
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Checks that the logged move of each listed turn is one of the acceptable moves
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move: Direction = entry.chosen_move.parse()?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }

    fn controlled_id(entry: &LogEntry) -> Result<&str, String> {
        if !entry.you_id.is_empty() {
            return Ok(&entry.you_id);
        }
        entry
            .board
            .snakes
            .first()
            .map(|s| s.id.as_str())
            .ok_or_else(|| "No snakes found in board state".to_string())
    }
}

// Battlesnake bot: per-turn orchestration around the decision engine
//
// The bot converts each API snapshot into a BoardState, runs the configured
// strategy on a blocking thread under the turn budget, and always answers
// with a move, even for malformed snapshots or a search that overruns.

use log::{info, warn};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::BoardState;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::moves::first_in_bounds;
use crate::strategy::{self, Decision, Strategy};
use crate::types::{Battlesnake, Board, Direction, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    strategy: Arc<dyn Strategy>,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the strategy named in `config`
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let strategy = Arc::from(strategy::from_config(&config));
        Self::with_strategy(config, strategy)
    }

    /// Creates a Bot around an explicit strategy
    pub fn with_strategy(config: Config, strategy: Arc<dyn Strategy>) -> Self {
        Bot {
            config,
            strategy,
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Attaches a JSONL decision logger
    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": appearance.apiversion,
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, you: &Battlesnake) {
        info!(
            "GAME START: {} as {} ({})",
            game.id,
            you.id,
            self.strategy.name()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER: {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search runs on tokio's blocking pool with a deadline at the
    /// effective budget; a guard at the full response budget catches a task
    /// that fails to return. Every path yields a move.
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let start_time = Instant::now();
        info!("Turn {}: Computing move", turn);

        let state = match BoardState::from_snapshot(board, &you.id, self.config.game_rules.rules()) {
            Ok(state) => state,
            Err(e) => {
                let direction = Self::default_move(board, you);
                warn!(
                    "Turn {}: Malformed snapshot ({}), answering {}",
                    turn,
                    e,
                    direction.as_str()
                );
                return json!({ "move": direction.as_str() });
            }
        };

        let timing = &self.config.timing;
        let deadline = start_time + Duration::from_millis(timing.effective_budget_ms());
        let guard = start_time + Duration::from_millis(timing.response_time_budget_ms);
        let fallback = Decision::fallback(&state, &you.id, f64::NEG_INFINITY);

        let strategy = self.strategy.clone();
        let you_id = you.id.clone();
        let handle =
            tokio::task::spawn_blocking(move || strategy.decide(&state, &you_id, deadline));

        let decision =
            match tokio::time::timeout_at(tokio::time::Instant::from_std(guard), handle).await {
                Ok(Ok(decision)) => {
                    if decision.fallback {
                        warn!(
                            "Turn {}: Search completed no depth (no safe move or budget spent), falling back to {}",
                            turn,
                            decision.direction.as_str()
                        );
                    }
                    decision
                }
                Ok(Err(e)) => {
                    warn!(
                        "Turn {}: Search task failed ({}), falling back to {}",
                        turn,
                        e,
                        fallback.direction.as_str()
                    );
                    fallback
                }
                Err(_) => {
                    warn!(
                        "Turn {}: Search overran the response budget, falling back to {}",
                        turn,
                        fallback.direction.as_str()
                    );
                    fallback
                }
            };
        info!(
            "Turn {}: Chose {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
            turn,
            decision.direction.as_str(),
            decision.score,
            decision.depth,
            decision.nodes,
            start_time.elapsed().as_millis()
        );

        self.debug_logger
            .log_move(*turn, &you.id, board.clone(), &decision);

        json!({ "move": decision.direction.as_str() })
    }

    /// Move for a snapshot that could not be modelled: the first direction
    /// from the reported head that stays on the board, else up
    fn default_move(board: &Board, you: &Battlesnake) -> Direction {
        first_in_bounds(you.head, board.width, board.height, None).unwrap_or(Direction::Up)
    }
}

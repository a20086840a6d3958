// Decision strategies
//
// A strategy turns one board state into one move. Which strategy runs is
// chosen from Snake.toml at startup; every strategy sits behind the same
// `Strategy` trait so the bot never needs to know which one it holds.

use log::debug;
use rayon::prelude::*;
use serde::Deserialize;
use std::time::{Duration, Instant};

use crate::board::BoardState;
use crate::config::Config;
use crate::evaluation::{evaluate, HeuristicWeights};
use crate::moves::{fallback_move, safe_moves};
use crate::pathfinding::manhattan_distance;
use crate::search::{pick_best, SearchAborted, SearchAlgorithm, SearchStats, Searcher};
use crate::simulation::children;
use crate::types::Direction;

/// Strategy names accepted in `[search] strategy`
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Minimax,
    Expectimax,
    FoodSeeker,
}

/// The move chosen for one turn and how it was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub score: f64,
    /// Deepest fully completed search, 0 when no search finished
    pub depth: u32,
    pub nodes: u64,
    /// True when no safe move existed or no search completed in time
    pub fallback: bool,
}

impl Decision {
    /// Last-resort decision for `you_id`: the first safe move when one
    /// exists, otherwise the least-bad unsafe move
    pub fn fallback(state: &BoardState, you_id: &str, score: f64) -> Self {
        let direction = state.agent(you_id).map_or(Direction::Up, |you| {
            safe_moves(you, state)
                .first()
                .map_or_else(|| fallback_move(you, state), |&(dir, _)| dir)
        });
        Decision {
            direction,
            score,
            depth: 0,
            nodes: 0,
            fallback: true,
        }
    }
}

/// Fixed decision interface: one board in, one move out
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Chooses a move for `you_id`, returning before `deadline`
    fn decide(&self, state: &BoardState, you_id: &str, deadline: Instant) -> Decision;
}

/// Builds the strategy named in the configuration
pub fn from_config(config: &Config) -> Box<dyn Strategy> {
    match config.search.strategy {
        StrategyKind::Minimax => Box::new(TreeSearchStrategy::from_config(
            SearchAlgorithm::Minimax,
            config,
        )),
        StrategyKind::Expectimax => Box::new(TreeSearchStrategy::from_config(
            SearchAlgorithm::Expectimax,
            config,
        )),
        StrategyKind::FoodSeeker => Box::new(FoodSeekerStrategy),
    }
}

/// Game-tree search over our moves and the tracked rival's replies, scored
/// by the leaf heuristic, with iterative deepening under a deadline
#[derive(Debug, Clone)]
pub struct TreeSearchStrategy {
    pub algorithm: SearchAlgorithm,
    pub weights: HeuristicWeights,
    pub initial_depth: u32,
    pub max_depth: u32,
    pub iterative_deepening: bool,
    pub parallel_root: bool,
    pub min_time_remaining: Duration,
}

/// Outcome of one completed search at a fixed depth
#[derive(Debug, Clone, Copy)]
struct IterationResult {
    score: f64,
    best_move: Option<Direction>,
    stats: SearchStats,
}

impl TreeSearchStrategy {
    pub fn from_config(algorithm: SearchAlgorithm, config: &Config) -> Self {
        TreeSearchStrategy {
            algorithm,
            weights: config.heuristic,
            initial_depth: config.search.initial_depth.max(1),
            max_depth: config.search.max_depth.max(1),
            iterative_deepening: config.search.iterative_deepening,
            parallel_root: config.search.parallel_root,
            min_time_remaining: Duration::from_millis(config.timing.min_time_remaining_ms),
        }
    }

    /// Runs one complete search of `depth` plies from our move
    fn search_depth(
        &self,
        state: &BoardState,
        you_id: &str,
        depth: u32,
        deadline: Instant,
    ) -> Result<IterationResult, SearchAborted> {
        let eval = |s: &BoardState| evaluate(s, you_id, &self.weights);
        let expand = |s: &BoardState, controlled_turn: bool| children(s, you_id, controlled_turn);

        if !self.parallel_root || depth < 2 {
            let mut searcher = Searcher::new(&eval, &expand).with_deadline(deadline);
            let (score, best_move) = searcher.search(self.algorithm, state, depth, true)?;
            return Ok(IterationResult {
                score,
                best_move,
                stats: searcher.stats(),
            });
        }

        let root_children = children(state, you_id, true);
        if root_children.is_empty() {
            return Ok(IterationResult {
                score: eval(state),
                best_move: None,
                stats: SearchStats {
                    nodes: 1,
                    leaves: 1,
                    cutoffs: 0,
                },
            });
        }

        // each root branch gets its own clone and searcher; merging in child
        // order keeps the first-best tie-break of the sequential search
        let scored: Vec<((Direction, f64), SearchStats)> = root_children
            .into_par_iter()
            .map(|(dir, child)| {
                let mut searcher = Searcher::new(&eval, &expand).with_deadline(deadline);
                let (score, _) =
                    searcher.search::<BoardState, Direction>(self.algorithm, &child, depth - 1, false)?;
                Ok(((dir, score), searcher.stats()))
            })
            .collect::<Result<_, SearchAborted>>()?;

        let mut stats = SearchStats {
            nodes: 1,
            leaves: 0,
            cutoffs: 0,
        };
        for (_, child_stats) in &scored {
            stats.merge(child_stats);
        }

        let (best_move, score) = match pick_best(scored.into_iter().map(|(pair, _)| pair)) {
            Some((dir, score)) => (Some(dir), score),
            None => (None, f64::NEG_INFINITY),
        };

        Ok(IterationResult {
            score,
            best_move,
            stats,
        })
    }
}

impl Strategy for TreeSearchStrategy {
    fn name(&self) -> &'static str {
        match self.algorithm {
            SearchAlgorithm::Minimax => "minimax",
            SearchAlgorithm::Expectimax => "expectimax",
        }
    }

    fn decide(&self, state: &BoardState, you_id: &str, deadline: Instant) -> Decision {
        let first_depth = if self.iterative_deepening {
            self.initial_depth.min(self.max_depth)
        } else {
            self.max_depth
        };

        let mut best: Option<Decision> = None;
        let mut nodes = 0;

        for depth in first_depth..=self.max_depth {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining < self.min_time_remaining {
                debug!("Stopping search: insufficient time remaining ({}ms)", remaining.as_millis());
                break;
            }

            debug!("Starting iteration at depth {}", depth);
            let result = match self.search_depth(state, you_id, depth, deadline) {
                Ok(result) => result,
                Err(SearchAborted) => {
                    debug!("Depth {} aborted at deadline", depth);
                    break;
                }
            };
            nodes += result.stats.nodes;

            let direction = match result.best_move {
                Some(direction) => direction,
                None => {
                    // no safe move at the root, deeper search cannot find one
                    let mut decision = Decision::fallback(state, you_id, result.score);
                    decision.nodes = nodes;
                    return decision;
                }
            };

            debug!(
                "Depth {}: {} (score: {}, nodes: {}, cutoffs: {})",
                depth,
                direction,
                result.score,
                result.stats.nodes,
                result.stats.cutoffs
            );
            best = Some(Decision {
                direction,
                score: result.score,
                depth,
                nodes,
                fallback: false,
            });

            if result.score.is_infinite() {
                debug!("Stopping search: outcome decided at depth {}", depth);
                break;
            }
        }

        best.unwrap_or_else(|| {
            let mut decision = Decision::fallback(state, you_id, f64::NEG_INFINITY);
            decision.nodes = nodes;
            decision
        })
    }
}

/// Depth-free baseline: step toward the closest food among the safe moves
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodSeekerStrategy;

impl Strategy for FoodSeekerStrategy {
    fn name(&self) -> &'static str {
        "food_seeker"
    }

    fn decide(&self, state: &BoardState, you_id: &str, _deadline: Instant) -> Decision {
        let you = match state.agent(you_id) {
            Some(you) => you,
            None => return Decision::fallback(state, you_id, f64::NEG_INFINITY),
        };
        let head = match you.head() {
            Some(head) => head,
            None => return Decision::fallback(state, you_id, f64::NEG_INFINITY),
        };

        let moves = safe_moves(you, state);
        let first = match moves.first() {
            Some(&(dir, _)) => dir,
            None => return Decision::fallback(state, you_id, f64::NEG_INFINITY),
        };

        let closest_food = state
            .food
            .iter()
            .min_by_key(|&&food| manhattan_distance(head, food))
            .copied();

        let (direction, distance) = match closest_food {
            Some(food) => moves
                .iter()
                .map(|&(dir, next)| (dir, manhattan_distance(next, food)))
                .min_by_key(|&(_, distance)| distance)
                .unwrap_or((first, 0)),
            None => (first, 0),
        };

        Decision {
            direction,
            score: -(distance as f64),
            depth: 1,
            nodes: moves.len() as u64,
            fallback: false,
        }
    }
}

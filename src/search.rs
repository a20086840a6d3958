// Generic bounded-depth game-tree search
//
// Two interchangeable algorithms share one recursive contract:
//
// - Minimax with alpha-beta pruning: the controlled side maximizes, the
//   rival minimizes. Pruning skips work but never changes the result.
// - Expectimax: the controlled side maximizes, the rival ply is a chance
//   node that averages its branches with uniform weight.
//
// The search knows nothing about the game. Callers inject an evaluation
// function `Fn(&S) -> f64` and a children function
// `Fn(&S, bool) -> Vec<(M, S)>` whose flag says whether the controlled side
// is to move. A node is a leaf when the depth is exhausted or it has no
// children. Ties keep the first child that reached the best score.

use std::time::Instant;

/// Which tree search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAlgorithm {
    Minimax,
    Expectimax,
}

/// Returned when the deadline passes mid-search. Not a failure: the caller
/// keeps the best result of an earlier, completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchAborted;

/// Counters collected during one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
    pub cutoffs: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
    }
}

/// Search driver holding the injected callbacks, an optional deadline and
/// the statistics of the searches it has run
pub struct Searcher<E, C> {
    evaluate: E,
    children: C,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl<E, C> Searcher<E, C> {
    pub fn new(evaluate: E, children: C) -> Self {
        Searcher {
            evaluate,
            children,
            deadline: None,
            stats: SearchStats::default(),
        }
    }

    /// Aborts any search still running at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs `algorithm` from `state` for `depth` plies. `controlled_turn`
    /// says whether the maximizing side moves first.
    pub fn search<S, M>(
        &mut self,
        algorithm: SearchAlgorithm,
        state: &S,
        depth: u32,
        controlled_turn: bool,
    ) -> Result<(f64, Option<M>), SearchAborted>
    where
        E: Fn(&S) -> f64,
        C: Fn(&S, bool) -> Vec<(M, S)>,
    {
        match algorithm {
            SearchAlgorithm::Minimax => self.alpha_beta(
                state,
                depth,
                controlled_turn,
                f64::NEG_INFINITY,
                f64::INFINITY,
            ),
            SearchAlgorithm::Expectimax => self.expectimax(state, depth, controlled_turn),
        }
    }

    fn enter(&mut self) -> Result<(), SearchAborted> {
        self.stats.nodes += 1;
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SearchAborted),
            _ => Ok(()),
        }
    }

    fn leaf<S, M>(&mut self, state: &S) -> (f64, Option<M>)
    where
        E: Fn(&S) -> f64,
    {
        self.stats.leaves += 1;
        ((self.evaluate)(state), None)
    }

    fn alpha_beta<S, M>(
        &mut self,
        state: &S,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<(f64, Option<M>), SearchAborted>
    where
        E: Fn(&S) -> f64,
        C: Fn(&S, bool) -> Vec<(M, S)>,
    {
        self.enter()?;
        if depth == 0 {
            return Ok(self.leaf(state));
        }
        let children = (self.children)(state, maximizing);
        if children.is_empty() {
            return Ok(self.leaf(state));
        }

        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        for (mv, child) in children {
            let (score, _) =
                self.alpha_beta::<S, M>(&child, depth - 1, !maximizing, alpha, beta)?;

            if maximizing {
                if best_move.is_none() || score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if best_move.is_none() || score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Ok((best_score, best_move))
    }

    fn expectimax<S, M>(
        &mut self,
        state: &S,
        depth: u32,
        maximizing: bool,
    ) -> Result<(f64, Option<M>), SearchAborted>
    where
        E: Fn(&S) -> f64,
        C: Fn(&S, bool) -> Vec<(M, S)>,
    {
        self.enter()?;
        if depth == 0 {
            return Ok(self.leaf(state));
        }
        let children = (self.children)(state, maximizing);
        if children.is_empty() {
            return Ok(self.leaf(state));
        }

        if maximizing {
            let mut best_score = f64::NEG_INFINITY;
            let mut best_move = None;
            for (mv, child) in children {
                let (score, _) = self.expectimax::<S, M>(&child, depth - 1, false)?;
                if best_move.is_none() || score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
            }
            return Ok((best_score, best_move));
        }

        let branches = children.len() as f64;
        let mut total = 0.0;
        for (_, child) in children {
            let (score, _) = self.expectimax::<S, M>(&child, depth - 1, true)?;
            total += score;
        }

        // a certain win and a certain loss among the branches sum to NaN
        let average = total / branches;
        if average.is_nan() {
            Ok((f64::NEG_INFINITY, None))
        } else {
            Ok((average, None))
        }
    }
}

/// Picks the highest score, keeping the first entry on ties
pub fn pick_best<M, I>(scored: I) -> Option<(M, f64)>
where
    I: IntoIterator<Item = (M, f64)>,
{
    let mut best: Option<(M, f64)> = None;
    for (mv, score) in scored {
        let better = match &best {
            None => true,
            Some((_, best_score)) => score > *best_score,
        };
        if better {
            best = Some((mv, score));
        }
    }
    best
}

/// Minimax with alpha-beta pruning, no deadline
pub fn minimax<S, M, E, C>(
    state: &S,
    depth: u32,
    controlled_turn: bool,
    evaluate: E,
    children: C,
) -> (f64, Option<M>)
where
    E: Fn(&S) -> f64,
    C: Fn(&S, bool) -> Vec<(M, S)>,
{
    Searcher::new(evaluate, children)
        .search(SearchAlgorithm::Minimax, state, depth, controlled_turn)
        .unwrap_or_else(|SearchAborted| unreachable!("search without a deadline never aborts"))
}

/// Expectimax over the rival's moves, no deadline
pub fn expectimax<S, M, E, C>(
    state: &S,
    depth: u32,
    controlled_turn: bool,
    evaluate: E,
    children: C,
) -> (f64, Option<M>)
where
    E: Fn(&S) -> f64,
    C: Fn(&S, bool) -> Vec<(M, S)>,
{
    Searcher::new(evaluate, children)
        .search(SearchAlgorithm::Expectimax, state, depth, controlled_turn)
        .unwrap_or_else(|SearchAborted| unreachable!("search without a deadline never aborts"))
}

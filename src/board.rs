// Board state model used by the search
//
// A BoardState is built once per turn from the API snapshot and then cloned
// for every simulated branch. Geometry and rules never change between a
// parent and its children; only agents and food do.

use std::collections::{HashSet, VecDeque};

use crate::error::SnapshotError;
use crate::types::{Board, Coord};

/// Health rules applied by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    /// Health restored on eating, also the maximum health
    pub max_health: i32,
    pub health_loss_per_turn: i32,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            max_health: 100,
            health_loss_per_turn: 1,
        }
    }
}

/// A snake inside the simulation. `body[0]` is always the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: String,
    pub body: VecDeque<Coord>,
    pub health: i32,
}

impl Agent {
    pub fn new<I>(id: impl Into<String>, health: i32, body: I) -> Self
    where
        I: IntoIterator<Item = Coord>,
    {
        Agent {
            id: id.into(),
            body: body.into_iter().collect(),
            health,
        }
    }

    pub fn head(&self) -> Option<Coord> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Coord> {
        self.body.back().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0 && !self.body.is_empty()
    }

    /// Every segment except the tail tip, which vacates on the next move
    pub fn blocking_segments(&self) -> impl Iterator<Item = &Coord> + '_ {
        let n = self.body.len().saturating_sub(1);
        self.body.iter().take(n)
    }
}

/// Snapshot of the board at one point of the game tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub width: i32,
    pub height: i32,
    pub agents: Vec<Agent>,
    pub food: Vec<Coord>,
    pub rules: GameRules,
}

impl BoardState {
    /// Builds the search model from an API board, validating it for the
    /// snake identified by `you_id`
    pub fn from_snapshot(
        board: &Board,
        you_id: &str,
        rules: GameRules,
    ) -> Result<Self, SnapshotError> {
        if board.width <= 0 || board.height <= 0 {
            return Err(SnapshotError::InvalidGeometry {
                width: board.width,
                height: board.height,
            });
        }

        if !board.snakes.iter().any(|s| s.id == you_id) {
            return Err(SnapshotError::MissingControlledAgent(you_id.to_string()));
        }

        let mut agents = Vec::with_capacity(board.snakes.len());
        for snake in &board.snakes {
            if snake.body.is_empty() {
                return Err(SnapshotError::EmptyBody(snake.id.clone()));
            }
            if let Some(&at) = snake
                .body
                .iter()
                .find(|c| !in_bounds(c, board.width, board.height))
            {
                return Err(SnapshotError::SegmentOutOfBounds {
                    id: snake.id.clone(),
                    at,
                });
            }
            agents.push(Agent::new(
                snake.id.clone(),
                snake.health,
                snake.body.iter().copied(),
            ));
        }

        Ok(BoardState {
            width: board.width,
            height: board.height,
            agents,
            food: board.food.clone(),
            rules,
        })
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// The rival the search plays against: the first agent in snapshot
    /// order that is not `you_id`. Agents are never removed by simulation,
    /// so this stays the same snake throughout a search tree.
    pub fn tracked_rival(&self, you_id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id != you_id)
    }

    pub fn is_alive(&self, id: &str) -> bool {
        self.agent(id).map_or(false, Agent::is_alive)
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        in_bounds(coord, self.width, self.height)
    }

    /// Cells unsafe to move onto: every live agent's body minus its tail tip
    pub fn obstacles(&self) -> HashSet<Coord> {
        self.agents
            .iter()
            .filter(|a| a.is_alive())
            .flat_map(|a| a.blocking_segments())
            .copied()
            .collect()
    }
}

/// Checks whether a coordinate lies on a `width` x `height` board
pub fn in_bounds(coord: &Coord, width: i32, height: i32) -> bool {
    coord.x >= 0 && coord.x < width && coord.y >= 0 && coord.y < height
}

// Leaf evaluation for the search
//
// Scores a board from the controlled snake's point of view as a weighted sum
// of space advantage, health advantage and food control. This runs at every
// leaf, and its A* calls per food dominate search time.

use std::collections::HashSet;

use serde::Deserialize;

use crate::board::BoardState;
use crate::pathfinding::{find_path, reachable_area};
use crate::types::Coord;

/// Coefficients applied to each evaluation term
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HeuristicWeights {
    pub space_weight: f64,
    pub vitality_weight: f64,
    pub resource_weight: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            space_weight: 1.0,
            vitality_weight: 0.1,
            resource_weight: 5.0,
        }
    }
}

/// Evaluates `state` for `you_id`.
///
/// `-inf` when our snake is dead or gone, `+inf` when the tracked rival is
/// dead while we live, otherwise the weighted term sum.
pub fn evaluate(state: &BoardState, you_id: &str, weights: &HeuristicWeights) -> f64 {
    let me = match state.agent(you_id) {
        Some(me) if me.is_alive() => me,
        _ => return f64::NEG_INFINITY,
    };
    let my_head = match me.head() {
        Some(head) => head,
        None => return f64::NEG_INFINITY,
    };

    let rival = state.tracked_rival(you_id);
    if let Some(r) = rival {
        if !r.is_alive() {
            return f64::INFINITY;
        }
    }
    let rival_head = rival.and_then(|r| r.head());

    let mut obstacles = state.obstacles();

    let my_space = area_from_head(my_head, &mut obstacles, state.width, state.height);
    let rival_space = rival_head
        .map(|head| area_from_head(head, &mut obstacles, state.width, state.height))
        .unwrap_or(0);
    let space_advantage = my_space as f64 - rival_space as f64;

    let vitality_advantage = (me.health - rival.map_or(0, |r| r.health)) as f64;

    let resource_control = state
        .food
        .iter()
        .filter(|&&food| controls_food(my_head, rival_head, food, &obstacles, state))
        .count() as f64;

    space_advantage * weights.space_weight
        + vitality_advantage * weights.vitality_weight
        + resource_control * weights.resource_weight
}

/// Flood-fill area around a snake's head. The head is part of the obstacle
/// set, so it is lifted out for the fill and put back afterwards.
fn area_from_head(head: Coord, obstacles: &mut HashSet<Coord>, width: i32, height: i32) -> usize {
    let was_blocked = obstacles.remove(&head);
    let area = reachable_area(head, obstacles, width, height);
    if was_blocked {
        obstacles.insert(head);
    }
    area
}

/// We control a food when we can reach it and the rival either cannot or
/// needs a strictly longer path. Ties go to nobody.
fn controls_food(
    my_head: Coord,
    rival_head: Option<Coord>,
    food: Coord,
    obstacles: &HashSet<Coord>,
    state: &BoardState,
) -> bool {
    let mine = match find_path(my_head, food, obstacles, state.width, state.height) {
        Some(path) => path.len(),
        None => return false,
    };
    let theirs = rival_head
        .and_then(|head| find_path(head, food, obstacles, state.width, state.height))
        .map(|path| path.len());

    match theirs {
        Some(len) => mine < len,
        None => true,
    }
}

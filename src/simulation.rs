// One-ply state simulation
//
// Every simulated move works on its own clone, so sibling branches of the
// search never share mutable state.

use crate::board::BoardState;
use crate::moves::safe_moves;
use crate::types::{Coord, Direction};

/// Returns a copy of `state` in which `agent_id` has moved its head to
/// `target`. Eating resets health to the maximum and keeps the tail; any
/// other move costs health and drops the tail. Collisions and starvation
/// are left to the evaluator.
pub fn apply_move(state: &BoardState, agent_id: &str, target: Coord) -> BoardState {
    let mut next = state.clone();
    let rules = next.rules;

    let ate = match next.food.iter().position(|&f| f == target) {
        Some(idx) => {
            next.food.swap_remove(idx);
            true
        }
        None => false,
    };

    if let Some(agent) = next.agent_mut(agent_id) {
        if ate {
            agent.health = rules.max_health;
        } else {
            agent.health -= rules.health_loss_per_turn;
            agent.body.pop_back();
        }
        agent.body.push_front(target);
    }

    next
}

/// Expands the ply of the side to move: the controlled snake when
/// `controlled_turn`, the tracked rival otherwise. A dead or missing mover
/// has no children, which makes the search evaluate the node directly.
pub fn children(
    state: &BoardState,
    you_id: &str,
    controlled_turn: bool,
) -> Vec<(Direction, BoardState)> {
    let mover = if controlled_turn {
        state.agent(you_id)
    } else {
        state.tracked_rival(you_id)
    };

    match mover {
        Some(agent) if agent.is_alive() => safe_moves(agent, state)
            .into_iter()
            .map(|(dir, target)| (dir, apply_move(state, &agent.id, target)))
            .collect(),
        _ => vec![],
    }
}

// Move generation
//
// A move is safe if it:
// - Doesn't go out of bounds
// - Doesn't collide with snake bodies (excluding tails which will move)
// - Doesn't meet the head of a rival at least as long as the mover

use std::collections::HashSet;

use crate::board::{Agent, BoardState};
use crate::types::{Coord, Direction};

/// Enumerates the moves of `agent` that do not immediately kill it, in
/// `Direction::all()` order, paired with the cell each move lands on
pub fn safe_moves(agent: &Agent, state: &BoardState) -> Vec<(Direction, Coord)> {
    let head = match agent.head() {
        Some(head) if agent.is_alive() => head,
        _ => return vec![],
    };
    let obstacles = state.obstacles();

    Direction::all()
        .iter()
        .map(|&dir| (dir, dir.apply(&head)))
        .filter(|(_, target)| {
            state.in_bounds(target)
                && !obstacles.contains(target)
                && !loses_head_to_head(agent, target, state)
        })
        .collect()
}

/// True when `target` is the head of a live rival the mover would not outlast.
/// Equal lengths kill both snakes, so only a strictly longer mover survives.
fn loses_head_to_head(agent: &Agent, target: &Coord, state: &BoardState) -> bool {
    state.agents.iter().any(|other| {
        other.id != agent.id
            && other.is_alive()
            && other.head().as_ref() == Some(target)
            && other.len() >= agent.len()
    })
}

/// Picks a move when no safe move exists: the first direction that stays on
/// the board and off every obstacle, then the first that stays on the board,
/// then `up`
pub fn fallback_move(agent: &Agent, state: &BoardState) -> Direction {
    let head = match agent.head() {
        Some(head) => head,
        None => return Direction::Up,
    };
    let obstacles = state.obstacles();

    first_in_bounds(head, state.width, state.height, Some(&obstacles))
        .or_else(|| first_in_bounds(head, state.width, state.height, None))
        .unwrap_or(Direction::Up)
}

/// First direction from `head` that lands on the board and, when given, off
/// the `avoid` set
pub fn first_in_bounds(
    head: Coord,
    width: i32,
    height: i32,
    avoid: Option<&HashSet<Coord>>,
) -> Option<Direction> {
    Direction::all().iter().copied().find(|dir| {
        let next = dir.apply(&head);
        crate::board::in_bounds(&next, width, height)
            && avoid.map_or(true, |cells| !cells.contains(&next))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameRules;

    fn agent(id: &str, body: &[(i32, i32)]) -> Agent {
        Agent::new(id, 90, body.iter().map(|&(x, y)| Coord::new(x, y)))
    }

    fn state(agents: Vec<Agent>) -> BoardState {
        BoardState {
            width: 7,
            height: 7,
            agents,
            food: vec![],
            rules: GameRules::default(),
        }
    }

    fn directions(moves: &[(Direction, Coord)]) -> Vec<Direction> {
        moves.iter().map(|(d, _)| *d).collect()
    }

    #[test]
    fn test_open_board_has_four_moves_in_order() {
        let s = state(vec![agent("me", &[(3, 3)])]);
        let moves = safe_moves(&s.agents[0], &s);
        assert_eq!(
            directions(&moves),
            vec![Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        );
        assert_eq!(moves[0].1, Coord::new(3, 4));
    }

    #[test]
    fn test_excludes_off_board_moves() {
        let s = state(vec![agent("me", &[(0, 0)])]);
        let moves = safe_moves(&s.agents[0], &s);
        assert_eq!(directions(&moves), vec![Direction::Up, Direction::Right]);
    }

    #[test]
    fn test_excludes_own_neck_but_not_own_tail() {
        // square loop: head at (3,3), tail at (2,3) right next to the head
        let s = state(vec![agent("me", &[(3, 3), (3, 2), (2, 2), (2, 3)])]);
        let moves = safe_moves(&s.agents[0], &s);
        let dirs = directions(&moves);
        assert!(!dirs.contains(&Direction::Down), "neck is deadly");
        assert!(dirs.contains(&Direction::Left), "tail tip vacates");
    }

    #[test]
    fn test_excludes_rival_body() {
        let s = state(vec![
            agent("me", &[(3, 3), (3, 2)]),
            agent("rival", &[(5, 3), (4, 3), (4, 4)]),
        ]);
        let dirs = directions(&safe_moves(&s.agents[0], &s));
        assert!(!dirs.contains(&Direction::Right));
        assert!(dirs.contains(&Direction::Up));
    }

    #[test]
    fn test_head_to_head_against_equal_or_longer_is_unsafe() {
        // single-segment rival, so its head is not part of the obstacle set
        let equal = state(vec![agent("me", &[(3, 3)]), agent("rival", &[(4, 3)])]);
        assert!(!directions(&safe_moves(&equal.agents[0], &equal)).contains(&Direction::Right));

        let shorter_me = state(vec![
            agent("me", &[(3, 3)]),
            agent("rival", &[(4, 3), (4, 3)]),
        ]);
        assert!(!directions(&safe_moves(&shorter_me.agents[0], &shorter_me))
            .contains(&Direction::Right));
    }

    #[test]
    fn test_head_to_head_against_shorter_is_allowed() {
        let s = state(vec![
            agent("me", &[(3, 3), (3, 2), (3, 1)]),
            agent("rival", &[(4, 3)]),
        ]);
        assert!(directions(&safe_moves(&s.agents[0], &s)).contains(&Direction::Right));
    }

    #[test]
    fn test_dead_agent_has_no_moves() {
        let mut s = state(vec![agent("me", &[(3, 3)])]);
        s.agents[0].health = 0;
        assert!(safe_moves(&s.agents[0], &s).is_empty());
    }

    #[test]
    fn test_fallback_prefers_in_bounds_move() {
        // head in the top-left corner, boxed in by its own body and a rival
        let s = state(vec![
            agent("me", &[(0, 6), (0, 5), (1, 5), (1, 4)]),
            agent("rival", &[(1, 6), (2, 6), (3, 6)]),
        ]);
        assert!(safe_moves(&s.agents[0], &s).is_empty());

        let chosen = fallback_move(&s.agents[0], &s);
        assert_ne!(chosen, Direction::Up, "up leaves the board");
        assert_ne!(chosen, Direction::Left, "left leaves the board");
    }

    #[test]
    fn test_fallback_skips_obstacle_cells() {
        let s = state(vec![
            agent("me", &[(0, 0)]),
            agent("rival", &[(0, 1), (0, 2), (1, 2)]),
        ]);
        assert_eq!(fallback_move(&s.agents[0], &s), Direction::Right);
    }
}

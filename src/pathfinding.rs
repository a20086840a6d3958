// Grid search primitives: A* shortest path and flood-fill area counting
//
// Both functions are pure. Movement is 4-directional with unit cost, so the
// Manhattan heuristic is admissible and consistent.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::board::in_bounds;
use crate::types::Coord;

/// Calculates Manhattan distance between two coordinates
pub fn manhattan_distance(a: Coord, b: Coord) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Open-list entry ordered so that `BinaryHeap` pops the lowest
/// `f = g + h` first and, among equal `f`, the earliest discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f: i32,
    seq: u64,
    cost: i32,
    coord: Coord,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest path from `start` to `goal` avoiding `obstacles`.
///
/// The goal is always traversable, even when it is listed as an obstacle.
/// Returns the cells from `start` to `goal` inclusive, or `None` when the
/// goal cannot be reached or `start` is off the board.
pub fn find_path(
    start: Coord,
    goal: Coord,
    obstacles: &HashSet<Coord>,
    width: i32,
    height: i32,
) -> Option<Vec<Coord>> {
    if !in_bounds(&start, width, height) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut cost_so_far: HashMap<Coord, i32> = HashMap::new();
    let mut seq = 0u64;

    cost_so_far.insert(start, 0);
    open.push(OpenNode {
        f: manhattan_distance(start, goal),
        seq,
        cost: 0,
        coord: start,
    });

    while let Some(node) = open.pop() {
        let current = node.coord;
        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        // stale entry, a cheaper route to this cell was queued later
        if cost_so_far.get(&current).map_or(false, |&best| node.cost > best) {
            continue;
        }

        for neighbor in current.neighbors().iter().copied() {
            if !in_bounds(&neighbor, width, height) {
                continue;
            }
            if neighbor != goal && obstacles.contains(&neighbor) {
                continue;
            }

            let new_cost = node.cost + 1;
            let improves = cost_so_far
                .get(&neighbor)
                .map_or(true, |&known| new_cost < known);
            if improves {
                cost_so_far.insert(neighbor, new_cost);
                came_from.insert(neighbor, current);
                seq += 1;
                open.push(OpenNode {
                    f: new_cost + manhattan_distance(neighbor, goal),
                    seq,
                    cost: new_cost,
                    coord: neighbor,
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<Coord, Coord>, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Counts the cells reachable from `start` through free, on-board cells,
/// `start` included. Returns 0 when `start` is blocked or off the board.
pub fn reachable_area(start: Coord, obstacles: &HashSet<Coord>, width: i32, height: i32) -> usize {
    if obstacles.contains(&start) || !in_bounds(&start, width, height) {
        return 0;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    let mut count = 0;
    while let Some(current) = queue.pop_front() {
        count += 1;
        for neighbor in current.neighbors().iter().copied() {
            if in_bounds(&neighbor, width, height)
                && !obstacles.contains(&neighbor)
                && visited.insert(neighbor)
            {
                queue.push_back(neighbor);
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cells: &[(i32, i32)]) -> HashSet<Coord> {
        cells.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn test_find_path_open_board_is_shortest() {
        let path = find_path(Coord::new(0, 0), Coord::new(2, 2), &HashSet::new(), 3, 3).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Coord::new(0, 0));
        assert_eq!(path[4], Coord::new(2, 2));
        assert_eq!(
            path,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 2),
                Coord::new(1, 2),
                Coord::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_find_path_length_matches_manhattan_on_empty_board() {
        let empty = HashSet::new();
        for &(sx, sy, gx, gy) in &[(0, 0, 6, 6), (3, 1, 0, 5), (6, 0, 6, 0), (2, 4, 5, 4)] {
            let start = Coord::new(sx, sy);
            let goal = Coord::new(gx, gy);
            let path = find_path(start, goal, &empty, 7, 7).unwrap();
            assert_eq!(path.len() as i32, 1 + manhattan_distance(start, goal));
        }
    }

    #[test]
    fn test_find_path_routes_around_obstacle() {
        let obstacles = set(&[(1, 1)]);
        let path = find_path(Coord::new(0, 0), Coord::new(2, 2), &obstacles, 3, 3).unwrap();
        assert!(!path.contains(&Coord::new(1, 1)));
        assert!(path.contains(&Coord::new(0, 1)));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_find_path_detours_when_wall_blocks() {
        // vertical wall at x=2 with a gap at y=4
        let obstacles = set(&[(2, 0), (2, 1), (2, 2), (2, 3)]);
        let path = find_path(Coord::new(0, 0), Coord::new(4, 0), &obstacles, 5, 5).unwrap();
        assert_eq!(path.len(), 13);
        for cell in &path {
            assert!(!obstacles.contains(cell));
        }
    }

    #[test]
    fn test_find_path_unreachable_returns_none() {
        let obstacles = set(&[(0, 1), (1, 0), (1, 1)]);
        assert!(find_path(Coord::new(0, 0), Coord::new(2, 2), &obstacles, 3, 3).is_none());
    }

    #[test]
    fn test_find_path_goal_inside_obstacles_is_allowed() {
        let obstacles = set(&[(2, 2), (1, 2)]);
        let path = find_path(Coord::new(0, 0), Coord::new(2, 2), &obstacles, 3, 3).unwrap();
        assert_eq!(path.last(), Some(&Coord::new(2, 2)));
        assert!(!path.contains(&Coord::new(1, 2)));
    }

    #[test]
    fn test_find_path_out_of_bounds_start() {
        assert!(find_path(Coord::new(-1, 0), Coord::new(2, 2), &HashSet::new(), 3, 3).is_none());
    }

    #[test]
    fn test_find_path_start_equals_goal() {
        let path = find_path(Coord::new(1, 1), Coord::new(1, 1), &HashSet::new(), 3, 3).unwrap();
        assert_eq!(path, vec![Coord::new(1, 1)]);
    }

    #[test]
    fn test_reachable_area_open_board() {
        assert_eq!(reachable_area(Coord::new(1, 1), &HashSet::new(), 3, 3), 9);
        assert_eq!(reachable_area(Coord::new(4, 2), &HashSet::new(), 11, 7), 77);
    }

    #[test]
    fn test_reachable_area_surrounded_start() {
        let obstacles = set(&[(0, 1), (1, 0), (1, 2), (2, 1)]);
        assert_eq!(reachable_area(Coord::new(1, 1), &obstacles, 3, 3), 1);
    }

    #[test]
    fn test_reachable_area_blocked_or_off_board_start() {
        let obstacles = set(&[(1, 1)]);
        assert_eq!(reachable_area(Coord::new(1, 1), &obstacles, 3, 3), 0);
        assert_eq!(reachable_area(Coord::new(3, 1), &HashSet::new(), 3, 3), 0);
    }

    #[test]
    fn test_reachable_area_counts_only_own_region() {
        // wall splits a 5x5 board into a 2x5 and a 2x5 region
        let obstacles = set(&[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);
        assert_eq!(reachable_area(Coord::new(0, 0), &obstacles, 5, 5), 10);
        assert_eq!(reachable_area(Coord::new(4, 4), &obstacles, 5, 5), 10);
    }
}

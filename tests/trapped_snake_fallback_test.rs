// Integration tests for trapped snake fallback behavior
//
// When a snake has no safe move it must still answer with a direction that
// stays on the board whenever one exists, instead of blindly defaulting to "up".

use serde_json::json;
use ultimate_snake::bot::Bot;
use ultimate_snake::config::Config;
use ultimate_snake::types::{Battlesnake, Board, Coord, Game};

fn game() -> Game {
    Game {
        id: "test-game".to_string(),
        ruleset: json!({}),
        timeout: 500,
        source: "test".to_string(),
    }
}

fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health: 50,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

/// Snake at the top wall with its own body left and below, rival neck to the right.
/// Every neighbor is blocked; "up" is off the board, so "down" is the answer.
#[tokio::test]
async fn test_trapped_at_top_wall_chooses_in_bounds_move() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![
            snake("our-snake", &[(5, 10), (5, 9), (4, 9), (4, 10), (3, 10)]),
            snake("opponent", &[(7, 10), (6, 10), (6, 9), (6, 8)]),
        ],
        hazards: vec![],
    };
    let you = board.snakes[0].clone();

    let response = bot.get_move(&game(), &0, &board, &you).await;
    let chosen_move = response["move"].as_str().expect("move should be a string");

    assert_ne!(chosen_move, "up", "up leaves the board");
    assert_eq!(chosen_move, "down");
}

/// Bottom-left corner, boxed in by its own body
#[tokio::test]
async fn test_trapped_in_corner_chooses_in_bounds_move() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![
            snake("our-snake", &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)]),
            snake("opponent", &[(9, 9), (9, 8), (9, 7)]),
        ],
        hazards: vec![],
    };
    let you = board.snakes[0].clone();

    let response = bot.get_move(&game(), &3, &board, &you).await;
    let chosen_move = response["move"].as_str().expect("move should be a string");

    assert!(
        chosen_move == "up" || chosen_move == "right",
        "expected an in-bounds move, got {}",
        chosen_move
    );
    assert_eq!(chosen_move, "up", "first in-bounds direction wins");
}

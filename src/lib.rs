// Library exports for the Battlesnake engine
// The server binary and the replay tool both build on these modules

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod evaluation;
pub mod moves;
pub mod pathfinding;
pub mod replay;
pub mod search;
pub mod simulation;
pub mod strategy;
pub mod types;

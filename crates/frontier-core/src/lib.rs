//! Frontier - rules engine for a settlement-and-trade game on a hex grid
//!
//! This crate provides the complete game logic:
//! - Closed-form hex addressing for tiles, corners, and edges
//! - Board graph with terrain, production triggers, ports, and occupancy
//! - Player ledgers with resources, development cards, and piece stock
//! - Game state machine with full rule enforcement and legal-action
//!   enumeration
//! - Cheap snapshot/restore for search agents
//!
//! The engine is deterministic given a seed, and dice rolls can be forced
//! to explicit values, so searches and replays reproduce exactly.
//!
//! # Modules
//!
//! - [`grid`]: Coordinate arithmetic for tiles, corners, and edges
//! - [`board`]: The finite mesh, terrain, ports, and piece occupancy
//! - [`player`]: Per-player ledger
//! - [`actions`]: Action and event vocabulary
//! - [`rules`]: Pure legality predicates
//! - [`game`]: Phase machine and apply loop
//! - [`snapshot`]: Save/restore tokens

pub mod actions;
pub mod board;
pub mod game;
pub mod grid;
pub mod player;
pub mod rules;
pub mod snapshot;

// Re-export commonly used types
pub use actions::{ActionRecord, GameAction, GameEvent, TradeOffer};
pub use board::{
    Board, BoardView, CornerPiece, EdgePiece, PlayerId, Port, PortKind, Resource, Terrain, Tile,
};
pub use game::{GameError, GamePhase, GameState, GameView, SetupPlacing};
pub use grid::{Compass, CornerCoord, EdgeCoord, GridError, Pole, Side, TileCoord};
pub use player::{DevelopmentCard, HeldCard, Player, PlayerColor, ResourceHand};
pub use snapshot::{Snapshot, SnapshotError};

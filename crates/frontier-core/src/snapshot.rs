//! Cheap save/restore for search agents.
//!
//! A [`Snapshot`] is an opaque token capturing everything mutable about a
//! game: sparse occupancy, ledgers, deck, phase, and the RNG. Capture and
//! restore cost time proportional to placed pieces and players, not to the
//! mesh, so a rollout loop can branch thousands of times per second.
//! Restoring also rewinds the action log to the captured length.

use crate::board::{CornerPiece, EdgePiece};
use crate::game::{GamePhase, GameState};
use crate::grid::{CornerCoord, EdgeCoord, TileCoord};
use crate::player::{DevelopmentCard, Player};
use rand::rngs::StdRng;
use thiserror::Error;

/// Restore onto an incompatible game is a hard failure: snapshots are
/// only meaningful against the board and roster they were captured from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot captured with {expected} players, game has {actual}")]
    PlayerCountMismatch { expected: usize, actual: usize },

    #[error("snapshot captured on a {expected}-layer board, game has {actual}")]
    LayerMismatch { expected: u32, actual: u32 },
}

/// Opaque saved game state. Immutable once captured; compare two
/// snapshots to check whether a rollout returned to its starting point.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    layers: u32,
    player_count: usize,
    corner_pieces: Vec<(CornerCoord, CornerPiece)>,
    edge_pieces: Vec<(EdgeCoord, EdgePiece)>,
    robber: TileCoord,
    players: Vec<Player>,
    dev_card_deck: Vec<DevelopmentCard>,
    phase: GamePhase,
    current_player: u8,
    turn_number: u32,
    last_roll: Option<u8>,
    roll_history: Vec<u8>,
    action_log_len: usize,
    dev_card_played_this_turn: bool,
    setup_settlement: Option<CornerCoord>,
    rng: StdRng,
}

impl GameState {
    /// Capture the complete mutable state of the game.
    pub fn capture(&self) -> Snapshot {
        // Occupancy lives in hash maps; sort so two captures of the same
        // position compare equal.
        let mut corner_pieces: Vec<_> = self
            .board
            .placed_corner_pieces()
            .map(|(c, p)| (*c, *p))
            .collect();
        corner_pieces.sort_by_key(|(c, _)| *c);
        let mut edge_pieces: Vec<_> = self
            .board
            .placed_edge_pieces()
            .map(|(e, p)| (*e, *p))
            .collect();
        edge_pieces.sort_by_key(|(e, _)| *e);

        Snapshot {
            layers: self.board.layers(),
            player_count: self.players.len(),
            corner_pieces,
            edge_pieces,
            robber: self.board.robber(),
            players: self.players.clone(),
            dev_card_deck: self.dev_card_deck.clone(),
            phase: self.phase.clone(),
            current_player: self.current_player,
            turn_number: self.turn_number,
            last_roll: self.last_roll,
            roll_history: self.roll_history.clone(),
            action_log_len: self.action_log.len(),
            dev_card_played_this_turn: self.dev_card_played_this_turn,
            setup_settlement: self.setup_settlement,
            rng: self.rng.clone(),
        }
    }

    /// Overwrite this game with a snapshot captured from it earlier.
    /// Fails without touching anything when the snapshot belongs to a
    /// different board size or roster.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.player_count != self.players.len() {
            return Err(SnapshotError::PlayerCountMismatch {
                expected: snapshot.player_count,
                actual: self.players.len(),
            });
        }
        if snapshot.layers != self.board.layers() {
            return Err(SnapshotError::LayerMismatch {
                expected: snapshot.layers,
                actual: self.board.layers(),
            });
        }

        self.board.restore_occupancy(
            &snapshot.corner_pieces,
            &snapshot.edge_pieces,
            snapshot.robber,
        );
        self.players = snapshot.players.clone();
        self.dev_card_deck = snapshot.dev_card_deck.clone();
        self.phase = snapshot.phase.clone();
        self.current_player = snapshot.current_player;
        self.turn_number = snapshot.turn_number;
        self.last_roll = snapshot.last_roll;
        self.roll_history = snapshot.roll_history.clone();
        self.action_log.truncate(snapshot.action_log_len);
        self.dev_card_played_this_turn = snapshot.dev_card_played_this_turn;
        self.setup_settlement = snapshot.setup_settlement;
        self.rng = snapshot.rng.clone();
        Ok(())
    }
}

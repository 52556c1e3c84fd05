//! The game state machine: phases, legal-action enumeration, and the
//! apply loop.
//!
//! All randomness flows through a single seedable RNG owned by the state,
//! so a seed fully determines terrain, dice, and steals. Search agents
//! that want reproducible rollouts pass explicit roll values instead.

use crate::actions::{ActionRecord, GameAction, GameEvent, TradeOffer};
use crate::board::{Board, PlayerId, Resource};
use crate::grid::CornerCoord;
use crate::player::{DevelopmentCard, Player, ResourceHand};
use crate::rules;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Victory points needed to win
pub const VICTORY_POINTS_TO_WIN: u32 = 10;

/// Holding more than this many cards when a 7 is rolled forces a discard
pub const DISCARD_THRESHOLD: u32 = 7;

/// Minimum chain length for the Longest Road award
pub const MIN_LONGEST_ROAD: u32 = 5;

/// Minimum played knights for the Largest Army award
pub const MIN_LARGEST_ARMY: u32 = 3;

/// Game phase. Exactly one is active at a time; every action either keeps
/// the phase or moves to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial snake-order placement
    Setup { round: u8, placing: SetupPlacing },

    /// Start of a turn, before the dice
    AwaitingRoll,

    /// A 7 was rolled; listed players still owe cards
    Discarding { remaining: Vec<PlayerId> },

    /// The robber must be moved
    MovingRobber,

    /// Robber placed; the mover picks a victim
    Stealing {
        tile: crate::grid::TileCoord,
        victims: Vec<PlayerId>,
    },

    /// A player trade is on the table
    TradeOffered { offer: TradeOffer },

    /// Road building card in progress; roads still owed
    RoadBuilding { remaining: u8 },

    /// Build, trade, play cards, or end the turn
    Main,

    /// Game over
    Finished { winner: PlayerId },
}

/// What the setup phase is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPlacing {
    Settlement,
    Road,
}

/// Expected rules rejections. Applying an action that fails any check
/// returns one of these and leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("not your turn")]
    NotYourTurn,

    #[error("action not valid in the current phase")]
    InvalidPhase,

    #[error("invalid placement location")]
    InvalidLocation,

    #[error("cannot afford this purchase")]
    CannotAfford,

    #[error("no pieces of that kind remaining")]
    CapacityExceeded,

    #[error("forced roll total {total} is outside 2-12")]
    InvalidRoll { total: u8 },

    #[error("development card deck is empty")]
    EmptyDeck,

    #[error("no playable card of that type in hand")]
    NoSuchCard,

    #[error("a development card was already played this turn")]
    CardAlreadyPlayed,

    #[error("invalid trade")]
    InvalidTrade,

    #[error("invalid discard")]
    InvalidDiscard,

    #[error("game is over")]
    GameOver,
}

/// The complete game state.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The board graph
    pub board: Board,
    /// All player ledgers, indexed by id
    pub players: Vec<Player>,
    pub(crate) current_player: PlayerId,
    pub(crate) phase: GamePhase,
    /// Completed-turn counter; setup is turn 0
    pub(crate) turn_number: u32,
    pub(crate) last_roll: Option<u8>,
    pub(crate) roll_history: Vec<u8>,
    pub(crate) dev_card_deck: Vec<DevelopmentCard>,
    pub(crate) action_log: Vec<ActionRecord>,
    pub(crate) dev_card_played_this_turn: bool,
    /// Settlement placed this setup turn; its road must touch it
    pub(crate) setup_settlement: Option<CornerCoord>,
    pub(crate) rng: StdRng,
    pub(crate) rng_seed: u64,
}

impl GameState {
    /// New game with a random seed.
    pub fn new(player_names: Vec<String>, layers: u32) -> Self {
        Self::with_seed(player_names, layers, rand::thread_rng().gen())
    }

    /// New game with everything derived from `seed`: board layout, dice,
    /// steals, and the starting player.
    pub fn with_seed(player_names: Vec<String>, layers: u32, seed: u64) -> Self {
        assert!(
            (2..=4).contains(&player_names.len()),
            "2-4 players required"
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::generate(layers, &mut rng);

        let players: Vec<Player> = player_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name))
            .collect();

        let mut dev_card_deck = DevelopmentCard::standard_deck();
        dev_card_deck.shuffle(&mut rng);

        let current_player = rng.gen_range(0..players.len() as PlayerId);

        Self {
            board,
            players,
            current_player,
            phase: GamePhase::Setup {
                round: 1,
                placing: SetupPlacing::Settlement,
            },
            turn_number: 0,
            last_roll: None,
            roll_history: Vec::new(),
            dev_card_deck,
            action_log: Vec::new(),
            dev_card_played_this_turn: false,
            setup_settlement: None,
            rng,
            rng_seed: seed,
        }
    }

    // ==================== Accessors ====================

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id as usize]
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    /// Every dice total resolved so far, oldest first.
    pub fn roll_history(&self) -> &[u8] {
        &self.roll_history
    }

    pub fn deck_remaining(&self) -> usize {
        self.dev_card_deck.len()
    }

    pub fn action_log(&self) -> &[ActionRecord] {
        &self.action_log
    }

    pub fn dev_card_played_this_turn(&self) -> bool {
        self.dev_card_played_this_turn
    }

    pub(crate) fn setup_settlement(&self) -> Option<CornerCoord> {
        self.setup_settlement
    }

    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Total victory points: board pieces plus ledger bonuses (awards and
    /// banked VP cards). Derived, never stored.
    pub fn total_victory_points(&self, id: PlayerId) -> u32 {
        let Some(player) = self.player(id) else {
            return 0;
        };
        let building_vp: u32 = self
            .board
            .corners_of(id)
            .iter()
            .map(|(_, piece)| piece.victory_points())
            .sum();
        building_vp + player.bonus_victory_points()
    }

    /// Read-only JSON-friendly projection of the whole game.
    pub fn view(&self) -> GameView {
        GameView {
            board: self.board.view(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    color: p.color,
                    resource_count: p.resources.total(),
                    dev_card_count: p.dev_cards.len() as u32,
                    played_knights: p.played_knights,
                    has_longest_road: p.has_longest_road,
                    has_largest_army: p.has_largest_army,
                    victory_points: self.total_victory_points(p.id),
                })
                .collect(),
            current_player: self.current_player,
            phase: self.phase.clone(),
            turn_number: self.turn_number,
            last_roll: self.last_roll,
        }
    }

    // ==================== Legal Actions ====================

    /// Every action `player` could legally submit right now. Applying any
    /// returned action succeeds; applying anything else fails.
    pub fn valid_actions(&self, player: PlayerId) -> Vec<GameAction> {
        let mut actions = Vec::new();

        match &self.phase {
            GamePhase::Finished { .. } => {}

            GamePhase::Setup { placing, .. } => {
                if player != self.current_player {
                    return actions;
                }
                match placing {
                    SetupPlacing::Settlement => {
                        for corner in self.board.settlement_spots(player, true) {
                            actions.push(GameAction::PlaceInitialSettlement(corner));
                        }
                    }
                    SetupPlacing::Road => {
                        if let Some(settlement) = self.setup_settlement {
                            for edge in self.board.road_spots_at(&settlement) {
                                actions.push(GameAction::PlaceInitialRoad(edge));
                            }
                        }
                    }
                }
            }

            GamePhase::AwaitingRoll => {
                if player == self.current_player {
                    actions.push(GameAction::RollDice { forced: None });
                }
            }

            GamePhase::Discarding { remaining } => {
                if remaining.contains(&player) {
                    if let Some(p) = self.player(player) {
                        let required = p.resources.total() / 2;
                        for hand in discard_combinations(&p.resources, required) {
                            actions.push(GameAction::DiscardCards(hand));
                        }
                    }
                }
            }

            GamePhase::MovingRobber => {
                if player == self.current_player {
                    for tile in self.board.robber_targets() {
                        actions.push(GameAction::MoveRobber(tile));
                    }
                }
            }

            GamePhase::Stealing { victims, .. } => {
                if player == self.current_player {
                    for victim in victims {
                        actions.push(GameAction::StealFrom(*victim));
                    }
                }
            }

            GamePhase::TradeOffered { .. } => {
                if rules::check_respond_trade(self, player, true).is_ok() {
                    actions.push(GameAction::AcceptTrade);
                }
                if rules::check_respond_trade(self, player, false).is_ok() {
                    actions.push(GameAction::RejectTrade);
                }
                if rules::check_cancel_trade(self, player).is_ok() {
                    actions.push(GameAction::CancelTrade);
                }
            }

            GamePhase::RoadBuilding { .. } => {
                if player == self.current_player {
                    for edge in self.board.road_spots(player) {
                        if rules::check_build_road(self, player, &edge).is_ok() {
                            actions.push(GameAction::BuildRoad(edge));
                        }
                    }
                }
            }

            GamePhase::Main => {
                if player != self.current_player {
                    return actions;
                }

                actions.push(GameAction::EndTurn);

                for edge in self.board.road_spots(player) {
                    if rules::check_build_road(self, player, &edge).is_ok() {
                        actions.push(GameAction::BuildRoad(edge));
                    }
                }
                for corner in self.board.settlement_spots(player, false) {
                    if rules::check_build_settlement(self, player, &corner).is_ok() {
                        actions.push(GameAction::BuildSettlement(corner));
                    }
                }
                for corner in self.board.city_spots(player) {
                    if rules::check_build_city(self, player, &corner).is_ok() {
                        actions.push(GameAction::BuildCity(corner));
                    }
                }
                if rules::check_buy_dev_card(self, player).is_ok() {
                    actions.push(GameAction::BuyDevelopmentCard);
                }

                if rules::check_play_card(self, player, DevelopmentCard::Knight).is_ok() {
                    actions.push(GameAction::PlayKnight);
                }
                if rules::check_play_card(self, player, DevelopmentCard::RoadBuilding).is_ok() {
                    actions.push(GameAction::PlayRoadBuilding);
                }
                if rules::check_play_card(self, player, DevelopmentCard::YearOfPlenty).is_ok() {
                    for r1 in Resource::ALL {
                        for r2 in Resource::ALL {
                            actions.push(GameAction::PlayYearOfPlenty(r1, r2));
                        }
                    }
                }
                if rules::check_play_card(self, player, DevelopmentCard::Monopoly).is_ok() {
                    for r in Resource::ALL {
                        actions.push(GameAction::PlayMonopoly(r));
                    }
                }

                for give in Resource::ALL {
                    let give_count = rules::maritime_rate(self, player, give);
                    if self.players[player as usize].resources.get(give) >= give_count {
                        for receive in Resource::ALL {
                            if receive != give {
                                actions.push(GameAction::MaritimeTrade {
                                    give,
                                    give_count,
                                    receive,
                                });
                            }
                        }
                    }
                }
            }
        }

        actions
    }

    // ==================== Apply ====================

    /// Boolean convenience wrapper around [`apply_action`]; rejections
    /// have already been logged when this returns false.
    ///
    /// [`apply_action`]: GameState::apply_action
    pub fn apply(&mut self, player: PlayerId, action: GameAction) -> bool {
        self.apply_action(player, action).is_ok()
    }

    /// Apply one action. On success the events describing what happened
    /// are returned and the action lands in the log; on failure nothing
    /// changes.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            warn!(player, "action rejected, game is over");
            return Err(GameError::GameOver);
        }
        match self.dispatch(player, action.clone()) {
            Ok(events) => {
                debug!(player, ?action, "action applied");
                self.action_log.push(ActionRecord { player, action });
                Ok(events)
            }
            Err(err) => {
                warn!(player, ?action, %err, "action rejected");
                Err(err)
            }
        }
    }

    fn dispatch(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();

        match action {
            // ==================== Setup ====================
            GameAction::PlaceInitialSettlement(corner) => {
                rules::check_setup_settlement(self, player, &corner)?;

                self.board.build_settlement(corner, player);
                self.player_mut(player).settlements_remaining -= 1;
                self.setup_settlement = Some(corner);

                events.push(GameEvent::SettlementBuilt {
                    player,
                    location: corner,
                });

                // Round 2 settlements come with their starting resources.
                if matches!(self.phase, GamePhase::Setup { round: 2, .. }) {
                    let starting: Vec<Resource> = self
                        .board
                        .tiles_at_corner(&corner)
                        .iter()
                        .filter_map(|tile| tile.resource())
                        .collect();
                    let mut distributions = Vec::new();
                    for resource in starting {
                        self.player_mut(player).resources.add(resource, 1);
                        distributions.push((player, resource, 1));
                    }
                    if !distributions.is_empty() {
                        events.push(GameEvent::ResourcesDistributed { distributions });
                    }
                }

                let round = match self.phase {
                    GamePhase::Setup { round, .. } => round,
                    _ => 1,
                };
                self.phase = GamePhase::Setup {
                    round,
                    placing: SetupPlacing::Road,
                };
            }

            GameAction::PlaceInitialRoad(edge) => {
                rules::check_setup_road(self, player, &edge)?;

                self.board.build_road(edge, player);
                self.player_mut(player).roads_remaining -= 1;
                self.setup_settlement = None;

                events.push(GameEvent::RoadBuilt {
                    player,
                    location: edge,
                });

                self.advance_setup();
            }

            // ==================== Dice ====================
            GameAction::RollDice { forced } => {
                rules::check_roll(self, player, forced)?;

                let total = match forced {
                    Some(total) => total,
                    None => self.rng.gen_range(1..=6) + self.rng.gen_range(1..=6),
                };
                self.last_roll = Some(total);
                self.roll_history.push(total);

                events.push(GameEvent::DiceRolled { player, total });

                if total == 7 {
                    let must_discard: Vec<PlayerId> = self
                        .players
                        .iter()
                        .filter(|p| p.resources.total() > DISCARD_THRESHOLD)
                        .map(|p| p.id)
                        .collect();
                    self.phase = if must_discard.is_empty() {
                        GamePhase::MovingRobber
                    } else {
                        GamePhase::Discarding {
                            remaining: must_discard,
                        }
                    };
                } else {
                    let production = self.board.production_for_roll(total);
                    let mut distributions = Vec::new();
                    for (pid, resources) in production {
                        for (resource, amount) in resources {
                            self.player_mut(pid).resources.add(resource, amount);
                            distributions.push((pid, resource, amount));
                        }
                    }
                    if !distributions.is_empty() {
                        events.push(GameEvent::ResourcesDistributed { distributions });
                    }
                    self.phase = GamePhase::Main;
                }
            }

            // ==================== Discard ====================
            GameAction::DiscardCards(cards) => {
                let count = rules::check_discard(self, player, &cards)?;

                self.player_mut(player).resources.subtract(&cards);
                events.push(GameEvent::CardsDiscarded { player, count });

                if let GamePhase::Discarding { ref mut remaining } = self.phase {
                    remaining.retain(|&p| p != player);
                    if remaining.is_empty() {
                        self.phase = GamePhase::MovingRobber;
                    }
                }
            }

            // ==================== Robber ====================
            GameAction::MoveRobber(tile) => {
                rules::check_move_robber(self, player, &tile)?;

                let from = self.board.robber();
                self.board.move_robber(tile);

                events.push(GameEvent::RobberMoved {
                    player,
                    from,
                    to: tile,
                });

                let mut victims: Vec<PlayerId> = self
                    .board
                    .players_at_tile(&tile)
                    .into_iter()
                    .filter(|&p| p != player && self.players[p as usize].resources.total() > 0)
                    .collect();
                victims.sort_unstable();

                self.phase = if victims.is_empty() {
                    GamePhase::Main
                } else {
                    GamePhase::Stealing { tile, victims }
                };
            }

            GameAction::StealFrom(victim) => {
                rules::check_steal(self, player, victim)?;

                events.push(self.steal_one_card(player, victim));
                self.phase = GamePhase::Main;
            }

            // ==================== Building ====================
            GameAction::BuildRoad(edge) => {
                rules::check_build_road(self, player, &edge)?;

                let free = matches!(self.phase, GamePhase::RoadBuilding { .. });
                let p = self.player_mut(player);
                if free {
                    p.roads_remaining -= 1;
                } else {
                    p.buy_road();
                }
                self.board.build_road(edge, player);

                events.push(GameEvent::RoadBuilt {
                    player,
                    location: edge,
                });
                events.extend(self.update_longest_road());

                if let GamePhase::RoadBuilding { ref mut remaining } = self.phase {
                    *remaining -= 1;
                    let owed = *remaining;
                    if owed == 0 || !self.can_place_free_road(player) {
                        self.phase = GamePhase::Main;
                    }
                }

                events.extend(self.check_win());
            }

            GameAction::BuildSettlement(corner) => {
                rules::check_build_settlement(self, player, &corner)?;

                self.player_mut(player).buy_settlement();
                self.board.build_settlement(corner, player);

                events.push(GameEvent::SettlementBuilt {
                    player,
                    location: corner,
                });
                // A new junction can cut an opposing chain.
                events.extend(self.update_longest_road());
                events.extend(self.check_win());
            }

            GameAction::BuildCity(corner) => {
                rules::check_build_city(self, player, &corner)?;

                self.player_mut(player).buy_city();
                self.board.build_city(corner, player);

                events.push(GameEvent::CityBuilt {
                    player,
                    location: corner,
                });
                events.extend(self.check_win());
            }

            GameAction::BuyDevelopmentCard => {
                rules::check_buy_dev_card(self, player)?;

                let card = self.dev_card_deck.pop().ok_or(GameError::EmptyDeck)?;
                let turn = self.turn_number;
                self.player_mut(player).buy_dev_card(card, turn);

                events.push(GameEvent::DevelopmentCardPurchased { player });
                events.extend(self.check_win());
            }

            // ==================== Development Cards ====================
            GameAction::PlayKnight => {
                rules::check_play_card(self, player, DevelopmentCard::Knight)?;

                let turn = self.turn_number;
                self.player_mut(player)
                    .play_dev_card(DevelopmentCard::Knight, turn);
                self.dev_card_played_this_turn = true;

                events.push(GameEvent::KnightPlayed { player });
                events.extend(self.update_largest_army());
                events.extend(self.check_win());

                if !self.is_finished() {
                    self.phase = GamePhase::MovingRobber;
                }
            }

            GameAction::PlayRoadBuilding => {
                rules::check_play_card(self, player, DevelopmentCard::RoadBuilding)?;

                let turn = self.turn_number;
                self.player_mut(player)
                    .play_dev_card(DevelopmentCard::RoadBuilding, turn);
                self.dev_card_played_this_turn = true;

                events.push(GameEvent::RoadBuildingPlayed { player });
                // A player with nowhere to place must not be stranded in
                // a phase only a road placement can leave.
                self.phase = if self.can_place_free_road(player) {
                    GamePhase::RoadBuilding { remaining: 2 }
                } else {
                    GamePhase::Main
                };
            }

            GameAction::PlayYearOfPlenty(r1, r2) => {
                rules::check_play_card(self, player, DevelopmentCard::YearOfPlenty)?;

                let turn = self.turn_number;
                let p = self.player_mut(player);
                p.play_dev_card(DevelopmentCard::YearOfPlenty, turn);
                p.resources.add(r1, 1);
                p.resources.add(r2, 1);
                self.dev_card_played_this_turn = true;

                events.push(GameEvent::YearOfPlentyPlayed {
                    player,
                    resources: (r1, r2),
                });
            }

            GameAction::PlayMonopoly(resource) => {
                rules::check_play_card(self, player, DevelopmentCard::Monopoly)?;

                let turn = self.turn_number;
                self.player_mut(player)
                    .play_dev_card(DevelopmentCard::Monopoly, turn);
                self.dev_card_played_this_turn = true;

                let mut total_taken = 0;
                for other in &mut self.players {
                    if other.id != player {
                        total_taken += other.resources.get(resource);
                        other.resources.set(resource, 0);
                    }
                }
                self.player_mut(player).resources.add(resource, total_taken);

                events.push(GameEvent::MonopolyPlayed {
                    player,
                    resource,
                    total_taken,
                });
            }

            // ==================== Trading ====================
            GameAction::ProposeTrade(offer) => {
                rules::check_propose_trade(self, player, &offer)?;

                self.phase = GamePhase::TradeOffered {
                    offer: offer.clone(),
                };
                events.push(GameEvent::TradeProposed { offer });
            }

            GameAction::AcceptTrade => {
                rules::check_respond_trade(self, player, true)?;

                let GamePhase::TradeOffered { offer } = self.phase.clone() else {
                    return Err(GameError::InvalidPhase);
                };

                self.player_mut(offer.from).resources.subtract(&offer.offering);
                self.player_mut(offer.from).resources.add_hand(&offer.requesting);
                self.player_mut(player).resources.subtract(&offer.requesting);
                self.player_mut(player).resources.add_hand(&offer.offering);

                self.phase = GamePhase::Main;
                events.push(GameEvent::TradeCompleted {
                    player1: offer.from,
                    player2: player,
                });
            }

            GameAction::RejectTrade => {
                rules::check_respond_trade(self, player, false)?;

                // A targeted offer dies with its addressee's rejection; an
                // open offer stands until accepted or cancelled.
                if let GamePhase::TradeOffered { offer } = &self.phase {
                    if offer.to == Some(player) {
                        self.phase = GamePhase::Main;
                        events.push(GameEvent::TradeCancelled);
                    }
                }
            }

            GameAction::CancelTrade => {
                rules::check_cancel_trade(self, player)?;

                self.phase = GamePhase::Main;
                events.push(GameEvent::TradeCancelled);
            }

            GameAction::MaritimeTrade {
                give,
                give_count,
                receive,
            } => {
                rules::check_maritime_trade(self, player, give, give_count, receive)?;

                let p = self.player_mut(player);
                p.resources.set(give, p.resources.get(give) - give_count);
                p.resources.add(receive, 1);

                events.push(GameEvent::MaritimeTradeCompleted {
                    player,
                    gave: give,
                    gave_count: give_count,
                    received: receive,
                });
            }

            // ==================== Turn Management ====================
            GameAction::EndTurn => {
                rules::check_end_turn(self, player)?;

                let next_player = (self.current_player + 1) % self.player_count() as PlayerId;
                self.current_player = next_player;
                self.turn_number += 1;
                self.last_roll = None;
                self.dev_card_played_this_turn = false;
                self.phase = GamePhase::AwaitingRoll;

                events.push(GameEvent::TurnEnded {
                    player,
                    next_player,
                });
            }
        }

        Ok(events)
    }

    // ==================== Helpers ====================

    /// Snake order: forward through the players in round 1, then the last
    /// placer goes again and order reverses for round 2.
    fn advance_setup(&mut self) {
        let GamePhase::Setup { round, .. } = self.phase else {
            return;
        };
        let count = self.player_count() as u32;
        let placements: u32 = self
            .players
            .iter()
            .map(|p| crate::player::SETTLEMENT_STOCK - p.settlements_remaining)
            .sum();

        if placements >= count * 2 {
            // Setup complete; play begins with the current (first) player.
            self.phase = GamePhase::AwaitingRoll;
            self.turn_number = 1;
        } else if round == 1 && placements >= count {
            self.phase = GamePhase::Setup {
                round: 2,
                placing: SetupPlacing::Settlement,
            };
        } else if round == 1 {
            self.current_player = (self.current_player + 1) % count as PlayerId;
            self.phase = GamePhase::Setup {
                round: 1,
                placing: SetupPlacing::Settlement,
            };
        } else {
            self.current_player = if self.current_player == 0 {
                count as PlayerId - 1
            } else {
                self.current_player - 1
            };
            self.phase = GamePhase::Setup {
                round: 2,
                placing: SetupPlacing::Settlement,
            };
        }
    }

    /// Whether a free road placement is still possible for `player`.
    fn can_place_free_road(&self, player: PlayerId) -> bool {
        self.players[player as usize].roads_remaining > 0
            && !self.board.road_spots(player).is_empty()
    }

    fn steal_one_card(&mut self, thief: PlayerId, victim: PlayerId) -> GameEvent {
        let stolen = self.players[victim as usize]
            .resources
            .steal_random(&mut self.rng);
        if let Some(resource) = stolen {
            self.player_mut(thief).resources.add(resource, 1);
        }
        GameEvent::ResourceStolen {
            thief,
            victim,
            resource: stolen,
        }
    }

    /// Recompute the Longest Road holder. The award needs at least
    /// [`MIN_LONGEST_ROAD`] segments; a tie leaves it with its holder.
    fn update_longest_road(&mut self) -> Vec<GameEvent> {
        let mut best_length = 0;
        let mut leaders: Vec<PlayerId> = Vec::new();
        for player in &self.players {
            let length = self.board.longest_road(player.id);
            if length >= MIN_LONGEST_ROAD {
                if length > best_length {
                    best_length = length;
                    leaders = vec![player.id];
                } else if length == best_length {
                    leaders.push(player.id);
                }
            }
        }

        let holder = self
            .players
            .iter()
            .find(|p| p.has_longest_road)
            .map(|p| p.id);
        let new_holder = match (&leaders[..], holder) {
            ([single], _) => Some(*single),
            (several, Some(h)) if several.contains(&h) => Some(h),
            _ => None,
        };

        if new_holder == holder {
            return Vec::new();
        }
        for player in &mut self.players {
            player.has_longest_road = Some(player.id) == new_holder;
        }
        vec![GameEvent::LongestRoadChanged {
            previous: holder,
            current: new_holder,
            length: best_length,
        }]
    }

    /// Recompute the Largest Army holder; only a strictly larger army at
    /// [`MIN_LARGEST_ARMY`] or above takes the award.
    fn update_largest_army(&mut self) -> Vec<GameEvent> {
        let mut most_knights = 0;
        let mut leader: Option<PlayerId> = None;
        for player in &self.players {
            if player.played_knights >= MIN_LARGEST_ARMY && player.played_knights > most_knights {
                most_knights = player.played_knights;
                leader = Some(player.id);
            }
        }

        let holder = self
            .players
            .iter()
            .find(|p| p.has_largest_army)
            .map(|p| p.id);
        if leader.is_none() || leader == holder {
            return Vec::new();
        }
        let holder_knights = holder
            .map(|h| self.players[h as usize].played_knights)
            .unwrap_or(0);
        let leader_knights = leader
            .map(|l| self.players[l as usize].played_knights)
            .unwrap_or(0);
        if leader_knights <= holder_knights {
            return Vec::new();
        }
        for player in &mut self.players {
            player.has_largest_army = Some(player.id) == leader;
        }
        vec![GameEvent::LargestArmyChanged {
            previous: holder,
            current: leader,
            knights: most_knights,
        }]
    }

    fn check_win(&mut self) -> Vec<GameEvent> {
        for player in 0..self.player_count() as PlayerId {
            let vp = self.total_victory_points(player);
            if vp >= VICTORY_POINTS_TO_WIN {
                self.phase = GamePhase::Finished { winner: player };
                return vec![GameEvent::GameWon {
                    player,
                    victory_points: vp,
                }];
            }
        }
        Vec::new()
    }
}

/// Every distinct multiset of `count` cards drawable from `hand`.
fn discard_combinations(hand: &ResourceHand, count: u32) -> Vec<ResourceHand> {
    let mut out = Vec::new();
    let mut current = ResourceHand::new();
    pick_resource(hand, count, 0, &mut current, &mut out);
    out
}

fn pick_resource(
    hand: &ResourceHand,
    still_needed: u32,
    index: usize,
    current: &mut ResourceHand,
    out: &mut Vec<ResourceHand>,
) {
    if still_needed == 0 {
        out.push(*current);
        return;
    }
    if index >= Resource::ALL.len() {
        return;
    }
    let resource = Resource::ALL[index];
    let available = hand.get(resource).min(still_needed);
    for take in (0..=available).rev() {
        current.set(resource, take);
        pick_resource(hand, still_needed - take, index + 1, current, out);
    }
    current.set(resource, 0);
}

/// Read-only game projection with hidden information reduced to counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub board: crate::board::BoardView,
    pub players: Vec<PlayerView>,
    pub current_player: PlayerId,
    pub phase: GamePhase,
    pub turn_number: u32,
    pub last_roll: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub color: crate::player::PlayerColor,
    pub resource_count: u32,
    pub dev_card_count: u32,
    pub played_knights: u32,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
    pub victory_points: u32,
}

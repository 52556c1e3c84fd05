//! Pure legality predicates over an immutable [`GameState`].
//!
//! Both legal-action enumeration and action application go through these
//! checks, so the two can never disagree about what is allowed. Every
//! function leaves the state untouched and reports the first violated
//! rule. Check order: phase, acting player, piece capacity, affordability,
//! board placement.

use crate::actions::TradeOffer;
use crate::board::{PlayerId, PortKind, Resource};
use crate::game::{GameError, GamePhase, GameState, SetupPlacing};
use crate::grid::{CornerCoord, EdgeCoord, TileCoord};
use crate::player::{DevelopmentCard, Player, ResourceHand};

fn require_current(state: &GameState, player: PlayerId) -> Result<(), GameError> {
    if player != state.current_player() {
        return Err(GameError::NotYourTurn);
    }
    Ok(())
}

fn require_player(state: &GameState, player: PlayerId) -> Result<&Player, GameError> {
    state.player(player).ok_or(GameError::NotYourTurn)
}

pub fn check_setup_settlement(
    state: &GameState,
    player: PlayerId,
    corner: &CornerCoord,
) -> Result<(), GameError> {
    if !matches!(
        state.phase(),
        GamePhase::Setup {
            placing: SetupPlacing::Settlement,
            ..
        }
    ) {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;

    if state.board.corner_piece(corner).owner().is_some()
        || !state.board.contains_corner(corner)
        || !state.board.satisfies_distance_rule(corner)
    {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

/// The pre-game road must touch the settlement placed this same turn.
pub fn check_setup_road(
    state: &GameState,
    player: PlayerId,
    edge: &EdgeCoord,
) -> Result<(), GameError> {
    if !matches!(
        state.phase(),
        GamePhase::Setup {
            placing: SetupPlacing::Road,
            ..
        }
    ) {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;

    let settlement = state.setup_settlement().ok_or(GameError::InvalidPhase)?;
    if !settlement.touching_edges().contains(edge)
        || !state.board.contains_edge(edge)
        || state.board.edge_piece(edge).owner().is_some()
    {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

pub fn check_roll(state: &GameState, player: PlayerId, forced: Option<u8>) -> Result<(), GameError> {
    if state.phase() != &GamePhase::AwaitingRoll {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;
    if let Some(total) = forced {
        if !(2..=12).contains(&total) {
            return Err(GameError::InvalidRoll { total });
        }
    }
    Ok(())
}

/// Validates a discard and returns the required card count.
pub fn check_discard(
    state: &GameState,
    player: PlayerId,
    cards: &ResourceHand,
) -> Result<u32, GameError> {
    let GamePhase::Discarding { remaining } = state.phase() else {
        return Err(GameError::InvalidPhase);
    };
    if !remaining.contains(&player) {
        return Err(GameError::NotYourTurn);
    }
    let p = require_player(state, player)?;
    let required = p.resources.total() / 2;
    if cards.total() != required || !p.resources.can_afford(cards) {
        return Err(GameError::InvalidDiscard);
    }
    Ok(required)
}

pub fn check_move_robber(
    state: &GameState,
    player: PlayerId,
    tile: &TileCoord,
) -> Result<(), GameError> {
    if state.phase() != &GamePhase::MovingRobber {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;
    if state.board.tile(tile).is_none() || *tile == state.board.robber() {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

pub fn check_steal(
    state: &GameState,
    player: PlayerId,
    victim: PlayerId,
) -> Result<(), GameError> {
    let GamePhase::Stealing { victims, .. } = state.phase() else {
        return Err(GameError::InvalidPhase);
    };
    require_current(state, player)?;
    if !victims.contains(&victim) {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

pub fn check_build_road(
    state: &GameState,
    player: PlayerId,
    edge: &EdgeCoord,
) -> Result<(), GameError> {
    let free = matches!(state.phase(), GamePhase::RoadBuilding { .. });
    if !free && state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;

    let p = require_player(state, player)?;
    if p.roads_remaining == 0 {
        return Err(GameError::CapacityExceeded);
    }
    if !free && !p.can_afford_road() {
        return Err(GameError::CannotAfford);
    }
    if state.board.edge_piece(edge).owner().is_some()
        || !state.board.contains_edge(edge)
        || !state.board.connects_to_network(edge, player)
    {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

pub fn check_build_settlement(
    state: &GameState,
    player: PlayerId,
    corner: &CornerCoord,
) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;

    let p = require_player(state, player)?;
    if p.settlements_remaining == 0 {
        return Err(GameError::CapacityExceeded);
    }
    if !p.can_afford_settlement() {
        return Err(GameError::CannotAfford);
    }
    if !state.board.settlement_spots(player, false).contains(corner) {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

pub fn check_build_city(
    state: &GameState,
    player: PlayerId,
    corner: &CornerCoord,
) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;

    let p = require_player(state, player)?;
    if p.cities_remaining == 0 {
        return Err(GameError::CapacityExceeded);
    }
    if !p.can_afford_city() {
        return Err(GameError::CannotAfford);
    }
    if !state.board.city_spots(player).contains(corner) {
        return Err(GameError::InvalidLocation);
    }
    Ok(())
}

pub fn check_buy_dev_card(state: &GameState, player: PlayerId) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;

    let p = require_player(state, player)?;
    if !p.can_afford_dev_card() {
        return Err(GameError::CannotAfford);
    }
    if state.deck_remaining() == 0 {
        return Err(GameError::EmptyDeck);
    }
    Ok(())
}

/// One development card per turn, only in the main phase, never on the
/// turn it was bought.
pub fn check_play_card(
    state: &GameState,
    player: PlayerId,
    card: DevelopmentCard,
) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;
    if state.dev_card_played_this_turn() {
        return Err(GameError::CardAlreadyPlayed);
    }

    let p = require_player(state, player)?;
    if card == DevelopmentCard::RoadBuilding && p.roads_remaining < 2 {
        return Err(GameError::CapacityExceeded);
    }
    if !p.has_playable_dev_card(card, state.turn_number()) {
        return Err(GameError::NoSuchCard);
    }
    Ok(())
}

pub fn check_propose_trade(
    state: &GameState,
    player: PlayerId,
    offer: &TradeOffer,
) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;
    if !offer.is_valid() || offer.from != player {
        return Err(GameError::InvalidTrade);
    }
    if let Some(to) = offer.to {
        if to == player || state.player(to).is_none() {
            return Err(GameError::InvalidTrade);
        }
    }
    let p = require_player(state, player)?;
    if !p.resources.can_afford(&offer.offering) {
        return Err(GameError::CannotAfford);
    }
    Ok(())
}

/// A non-proposer may accept or reject an open offer, or one addressed to
/// them. Accepting additionally requires the requested resources in hand.
pub fn check_respond_trade(
    state: &GameState,
    player: PlayerId,
    accepting: bool,
) -> Result<(), GameError> {
    let GamePhase::TradeOffered { offer } = state.phase() else {
        return Err(GameError::InvalidPhase);
    };
    if player == offer.from || (offer.to.is_some() && offer.to != Some(player)) {
        return Err(GameError::NotYourTurn);
    }
    if accepting {
        let p = require_player(state, player)?;
        if !p.resources.can_afford(&offer.requesting) {
            return Err(GameError::CannotAfford);
        }
    }
    Ok(())
}

pub fn check_cancel_trade(state: &GameState, player: PlayerId) -> Result<(), GameError> {
    let GamePhase::TradeOffered { offer } = state.phase() else {
        return Err(GameError::InvalidPhase);
    };
    if player != offer.from {
        return Err(GameError::NotYourTurn);
    }
    Ok(())
}

/// Best exchange rate the player can reach for a resource: 2 with the
/// matching port, 3 with an "any" port, 4 against the bank.
pub fn maritime_rate(state: &GameState, player: PlayerId, resource: Resource) -> u32 {
    let mut rate = 4;
    for (corner, _) in state.board.corners_of(player) {
        if let Some(port) = state.board.port_at(&corner) {
            let port_rate = match port.kind {
                PortKind::Resource(r) if r == resource => 2,
                PortKind::Resource(_) => continue,
                PortKind::Any => 3,
            };
            rate = rate.min(port_rate);
        }
    }
    rate
}

pub fn check_maritime_trade(
    state: &GameState,
    player: PlayerId,
    give: Resource,
    give_count: u32,
    receive: Resource,
) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)?;
    if give == receive || give_count != maritime_rate(state, player, give) {
        return Err(GameError::InvalidTrade);
    }
    let p = require_player(state, player)?;
    if p.resources.get(give) < give_count {
        return Err(GameError::CannotAfford);
    }
    Ok(())
}

pub fn check_end_turn(state: &GameState, player: PlayerId) -> Result<(), GameError> {
    if state.phase() != &GamePhase::Main {
        return Err(GameError::InvalidPhase);
    }
    require_current(state, player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    fn fresh() -> GameState {
        GameState::with_seed(vec!["A".into(), "B".into()], 2, 11)
    }

    #[test]
    fn roll_rejected_during_setup() {
        let game = fresh();
        let current = game.current_player();
        assert!(matches!(
            check_roll(&game, current, None),
            Err(GameError::InvalidPhase)
        ));
    }

    fn past_setup(mut game: GameState) -> GameState {
        while matches!(game.phase(), GamePhase::Setup { .. }) {
            let player = game.current_player();
            let action = game.valid_actions(player).into_iter().next().unwrap();
            game.apply_action(player, action).unwrap();
        }
        game
    }

    #[test]
    fn forced_roll_out_of_range_is_rejected() {
        let game = past_setup(fresh());
        let current = game.current_player();
        assert!(matches!(
            check_roll(&game, current, Some(13)),
            Err(GameError::InvalidRoll { total: 13 })
        ));
        assert!(check_roll(&game, current, Some(12)).is_ok());
    }

    #[test]
    fn only_current_player_may_place() {
        let game = fresh();
        let other = (game.current_player() + 1) % 2;
        let corner = game.board.settlement_spots(other, true)[0];
        assert!(matches!(
            check_setup_settlement(&game, other, &corner),
            Err(GameError::NotYourTurn)
        ));
    }

    #[test]
    fn bank_rate_without_ports_is_four() {
        let game = fresh();
        assert_eq!(maritime_rate(&game, 0, Resource::Wheat), 4);
    }
}

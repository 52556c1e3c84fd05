//! Actions a player can submit and the events the engine emits when an
//! action is applied.

use crate::board::{PlayerId, Resource};
use crate::grid::{CornerCoord, EdgeCoord, TileCoord};
use crate::player::ResourceHand;
use serde::{Deserialize, Serialize};

/// All possible actions a player can submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Setup Phase ====================
    /// Place an initial settlement during setup
    PlaceInitialSettlement(CornerCoord),
    /// Place an initial road (must touch the settlement just placed)
    PlaceInitialRoad(EdgeCoord),

    // ==================== Turn Start ====================
    /// Roll the dice. `forced` substitutes a fixed total (2-12) for the
    /// random roll; resolution is identical either way.
    RollDice { forced: Option<u8> },

    // ==================== Robber ====================
    /// Move the robber to a new tile (after a 7 or a knight)
    MoveRobber(TileCoord),
    /// Choose a victim to steal one random card from
    StealFrom(PlayerId),
    /// Surrender cards when holding more than 7 after a 7 is rolled
    DiscardCards(ResourceHand),

    // ==================== Building ====================
    /// Build a road on an edge
    BuildRoad(EdgeCoord),
    /// Build a settlement on a corner
    BuildSettlement(CornerCoord),
    /// Upgrade a settlement to a city
    BuildCity(CornerCoord),
    /// Buy a development card from the deck
    BuyDevelopmentCard,

    // ==================== Development Cards ====================
    /// Play a knight (move robber, steal, counts toward largest army)
    PlayKnight,
    /// Play road building (2 free roads)
    PlayRoadBuilding,
    /// Play year of plenty (take 2 resources from the bank)
    PlayYearOfPlenty(Resource, Resource),
    /// Play monopoly (take all of one resource from all players)
    PlayMonopoly(Resource),

    // ==================== Trading ====================
    /// Propose a trade to other players
    ProposeTrade(TradeOffer),
    /// Accept the open trade offer
    AcceptTrade,
    /// Reject the open trade offer
    RejectTrade,
    /// Cancel your own trade offer
    CancelTrade,
    /// Trade with the bank (4:1) or through a port (3:1 or 2:1)
    MaritimeTrade {
        give: Resource,
        give_count: u32,
        receive: Resource,
    },

    // ==================== Turn Management ====================
    /// End your turn
    EndTurn,
}

/// A trade offer between players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Player making the offer
    pub from: PlayerId,
    /// Specific counterparty, or None for an open offer
    pub to: Option<PlayerId>,
    /// Resources being offered
    pub offering: ResourceHand,
    /// Resources being requested
    pub requesting: ResourceHand,
}

impl TradeOffer {
    pub fn new(
        from: PlayerId,
        to: Option<PlayerId>,
        offering: ResourceHand,
        requesting: ResourceHand,
    ) -> Self {
        Self {
            from,
            to,
            offering,
            requesting,
        }
    }

    /// Non-empty on both sides.
    pub fn is_valid(&self) -> bool {
        !self.offering.is_empty() && !self.requesting.is_empty()
    }
}

/// One accepted action, as appended to the game's action log. The log is
/// the raw material for replay and logging collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: GameAction,
}

/// Events emitted when an action is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled (or a forced total was resolved)
    DiceRolled { player: PlayerId, total: u8 },

    /// Resources were distributed after a dice roll
    ResourcesDistributed {
        distributions: Vec<(PlayerId, Resource, u32)>,
    },

    /// A settlement was built
    SettlementBuilt {
        player: PlayerId,
        location: CornerCoord,
    },

    /// A settlement was upgraded to a city
    CityBuilt {
        player: PlayerId,
        location: CornerCoord,
    },

    /// A road was built
    RoadBuilt {
        player: PlayerId,
        location: EdgeCoord,
    },

    /// A development card was purchased (card identity stays hidden)
    DevelopmentCardPurchased { player: PlayerId },

    /// A knight was played
    KnightPlayed { player: PlayerId },

    /// Road building card was played
    RoadBuildingPlayed { player: PlayerId },

    /// Year of plenty card was played
    YearOfPlentyPlayed {
        player: PlayerId,
        resources: (Resource, Resource),
    },

    /// Monopoly card was played
    MonopolyPlayed {
        player: PlayerId,
        resource: Resource,
        total_taken: u32,
    },

    /// The robber was moved
    RobberMoved {
        player: PlayerId,
        from: TileCoord,
        to: TileCoord,
    },

    /// A resource was stolen
    ResourceStolen {
        thief: PlayerId,
        victim: PlayerId,
        /// Hidden from other players
        resource: Option<Resource>,
    },

    /// A player surrendered cards to the bank
    CardsDiscarded { player: PlayerId, count: u32 },

    /// A trade was proposed
    TradeProposed { offer: TradeOffer },

    /// A trade was completed
    TradeCompleted { player1: PlayerId, player2: PlayerId },

    /// A trade was rejected or cancelled
    TradeCancelled,

    /// Maritime trade completed
    MaritimeTradeCompleted {
        player: PlayerId,
        gave: Resource,
        gave_count: u32,
        received: Resource,
    },

    /// Longest road changed hands
    LongestRoadChanged {
        previous: Option<PlayerId>,
        current: Option<PlayerId>,
        length: u32,
    },

    /// Largest army changed hands
    LargestArmyChanged {
        previous: Option<PlayerId>,
        current: Option<PlayerId>,
        knights: u32,
    },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// A player reached the victory threshold
    GameWon {
        player: PlayerId,
        victory_points: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_offer_validity() {
        let offer = TradeOffer::new(
            0,
            None,
            ResourceHand::single(Resource::Wheat, 1),
            ResourceHand::single(Resource::Ore, 1),
        );
        assert!(offer.is_valid());

        let empty_side = TradeOffer::new(
            0,
            Some(1),
            ResourceHand::new(),
            ResourceHand::single(Resource::Ore, 1),
        );
        assert!(!empty_side.is_valid());
    }

    #[test]
    fn actions_round_trip_through_json() {
        let actions = vec![
            GameAction::RollDice { forced: Some(8) },
            GameAction::MoveRobber(crate::grid::TileCoord::new(1, -1)),
            GameAction::PlayMonopoly(Resource::Brick),
            GameAction::EndTurn,
        ];
        let serialized = serde_json::to_string(&actions).unwrap();
        let decoded: Vec<GameAction> = serde_json::from_str(&serialized).unwrap();
        assert_eq!(actions, decoded);
    }
}

//! Per-player ledger: resource hand, development cards, piece stock, and
//! the victory points derived from all of it.

use crate::board::{PlayerId, Resource};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Starting road stock per player.
pub const ROAD_STOCK: u32 = 12;
/// Starting settlement stock per player.
pub const SETTLEMENT_STOCK: u32 = 5;
/// Starting city stock per player.
pub const CITY_STOCK: u32 = 4;

/// Player color for rendering collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Orange,
    White,
}

impl PlayerColor {
    pub fn for_player(id: PlayerId) -> Self {
        match id % 4 {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Orange,
            _ => PlayerColor::White,
        }
    }
}

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevelopmentCard {
    /// Move robber and steal, counts toward Largest Army
    Knight,
    /// Worth 1 VP, never "played"
    VictoryPoint,
    /// Build 2 roads for free
    RoadBuilding,
    /// Take any 2 resources from the bank
    YearOfPlenty,
    /// All players give you all of one resource type
    Monopoly,
}

impl DevelopmentCard {
    /// The standard 25-card deck: 14 knights, 5 VP, 2 of each progress
    /// card.
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        let mut deck = Vec::with_capacity(25);
        deck.extend(std::iter::repeat(DevelopmentCard::Knight).take(14));
        deck.extend(std::iter::repeat(DevelopmentCard::VictoryPoint).take(5));
        deck.extend(std::iter::repeat(DevelopmentCard::RoadBuilding).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::YearOfPlenty).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::Monopoly).take(2));
        deck
    }

    pub fn is_playable(&self) -> bool {
        !matches!(self, DevelopmentCard::VictoryPoint)
    }
}

/// A held development card. Cards cannot be played on the turn they were
/// bought, so the acquisition turn travels with the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldCard {
    pub card: DevelopmentCard,
    pub acquired_turn: u32,
}

/// A hand of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub wheat: u32,
    pub wood: u32,
    pub sheep: u32,
    pub ore: u32,
    pub brick: u32,
}

impl ResourceHand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amounts(wheat: u32, wood: u32, sheep: u32, ore: u32, brick: u32) -> Self {
        Self {
            wheat,
            wood,
            sheep,
            ore,
            brick,
        }
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.wheat + self.wood + self.sheep + self.ore + self.brick
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wheat => self.wheat,
            Resource::Wood => self.wood,
            Resource::Sheep => self.sheep,
            Resource::Ore => self.ore,
            Resource::Brick => self.brick,
        }
    }

    pub fn set(&mut self, resource: Resource, count: u32) {
        match resource {
            Resource::Wheat => self.wheat = count,
            Resource::Wood => self.wood = count,
            Resource::Sheep => self.sheep = count,
            Resource::Ore => self.ore = count,
            Resource::Brick => self.brick = count,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        self.set(resource, self.get(resource) + amount);
    }

    pub fn add_hand(&mut self, other: &ResourceHand) {
        self.wheat += other.wheat;
        self.wood += other.wood;
        self.sheep += other.sheep;
        self.ore += other.ore;
        self.brick += other.brick;
    }

    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        self.wheat >= cost.wheat
            && self.wood >= cost.wood
            && self.sheep >= cost.sheep
            && self.ore >= cost.ore
            && self.brick >= cost.brick
    }

    /// Subtract a cost. Callers check affordability first; spending is
    /// never attempted on a hand that cannot cover it.
    pub fn subtract(&mut self, cost: &ResourceHand) {
        debug_assert!(self.can_afford(cost));
        self.wheat -= cost.wheat;
        self.wood -= cost.wood;
        self.sheep -= cost.sheep;
        self.ore -= cost.ore;
        self.brick -= cost.brick;
    }

    /// Try to subtract, returning false (and leaving the hand untouched)
    /// if insufficient.
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.subtract(cost);
        true
    }

    /// Remove one uniformly random card (robber stealing).
    pub fn steal_random<R: Rng>(&mut self, rng: &mut R) -> Option<Resource> {
        if self.is_empty() {
            return None;
        }
        let mut available: Vec<Resource> = Vec::with_capacity(self.total() as usize);
        for resource in Resource::ALL {
            available.extend(std::iter::repeat(resource).take(self.get(resource) as usize));
        }
        let resource = *available.choose(rng)?;
        self.subtract(&ResourceHand::single(resource, 1));
        Some(resource)
    }

    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Convert to a map of the nonzero counts.
    pub fn to_map(&self) -> HashMap<Resource, u32> {
        Resource::ALL
            .into_iter()
            .filter(|r| self.get(*r) > 0)
            .map(|r| (r, self.get(r)))
            .collect()
    }
}

/// Fixed purchase costs.
pub mod costs {
    use super::ResourceHand;

    /// Road: 1 wood, 1 brick
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(0, 1, 0, 0, 1)
    }

    /// Settlement: 1 wheat, 1 wood, 1 sheep, 1 brick
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 0, 1)
    }

    /// City upgrade: 2 wheat, 3 ore
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(2, 0, 0, 3, 0)
    }

    /// Development card: 1 wheat, 1 sheep, 1 ore
    pub fn development_card() -> ResourceHand {
        ResourceHand::with_amounts(1, 0, 1, 1, 0)
    }
}

/// A single player's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub resources: ResourceHand,
    /// Development cards in hand, tagged with their acquisition turn
    pub dev_cards: Vec<HeldCard>,
    /// Knights played so far (Largest Army)
    pub played_knights: u32,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
    /// Unplaced piece stock
    pub roads_remaining: u32,
    pub settlements_remaining: u32,
    pub cities_remaining: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            color: PlayerColor::for_player(id),
            resources: ResourceHand::new(),
            dev_cards: Vec::new(),
            played_knights: 0,
            has_longest_road: false,
            has_largest_army: false,
            roads_remaining: ROAD_STOCK,
            settlements_remaining: SETTLEMENT_STOCK,
            cities_remaining: CITY_STOCK,
        }
    }

    /// Bonus victory points carried by the ledger: hidden VP cards plus
    /// the longest-road and largest-army awards. Building VP comes from
    /// board occupancy.
    pub fn bonus_victory_points(&self) -> u32 {
        let mut vp = self.hidden_vp();
        if self.has_longest_road {
            vp += 2;
        }
        if self.has_largest_army {
            vp += 2;
        }
        vp
    }

    /// VP cards in hand, not visible to opponents.
    pub fn hidden_vp(&self) -> u32 {
        self.dev_cards
            .iter()
            .filter(|c| matches!(c.card, DevelopmentCard::VictoryPoint))
            .count() as u32
    }

    pub fn can_afford_road(&self) -> bool {
        self.resources.can_afford(&costs::road())
    }

    pub fn can_afford_settlement(&self) -> bool {
        self.resources.can_afford(&costs::settlement())
    }

    pub fn can_afford_city(&self) -> bool {
        self.resources.can_afford(&costs::city())
    }

    pub fn can_afford_dev_card(&self) -> bool {
        self.resources.can_afford(&costs::development_card())
    }

    /// Spend for a road and draw down the stock.
    pub fn buy_road(&mut self) {
        self.resources.subtract(&costs::road());
        self.roads_remaining -= 1;
    }

    pub fn buy_settlement(&mut self) {
        self.resources.subtract(&costs::settlement());
        self.settlements_remaining -= 1;
    }

    /// Upgrade returns the settlement piece to stock.
    pub fn buy_city(&mut self) {
        self.resources.subtract(&costs::city());
        self.cities_remaining -= 1;
        self.settlements_remaining += 1;
    }

    pub fn buy_dev_card(&mut self, card: DevelopmentCard, turn: u32) {
        self.resources.subtract(&costs::development_card());
        self.dev_cards.push(HeldCard {
            card,
            acquired_turn: turn,
        });
    }

    /// Whether a card of this type is in hand and was bought on an
    /// earlier turn.
    pub fn has_playable_dev_card(&self, card_type: DevelopmentCard, current_turn: u32) -> bool {
        card_type.is_playable()
            && self
                .dev_cards
                .iter()
                .any(|c| c.card == card_type && c.acquired_turn < current_turn)
    }

    /// Remove the oldest playable card of this type from hand. Knights
    /// count toward Largest Army as they are played.
    pub fn play_dev_card(&mut self, card_type: DevelopmentCard, current_turn: u32) -> bool {
        let pos = self
            .dev_cards
            .iter()
            .position(|c| c.card == card_type && c.acquired_turn < current_turn);
        match pos {
            Some(pos) if card_type.is_playable() => {
                self.dev_cards.remove(pos);
                if matches!(card_type, DevelopmentCard::Knight) {
                    self.played_knights += 1;
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resource_hand_total() {
        let hand = ResourceHand::with_amounts(1, 2, 3, 4, 5);
        assert_eq!(hand.total(), 15);
    }

    #[test]
    fn resource_hand_can_afford() {
        let hand = ResourceHand::with_amounts(2, 2, 2, 2, 2);
        let cost = ResourceHand::with_amounts(1, 1, 1, 1, 1);
        assert!(hand.can_afford(&cost));

        let expensive = ResourceHand::with_amounts(3, 0, 0, 0, 0);
        assert!(!hand.can_afford(&expensive));
    }

    #[test]
    fn resource_hand_subtract() {
        let mut hand = ResourceHand::with_amounts(3, 3, 3, 3, 3);
        let cost = ResourceHand::with_amounts(1, 1, 1, 1, 1);
        hand.subtract(&cost);
        assert_eq!(hand, ResourceHand::with_amounts(2, 2, 2, 2, 2));
    }

    #[test]
    fn try_subtract_leaves_hand_untouched_on_failure() {
        let mut hand = ResourceHand::with_amounts(1, 0, 0, 0, 0);
        let cost = ResourceHand::with_amounts(2, 0, 0, 0, 0);
        assert!(!hand.try_subtract(&cost));
        assert_eq!(hand.wheat, 1);
    }

    #[test]
    fn building_costs() {
        assert_eq!(costs::road().total(), 2);
        assert_eq!(costs::road().wood, 1);
        assert_eq!(costs::road().brick, 1);

        assert_eq!(costs::settlement().total(), 4);
        assert_eq!(costs::settlement().ore, 0);

        assert_eq!(costs::city().wheat, 2);
        assert_eq!(costs::city().ore, 3);

        assert_eq!(costs::development_card().total(), 3);
        assert_eq!(costs::development_card().wood, 0);
        assert_eq!(costs::development_card().brick, 0);
    }

    #[test]
    fn dev_card_deck_composition() {
        let deck = DevelopmentCard::standard_deck();
        assert_eq!(deck.len(), 25);
        let count = |kind| deck.iter().filter(|c| **c == kind).count();
        assert_eq!(count(DevelopmentCard::Knight), 14);
        assert_eq!(count(DevelopmentCard::VictoryPoint), 5);
        assert_eq!(count(DevelopmentCard::RoadBuilding), 2);
        assert_eq!(count(DevelopmentCard::YearOfPlenty), 2);
        assert_eq!(count(DevelopmentCard::Monopoly), 2);
    }

    #[test]
    fn bonus_victory_points() {
        let mut player = Player::new(0, "Test".to_string());
        assert_eq!(player.bonus_victory_points(), 0);

        player.has_longest_road = true;
        assert_eq!(player.bonus_victory_points(), 2);

        player.has_largest_army = true;
        assert_eq!(player.bonus_victory_points(), 4);

        player.dev_cards.push(HeldCard {
            card: DevelopmentCard::VictoryPoint,
            acquired_turn: 0,
        });
        assert_eq!(player.bonus_victory_points(), 5);
    }

    #[test]
    fn buy_road_draws_down_stock() {
        let mut player = Player::new(0, "Test".to_string());
        player.resources = ResourceHand::with_amounts(5, 5, 5, 5, 5);

        assert!(player.can_afford_road());
        player.buy_road();
        assert_eq!(player.roads_remaining, ROAD_STOCK - 1);
        assert_eq!(player.resources.wood, 4);
        assert_eq!(player.resources.brick, 4);
    }

    #[test]
    fn city_returns_settlement_piece() {
        let mut player = Player::new(0, "Test".to_string());
        player.resources = ResourceHand::with_amounts(5, 5, 5, 5, 5);
        player.settlements_remaining = 3;

        player.buy_city();
        assert_eq!(player.cities_remaining, CITY_STOCK - 1);
        assert_eq!(player.settlements_remaining, 4);
    }

    #[test]
    fn dev_card_not_playable_on_purchase_turn() {
        let mut player = Player::new(0, "Test".to_string());
        player.resources = ResourceHand::with_amounts(5, 5, 5, 5, 5);

        player.buy_dev_card(DevelopmentCard::Knight, 3);
        assert!(!player.has_playable_dev_card(DevelopmentCard::Knight, 3));
        assert!(player.has_playable_dev_card(DevelopmentCard::Knight, 4));
    }

    #[test]
    fn victory_point_cards_are_never_played() {
        let mut player = Player::new(0, "Test".to_string());
        player.dev_cards.push(HeldCard {
            card: DevelopmentCard::VictoryPoint,
            acquired_turn: 0,
        });
        assert!(!player.has_playable_dev_card(DevelopmentCard::VictoryPoint, 5));
        assert!(!player.play_dev_card(DevelopmentCard::VictoryPoint, 5));
        assert_eq!(player.dev_cards.len(), 1);
    }

    #[test]
    fn playing_a_knight_counts_toward_largest_army() {
        let mut player = Player::new(0, "Test".to_string());
        player.dev_cards.push(HeldCard {
            card: DevelopmentCard::Knight,
            acquired_turn: 1,
        });
        assert!(player.play_dev_card(DevelopmentCard::Knight, 2));
        assert_eq!(player.played_knights, 1);
        assert!(player.dev_cards.is_empty());
    }

    #[test]
    fn steal_random_from_single_card_hand() {
        let mut hand = ResourceHand::single(Resource::Wheat, 1);
        let mut rng = rand::thread_rng();
        assert_eq!(hand.steal_random(&mut rng), Some(Resource::Wheat));
        assert!(hand.is_empty());
    }
}

//! Board graph: the finite mesh, terrain, ports, piece occupancy, and
//! placement legality.
//!
//! The mesh is fixed at construction: `layers` rings of tiles around a
//! central tile, with the corner and edge universes derived as the
//! deduplicated union of every tile's corners and edges. Occupancy is
//! stored sparsely so cloning board state costs time proportional to the
//! pieces actually placed.

use crate::grid::{CornerCoord, EdgeCoord, Pole, TileCoord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Player identifier (0-3 for a 4-player game)
pub type PlayerId = u8;

/// The five producing resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Wheat,
    Wood,
    Sheep,
    Ore,
    Brick,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Wheat,
        Resource::Wood,
        Resource::Sheep,
        Resource::Ore,
        Resource::Brick,
    ];
}

/// Terrain kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    /// Produces the given resource when its trigger is rolled
    Producing(Resource),
    /// Produces nothing; the robber starts here
    Desert,
}

/// A single hex tile of the mesh. Immutable after generation; the robber
/// position lives on the board, not the tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: TileCoord,
    pub terrain: Terrain,
    /// Dice value that triggers production (2-12 except 7; desert has none)
    pub trigger: Option<u8>,
}

impl Tile {
    pub fn producing(coord: TileCoord, resource: Resource, trigger: u8) -> Self {
        Self {
            coord,
            terrain: Terrain::Producing(resource),
            trigger: Some(trigger),
        }
    }

    pub fn desert(coord: TileCoord) -> Self {
        Self {
            coord,
            terrain: Terrain::Desert,
            trigger: None,
        }
    }

    pub fn resource(&self) -> Option<Resource> {
        match self.terrain {
            Terrain::Producing(r) => Some(r),
            Terrain::Desert => None,
        }
    }

    /// Production weight: how many of the 36 two-die outcomes hit the
    /// trigger. Zero for the desert.
    pub fn pips(&self) -> u32 {
        match self.trigger {
            Some(v) if (2..=12).contains(&v) && v != 7 => (6 - (7 - v as i32).abs()) as u32,
            _ => 0,
        }
    }
}

/// Occupant of a corner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CornerPiece {
    #[default]
    Empty,
    /// 1 VP, 1 card per adjacent production
    Settlement(PlayerId),
    /// 2 VP, 2 cards per adjacent production
    City(PlayerId),
}

impl CornerPiece {
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            CornerPiece::Empty => None,
            CornerPiece::Settlement(p) | CornerPiece::City(p) => Some(*p),
        }
    }

    pub fn victory_points(&self) -> u32 {
        match self {
            CornerPiece::Empty => 0,
            CornerPiece::Settlement(_) => 1,
            CornerPiece::City(_) => 2,
        }
    }

    pub fn yield_multiplier(&self) -> u32 {
        match self {
            CornerPiece::Empty => 0,
            CornerPiece::Settlement(_) => 1,
            CornerPiece::City(_) => 2,
        }
    }
}

/// Occupant of an edge slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgePiece {
    #[default]
    Empty,
    Road(PlayerId),
}

impl EdgePiece {
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgePiece::Empty => None,
            EdgePiece::Road(p) => Some(*p),
        }
    }
}

/// Exchange offered by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// 3:1, any resource
    Any,
    /// 2:1 for the named resource
    Resource(Resource),
}

impl PortKind {
    pub fn rate(&self) -> u32 {
        match self {
            PortKind::Any => 3,
            PortKind::Resource(_) => 2,
        }
    }
}

/// A port binds two adjacent coastal corners to an exchange rate. A
/// player reaches the port by holding a settlement or city on either
/// corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub corners: [CornerCoord; 2],
    pub kind: PortKind,
}

/// The standard port distribution: one 2:1 port per resource, four 3:1.
const PORT_KINDS: [PortKind; 9] = [
    PortKind::Any,
    PortKind::Any,
    PortKind::Any,
    PortKind::Any,
    PortKind::Resource(Resource::Wheat),
    PortKind::Resource(Resource::Wood),
    PortKind::Resource(Resource::Sheep),
    PortKind::Resource(Resource::Ore),
    PortKind::Resource(Resource::Brick),
];

/// Resource spread for the standard 2-layer board (18 producing tiles);
/// larger boards repeat it. The desert is added separately, exactly once.
const RESOURCE_SPREAD: [Resource; 18] = [
    Resource::Wheat,
    Resource::Wheat,
    Resource::Wheat,
    Resource::Wheat,
    Resource::Wood,
    Resource::Wood,
    Resource::Wood,
    Resource::Wood,
    Resource::Sheep,
    Resource::Sheep,
    Resource::Sheep,
    Resource::Sheep,
    Resource::Ore,
    Resource::Ore,
    Resource::Ore,
    Resource::Brick,
    Resource::Brick,
    Resource::Brick,
];

/// Standard trigger multiplicities: one 2 and one 12, two of everything
/// else, never a 7.
const TRIGGER_SPREAD: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// The complete board graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    layers: u32,
    tiles: HashMap<TileCoord, Tile>,
    /// Corner universe: union of every tile's corners
    corners: HashSet<CornerCoord>,
    /// Edge universe: union of every tile's edges
    edges: HashSet<EdgeCoord>,
    /// Placed settlements and cities; absent means empty
    corner_pieces: HashMap<CornerCoord, CornerPiece>,
    /// Placed roads; absent means empty
    edge_pieces: HashMap<EdgeCoord, EdgePiece>,
    ports: Vec<Port>,
    robber: TileCoord,
}

impl Board {
    /// Generate a fresh board with `layers` rings around the central tile
    /// (tile count 3L^2 + 3L + 1), random terrain and trigger assignment,
    /// and ports spread along the coast.
    pub fn generate<R: Rng>(layers: u32, rng: &mut R) -> Self {
        let mut coords: Vec<TileCoord> = Vec::new();
        for radius in 0..=layers {
            coords.extend(TileCoord::ring(radius));
        }
        let tile_count = coords.len();
        debug_assert_eq!(tile_count as u32, 3 * layers * layers + 3 * layers + 1);

        // One desert, the rest cycled from the standard resource spread.
        let mut terrains: Vec<Option<Resource>> = vec![None];
        for i in 0..tile_count - 1 {
            terrains.push(Some(RESOURCE_SPREAD[i % RESOURCE_SPREAD.len()]));
        }
        terrains.shuffle(rng);

        let triggers = assign_triggers(&coords, &terrains, rng);

        let mut tiles = HashMap::with_capacity(tile_count);
        let mut robber = TileCoord::new(0, 0);
        let mut trigger_idx = 0;
        for (i, &coord) in coords.iter().enumerate() {
            match terrains[i] {
                Some(resource) => {
                    tiles.insert(coord, Tile::producing(coord, resource, triggers[trigger_idx]));
                    trigger_idx += 1;
                }
                None => {
                    tiles.insert(coord, Tile::desert(coord));
                    robber = coord;
                }
            }
        }

        let mut corners = HashSet::new();
        let mut edges = HashSet::new();
        for coord in &coords {
            corners.extend(coord.corners());
            edges.extend(coord.edges());
        }

        let mut board = Self {
            layers,
            tiles,
            corners,
            edges,
            corner_pieces: HashMap::new(),
            edge_pieces: HashMap::new(),
            ports: Vec::new(),
            robber,
        };
        board.place_ports(rng);
        board
    }

    /// Generate the standard two-layer (19-tile) board.
    pub fn standard<R: Rng>(rng: &mut R) -> Self {
        Self::generate(2, rng)
    }

    fn place_ports<R: Rng>(&mut self, rng: &mut R) {
        let coastal = self.coastal_edges();
        let mut kinds = PORT_KINDS.to_vec();
        kinds.shuffle(rng);

        let spots = select_spread_edges(&coastal, kinds.len(), rng);
        for (edge, kind) in spots.into_iter().zip(kinds) {
            self.ports.push(Port {
                corners: edge.endpoints(),
                kind,
            });
        }
    }

    /// Edges on the coast, bordered by exactly one tile of the mesh.
    /// Sorted, so a seeded shuffle over them is reproducible.
    fn coastal_edges(&self) -> Vec<EdgeCoord> {
        let mut coastal: Vec<EdgeCoord> = self
            .edges
            .iter()
            .filter(|e| {
                e.touching_tiles()
                    .iter()
                    .filter(|t| self.tiles.contains_key(t))
                    .count()
                    == 1
            })
            .copied()
            .collect();
        coastal.sort();
        coastal
    }

    // ==================== Query Methods ====================

    pub fn layers(&self) -> u32 {
        self.layers
    }

    pub fn tile(&self, coord: &TileCoord) -> Option<&Tile> {
        self.tiles.get(coord)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_corner(&self, corner: &CornerCoord) -> bool {
        self.corners.contains(corner)
    }

    pub fn contains_edge(&self, edge: &EdgeCoord) -> bool {
        self.edges.contains(edge)
    }

    /// All corners of the mesh.
    pub fn corners(&self) -> impl Iterator<Item = &CornerCoord> {
        self.corners.iter()
    }

    /// All edges of the mesh.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeCoord> {
        self.edges.iter()
    }

    /// Piece at a corner; `Empty` when nothing is placed.
    pub fn corner_piece(&self, corner: &CornerCoord) -> CornerPiece {
        self.corner_pieces.get(corner).copied().unwrap_or_default()
    }

    /// Piece at an edge; `Empty` when nothing is placed.
    pub fn edge_piece(&self, edge: &EdgeCoord) -> EdgePiece {
        self.edge_pieces.get(edge).copied().unwrap_or_default()
    }

    /// Placed corner pieces, sparsely.
    pub fn placed_corner_pieces(&self) -> impl Iterator<Item = (&CornerCoord, &CornerPiece)> {
        self.corner_pieces.iter()
    }

    /// Placed roads, sparsely.
    pub fn placed_edge_pieces(&self) -> impl Iterator<Item = (&EdgeCoord, &EdgePiece)> {
        self.edge_pieces.iter()
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// The port reachable from a corner, if that corner is half of a
    /// port's pair.
    pub fn port_at(&self, corner: &CornerCoord) -> Option<&Port> {
        self.ports.iter().find(|p| p.corners.contains(corner))
    }

    pub fn robber(&self) -> TileCoord {
        self.robber
    }

    /// Neighboring tiles of a tile, filtered to the mesh.
    pub fn tile_neighbors(&self, tile: &TileCoord) -> Vec<TileCoord> {
        tile.neighbors()
            .into_iter()
            .filter(|t| self.tiles.contains_key(t))
            .collect()
    }

    /// Tiles sharing a corner, filtered to the mesh.
    pub fn tiles_at_corner(&self, corner: &CornerCoord) -> Vec<&Tile> {
        corner
            .touching_tiles()
            .iter()
            .filter_map(|t| self.tiles.get(t))
            .collect()
    }

    /// Corners adjacent to a corner, filtered to the mesh.
    pub fn corner_neighbors(&self, corner: &CornerCoord) -> Vec<CornerCoord> {
        corner
            .adjacent_corners()
            .into_iter()
            .filter(|c| self.corners.contains(c))
            .collect()
    }

    /// Edges incident to a corner, filtered to the mesh.
    pub fn edges_at_corner(&self, corner: &CornerCoord) -> Vec<EdgeCoord> {
        corner
            .touching_edges()
            .into_iter()
            .filter(|e| self.edges.contains(e))
            .collect()
    }

    /// Edges sharing an endpoint with an edge, filtered to the mesh.
    pub fn edge_neighbors(&self, edge: &EdgeCoord) -> Vec<EdgeCoord> {
        edge.adjacent_edges()
            .into_iter()
            .filter(|e| self.edges.contains(e))
            .collect()
    }

    /// Tiles whose trigger equals the given dice value.
    pub fn tiles_with_trigger(&self, value: u8) -> Vec<&Tile> {
        self.tiles
            .values()
            .filter(|t| t.trigger == Some(value))
            .collect()
    }

    /// All corner pieces owned by a player.
    pub fn corners_of(&self, player: PlayerId) -> Vec<(CornerCoord, CornerPiece)> {
        self.corner_pieces
            .iter()
            .filter(|(_, piece)| piece.owner() == Some(player))
            .map(|(c, p)| (*c, *p))
            .collect()
    }

    /// All roads owned by a player.
    pub fn roads_of(&self, player: PlayerId) -> Vec<EdgeCoord> {
        self.edge_pieces
            .iter()
            .filter(|(_, piece)| piece.owner() == Some(player))
            .map(|(e, _)| *e)
            .collect()
    }

    // ==================== Legality ====================

    /// Distance rule: no adjacent corner may be occupied.
    pub fn satisfies_distance_rule(&self, corner: &CornerCoord) -> bool {
        self.corner_neighbors(corner)
            .iter()
            .all(|c| self.corner_piece(c).owner().is_none())
    }

    /// Whether a corner touches an edge holding the player's road.
    fn touches_own_road(&self, corner: &CornerCoord, player: PlayerId) -> bool {
        self.edges_at_corner(corner)
            .iter()
            .any(|e| self.edge_piece(e) == EdgePiece::Road(player))
    }

    /// Legal settlement corners, in a stable order; `pregame` drops the
    /// road-connectivity requirement.
    pub fn settlement_spots(&self, player: PlayerId, pregame: bool) -> Vec<CornerCoord> {
        let mut spots: Vec<CornerCoord> = self
            .corners
            .iter()
            .filter(|c| {
                self.corner_piece(c) == CornerPiece::Empty
                    && self.satisfies_distance_rule(c)
                    && (pregame || self.touches_own_road(c, player))
            })
            .copied()
            .collect();
        spots.sort();
        spots
    }

    /// Whether an edge connects to the player's network: a piece of the
    /// player at an endpoint, or a road of the player through an endpoint
    /// not occupied by an opponent.
    pub fn connects_to_network(&self, edge: &EdgeCoord, player: PlayerId) -> bool {
        for endpoint in edge.endpoints() {
            let occupant = self.corner_piece(&endpoint).owner();
            if occupant == Some(player) {
                return true;
            }
            // An opposing settlement or city at the junction blocks
            // continuation through it.
            if occupant.is_none() {
                let continues = self
                    .edges_at_corner(&endpoint)
                    .iter()
                    .any(|adj| adj != edge && self.edge_piece(adj) == EdgePiece::Road(player));
                if continues {
                    return true;
                }
            }
        }
        false
    }

    /// Legal road edges for a player, in a stable order.
    pub fn road_spots(&self, player: PlayerId) -> Vec<EdgeCoord> {
        let mut spots: Vec<EdgeCoord> = self
            .edges
            .iter()
            .filter(|e| {
                self.edge_piece(e) == EdgePiece::Empty && self.connects_to_network(e, player)
            })
            .copied()
            .collect();
        spots.sort();
        spots
    }

    /// Empty edges touching a specific corner (pre-game road placement).
    pub fn road_spots_at(&self, corner: &CornerCoord) -> Vec<EdgeCoord> {
        self.edges_at_corner(corner)
            .into_iter()
            .filter(|e| self.edge_piece(e) == EdgePiece::Empty)
            .collect()
    }

    /// Corners holding the player's settlements (city upgrade targets),
    /// in a stable order.
    pub fn city_spots(&self, player: PlayerId) -> Vec<CornerCoord> {
        let mut spots: Vec<CornerCoord> = self
            .corner_pieces
            .iter()
            .filter(|(_, piece)| **piece == CornerPiece::Settlement(player))
            .map(|(c, _)| *c)
            .collect();
        spots.sort();
        spots
    }

    /// Tiles the robber may move to: any mesh tile but its current one,
    /// in a stable order.
    pub fn robber_targets(&self) -> Vec<TileCoord> {
        let mut targets: Vec<TileCoord> = self
            .tiles
            .keys()
            .filter(|t| **t != self.robber)
            .copied()
            .collect();
        targets.sort();
        targets
    }

    // ==================== Mutations ====================
    //
    // Each mutation verifies the slot before writing and reports success;
    // on failure nothing changes.

    /// Place a settlement on an empty mesh corner.
    pub fn build_settlement(&mut self, corner: CornerCoord, player: PlayerId) -> bool {
        if !self.corners.contains(&corner) || self.corner_piece(&corner) != CornerPiece::Empty {
            return false;
        }
        self.corner_pieces
            .insert(corner, CornerPiece::Settlement(player));
        true
    }

    /// Upgrade the player's own settlement to a city.
    pub fn build_city(&mut self, corner: CornerCoord, player: PlayerId) -> bool {
        if self.corner_piece(&corner) != CornerPiece::Settlement(player) {
            return false;
        }
        self.corner_pieces.insert(corner, CornerPiece::City(player));
        true
    }

    /// Place a road on an empty mesh edge.
    pub fn build_road(&mut self, edge: EdgeCoord, player: PlayerId) -> bool {
        if !self.edges.contains(&edge) || self.edge_piece(&edge) != EdgePiece::Empty {
            return false;
        }
        self.edge_pieces.insert(edge, EdgePiece::Road(player));
        true
    }

    /// Relocate the robber to another mesh tile.
    pub fn move_robber(&mut self, tile: TileCoord) -> bool {
        if tile == self.robber || !self.tiles.contains_key(&tile) {
            return false;
        }
        self.robber = tile;
        true
    }

    pub(crate) fn restore_occupancy(
        &mut self,
        corner_pieces: &[(CornerCoord, CornerPiece)],
        edge_pieces: &[(EdgeCoord, EdgePiece)],
        robber: TileCoord,
    ) {
        self.corner_pieces = corner_pieces.iter().copied().collect();
        self.edge_pieces = edge_pieces.iter().copied().collect();
        self.robber = robber;
    }

    // ==================== Production ====================

    /// Cards produced by a dice value: for every non-robber tile with that
    /// trigger, each adjacent settlement yields 1 and each city 2 of the
    /// tile's resource.
    pub fn production_for_roll(&self, roll: u8) -> HashMap<PlayerId, HashMap<Resource, u32>> {
        let mut out: HashMap<PlayerId, HashMap<Resource, u32>> = HashMap::new();
        for tile in self.tiles.values() {
            if tile.trigger != Some(roll) || tile.coord == self.robber {
                continue;
            }
            let resource = match tile.resource() {
                Some(r) => r,
                None => continue,
            };
            for corner in tile.coord.corners() {
                let piece = self.corner_piece(&corner);
                if let Some(owner) = piece.owner() {
                    *out.entry(owner).or_default().entry(resource).or_insert(0) +=
                        piece.yield_multiplier();
                }
            }
        }
        out
    }

    /// Players holding a piece on a tile's corners (robber steal pool).
    pub fn players_at_tile(&self, tile: &TileCoord) -> HashSet<PlayerId> {
        let mut players = HashSet::new();
        if self.tiles.contains_key(tile) {
            for corner in tile.corners() {
                if let Some(owner) = self.corner_piece(&corner).owner() {
                    players.insert(owner);
                }
            }
        }
        players
    }

    // ==================== Longest Road ====================

    /// Length of the player's longest simple road chain. Opposing corner
    /// pieces cut the chain at that junction.
    pub fn longest_road(&self, player: PlayerId) -> u32 {
        let roads = self.roads_of(player);
        let mut best = 0;
        for start in &roads {
            let mut visited = HashSet::new();
            best = best.max(self.walk_road(player, *start, &mut visited));
        }
        best
    }

    fn walk_road(
        &self,
        player: PlayerId,
        current: EdgeCoord,
        visited: &mut HashSet<EdgeCoord>,
    ) -> u32 {
        if visited.contains(&current) {
            return 0;
        }
        visited.insert(current);

        let mut longest_continuation = 0;
        for endpoint in current.endpoints() {
            let occupant = self.corner_piece(&endpoint);
            if occupant.owner().is_some_and(|o| o != player) {
                continue;
            }
            for adj in self.edges_at_corner(&endpoint) {
                if adj != current && self.edge_piece(&adj) == EdgePiece::Road(player) {
                    longest_continuation =
                        longest_continuation.max(self.walk_road(player, adj, visited));
                }
            }
        }

        visited.remove(&current);
        1 + longest_continuation
    }

    /// Flattened, array-based representation for JSON consumers; HashMap
    /// keys cannot survive JSON.
    pub fn view(&self) -> BoardView {
        BoardView {
            layers: self.layers,
            tiles: self
                .tiles
                .values()
                .map(|t| TileView {
                    q: t.coord.q,
                    r: t.coord.r,
                    terrain: t.terrain,
                    trigger: t.trigger,
                })
                .collect(),
            corners: self
                .corner_pieces
                .iter()
                .map(|(c, piece)| CornerView {
                    tile_q: c.tile.q,
                    tile_r: c.tile.r,
                    pole: c.pole,
                    piece: *piece,
                })
                .collect(),
            edges: self
                .edge_pieces
                .iter()
                .map(|(e, piece)| EdgeView {
                    tile_q: e.tile().q,
                    tile_r: e.tile().r,
                    side: e.side(),
                    piece: *piece,
                })
                .collect(),
            ports: self.ports.clone(),
            robber_q: self.robber.q,
            robber_r: self.robber.r,
        }
    }
}

/// Assign triggers to producing tiles, retrying a bounded number of
/// shuffles to keep 6s and 8s off adjacent tiles.
fn assign_triggers<R: Rng>(
    coords: &[TileCoord],
    terrains: &[Option<Resource>],
    rng: &mut R,
) -> Vec<u8> {
    const MAX_ATTEMPTS: usize = 100;

    let producing = terrains.iter().filter(|t| t.is_some()).count();
    let mut triggers: Vec<u8> = (0..producing)
        .map(|i| TRIGGER_SPREAD[i % TRIGGER_SPREAD.len()])
        .collect();

    for _ in 0..MAX_ATTEMPTS {
        triggers.shuffle(rng);
        if no_adjacent_hot_triggers(coords, terrains, &triggers) {
            return triggers;
        }
    }
    // Rare with standard sizes; the last shuffle is still a legal board.
    triggers
}

fn no_adjacent_hot_triggers(
    coords: &[TileCoord],
    terrains: &[Option<Resource>],
    triggers: &[u8],
) -> bool {
    let mut by_coord: HashMap<TileCoord, u8> = HashMap::new();
    let mut idx = 0;
    for (i, terrain) in terrains.iter().enumerate() {
        if terrain.is_some() {
            by_coord.insert(coords[i], triggers[idx]);
            idx += 1;
        }
    }
    for (coord, &value) in &by_coord {
        if value == 6 || value == 8 {
            for neighbor in coord.neighbors() {
                if let Some(&other) = by_coord.get(&neighbor) {
                    if other == 6 || other == 8 {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Pick `count` coastal edges spread around the perimeter: greedily take
/// the candidate farthest from everything already selected.
fn select_spread_edges<R: Rng>(coastal: &[EdgeCoord], count: usize, rng: &mut R) -> Vec<EdgeCoord> {
    if coastal.len() <= count {
        return coastal.to_vec();
    }

    let mut available = coastal.to_vec();
    available.shuffle(rng);
    let mut selected: Vec<EdgeCoord> = vec![available.remove(0)];

    while selected.len() < count && !available.is_empty() {
        let (idx, _) = available
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let (cx, cy) = candidate.to_pixel(1.0);
                let nearest = selected
                    .iter()
                    .map(|s| {
                        let (sx, sy) = s.to_pixel(1.0);
                        (sx - cx).powi(2) + (sy - cy).powi(2)
                    })
                    .fold(f64::MAX, f64::min);
                (i, nearest)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0, 0.0));
        selected.push(available.remove(idx));
    }

    selected
}

/// JSON-friendly board state with arrays instead of maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub layers: u32,
    pub tiles: Vec<TileView>,
    pub corners: Vec<CornerView>,
    pub edges: Vec<EdgeView>,
    pub ports: Vec<Port>,
    pub robber_q: i32,
    pub robber_r: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileView {
    pub q: i32,
    pub r: i32,
    pub terrain: Terrain,
    pub trigger: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornerView {
    pub tile_q: i32,
    pub tile_r: i32,
    pub pole: Pole,
    pub piece: CornerPiece,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeView {
    pub tile_q: i32,
    pub tile_r: i32,
    pub side: crate::grid::Side,
    pub piece: EdgePiece,
}

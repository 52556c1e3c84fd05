//! Hex addressing for tiles, corners, and edges.
//!
//! Three disjoint address families share one axial (q, r) tile space:
//! - `TileCoord`: a hex cell, pointy-top, q increasing east, r southeast
//! - `CornerCoord`: a point shared by up to three tiles, addressed as the
//!   North or South pole of exactly one tile (the four "side" corners of a
//!   tile are the poles of its neighbors, so the pole form is unique)
//! - `EdgeCoord`: a border shared by up to two tiles, addressed as one of
//!   the NE/E/SE sides of the lexicographically smaller describing tile
//!
//! Every neighbor relation is a constant offset table keyed by a compass
//! direction. Each kind pair admits only a subset of directions; querying
//! with a direction outside that subset is a caller bug and fails with
//! [`GridError::InvalidDirection`]. For every valid direction d,
//! `neighbor(A, d) == B` implies `neighbor(B, d.opposite()) == A`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the eight compass directions used by neighbor tables.
///
/// Tiles never relate through N/S; corners and edges use different
/// subsets depending on their orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    /// The reverse direction.
    pub const fn opposite(self) -> Compass {
        match self {
            Compass::North => Compass::South,
            Compass::NorthEast => Compass::SouthWest,
            Compass::East => Compass::West,
            Compass::SouthEast => Compass::NorthWest,
            Compass::South => Compass::North,
            Compass::SouthWest => Compass::NorthEast,
            Compass::West => Compass::East,
            Compass::NorthWest => Compass::SouthEast,
        }
    }

    /// Directions in which a tile has a neighboring tile (or edge).
    pub const TILE_SIDES: [Compass; 6] = [
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Directions in which a tile has a corner.
    pub const TILE_CORNERS: [Compass; 6] = [
        Compass::North,
        Compass::NorthEast,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::NorthWest,
    ];
}

/// Failure of a neighbor query: the direction is not defined for the
/// requested entity pair. Always a programming error by the caller, never
/// a normal rules rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GridError {
    #[error("direction {direction:?} is not valid for {relation} neighbors")]
    InvalidDirection {
        direction: Compass,
        relation: &'static str,
    },
}

const fn invalid(direction: Compass, relation: &'static str) -> GridError {
    GridError::InvalidDirection {
        direction,
        relation,
    }
}

/// Axial tile coordinate. The implicit third cube coordinate satisfies
/// q + r + s = 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct TileCoord {
    pub q: i32,
    pub r: i32,
}

impl TileCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    const fn offset(self, dq: i32, dr: i32) -> Self {
        Self::new(self.q + dq, self.r + dr)
    }

    /// Neighboring tile in one of the six side directions.
    pub fn neighbor(&self, direction: Compass) -> Result<TileCoord, GridError> {
        match direction {
            Compass::NorthEast => Ok(self.offset(1, -1)),
            Compass::East => Ok(self.offset(1, 0)),
            Compass::SouthEast => Ok(self.offset(0, 1)),
            Compass::SouthWest => Ok(self.offset(-1, 1)),
            Compass::West => Ok(self.offset(-1, 0)),
            Compass::NorthWest => Ok(self.offset(0, -1)),
            d => Err(invalid(d, "tile-tile")),
        }
    }

    /// Corner of this tile in one of the six corner directions.
    pub fn corner(&self, direction: Compass) -> Result<CornerCoord, GridError> {
        match direction {
            Compass::North => Ok(CornerCoord::new(*self, Pole::North)),
            Compass::South => Ok(CornerCoord::new(*self, Pole::South)),
            Compass::NorthEast => Ok(CornerCoord::new(self.offset(1, -1), Pole::South)),
            Compass::NorthWest => Ok(CornerCoord::new(self.offset(0, -1), Pole::South)),
            Compass::SouthEast => Ok(CornerCoord::new(self.offset(0, 1), Pole::North)),
            Compass::SouthWest => Ok(CornerCoord::new(self.offset(-1, 1), Pole::North)),
            d => Err(invalid(d, "tile-corner")),
        }
    }

    /// Edge of this tile in one of the six side directions.
    pub fn edge(&self, direction: Compass) -> Result<EdgeCoord, GridError> {
        match direction {
            Compass::NorthEast => Ok(EdgeCoord::raw(*self, Side::NorthEast)),
            Compass::East => Ok(EdgeCoord::raw(*self, Side::East)),
            Compass::SouthEast => Ok(EdgeCoord::raw(*self, Side::SouthEast)),
            Compass::SouthWest => Ok(EdgeCoord::raw(self.offset(-1, 1), Side::NorthEast)),
            Compass::West => Ok(EdgeCoord::raw(self.offset(-1, 0), Side::East)),
            Compass::NorthWest => Ok(EdgeCoord::raw(self.offset(0, -1), Side::SouthEast)),
            d => Err(invalid(d, "tile-edge")),
        }
    }

    /// All six neighboring tiles.
    pub fn neighbors(&self) -> [TileCoord; 6] {
        Compass::TILE_SIDES.map(|d| self.neighbor(d).expect("side direction"))
    }

    /// All six corners of this tile.
    pub fn corners(&self) -> [CornerCoord; 6] {
        Compass::TILE_CORNERS.map(|d| self.corner(d).expect("corner direction"))
    }

    /// All six edges of this tile.
    pub fn edges(&self) -> [EdgeCoord; 6] {
        Compass::TILE_SIDES.map(|d| self.edge(d).expect("side direction"))
    }

    /// Distance in tile steps.
    pub fn distance_to(&self, other: &TileCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// The ring of tiles at exactly `radius` steps from the origin.
    /// Ring 0 is the origin alone; ring i has 6i tiles.
    pub fn ring(radius: u32) -> Vec<TileCoord> {
        if radius == 0 {
            return vec![TileCoord::new(0, 0)];
        }
        let r = radius as i32;
        let mut out = Vec::with_capacity(6 * radius as usize);
        let mut cur = TileCoord::new(-r, 0);
        for side in Compass::TILE_SIDES {
            for _ in 0..radius {
                out.push(cur);
                cur = cur.neighbor(side).expect("side direction");
            }
        }
        out
    }

    /// Center of the tile in pixel space (pointy-top, unit radius scaled
    /// by `size`). Exposed so a rendering collaborator does not have to
    /// re-derive the layout.
    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let x = size * 3.0_f64.sqrt() * (self.q as f64 + self.r as f64 / 2.0);
        let y = size * 1.5 * self.r as f64;
        (x, y)
    }
}

/// Which pole of its addressing tile a corner is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Pole {
    North,
    South,
}

/// Corner address: the North or South pole of one tile. Each corner of the
/// plane has exactly one such representation, so no canonical form is
/// needed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CornerCoord {
    pub tile: TileCoord,
    pub pole: Pole,
}

impl CornerCoord {
    pub const fn new(tile: TileCoord, pole: Pole) -> Self {
        Self { tile, pole }
    }

    /// The three directions toward adjacent corners (and the edges that
    /// reach them). Depends on the pole: a North corner connects straight
    /// up and down-left/down-right, a South corner the mirror image.
    pub const fn corner_directions(&self) -> [Compass; 3] {
        match self.pole {
            Pole::North => [Compass::North, Compass::SouthEast, Compass::SouthWest],
            Pole::South => [Compass::South, Compass::NorthWest, Compass::NorthEast],
        }
    }

    /// The three directions toward touching tiles.
    pub const fn tile_directions(&self) -> [Compass; 3] {
        match self.pole {
            Pole::North => [Compass::South, Compass::NorthWest, Compass::NorthEast],
            Pole::South => [Compass::North, Compass::SouthEast, Compass::SouthWest],
        }
    }

    /// Adjacent corner one edge away in the given direction.
    pub fn neighbor(&self, direction: Compass) -> Result<CornerCoord, GridError> {
        let t = self.tile;
        match (self.pole, direction) {
            (Pole::North, Compass::North) => Ok(CornerCoord::new(t.offset(1, -2), Pole::South)),
            (Pole::North, Compass::SouthWest) => Ok(CornerCoord::new(t.offset(0, -1), Pole::South)),
            (Pole::North, Compass::SouthEast) => Ok(CornerCoord::new(t.offset(1, -1), Pole::South)),
            (Pole::South, Compass::South) => Ok(CornerCoord::new(t.offset(-1, 2), Pole::North)),
            (Pole::South, Compass::NorthEast) => Ok(CornerCoord::new(t.offset(0, 1), Pole::North)),
            (Pole::South, Compass::NorthWest) => {
                Ok(CornerCoord::new(t.offset(-1, 1), Pole::North))
            }
            (_, d) => Err(invalid(d, "corner-corner")),
        }
    }

    /// Edge incident to this corner in the given direction. Valid
    /// directions are the same as for corner neighbors: the edge points at
    /// the adjacent corner.
    pub fn edge_toward(&self, direction: Compass) -> Result<EdgeCoord, GridError> {
        let t = self.tile;
        match (self.pole, direction) {
            (Pole::North, Compass::North) => Ok(EdgeCoord::raw(t.offset(0, -1), Side::East)),
            (Pole::North, Compass::SouthWest) => {
                Ok(EdgeCoord::raw(t.offset(0, -1), Side::SouthEast))
            }
            (Pole::North, Compass::SouthEast) => Ok(EdgeCoord::raw(t, Side::NorthEast)),
            (Pole::South, Compass::South) => Ok(EdgeCoord::raw(t.offset(-1, 1), Side::East)),
            (Pole::South, Compass::NorthEast) => Ok(EdgeCoord::raw(t, Side::SouthEast)),
            (Pole::South, Compass::NorthWest) => {
                Ok(EdgeCoord::raw(t.offset(-1, 1), Side::NorthEast))
            }
            (_, d) => Err(invalid(d, "corner-edge")),
        }
    }

    /// Touching tile in the given direction.
    pub fn tile_toward(&self, direction: Compass) -> Result<TileCoord, GridError> {
        let t = self.tile;
        match (self.pole, direction) {
            (Pole::North, Compass::South) => Ok(t),
            (Pole::North, Compass::NorthWest) => Ok(t.offset(0, -1)),
            (Pole::North, Compass::NorthEast) => Ok(t.offset(1, -1)),
            (Pole::South, Compass::North) => Ok(t),
            (Pole::South, Compass::SouthEast) => Ok(t.offset(0, 1)),
            (Pole::South, Compass::SouthWest) => Ok(t.offset(-1, 1)),
            (_, d) => Err(invalid(d, "corner-tile")),
        }
    }

    /// The three adjacent corners (distance-rule neighborhood).
    pub fn adjacent_corners(&self) -> [CornerCoord; 3] {
        self.corner_directions()
            .map(|d| self.neighbor(d).expect("corner direction"))
    }

    /// The three edges meeting at this corner.
    pub fn touching_edges(&self) -> [EdgeCoord; 3] {
        self.corner_directions()
            .map(|d| self.edge_toward(d).expect("corner direction"))
    }

    /// The three tiles sharing this corner.
    pub fn touching_tiles(&self) -> [TileCoord; 3] {
        self.tile_directions()
            .map(|d| self.tile_toward(d).expect("tile direction"))
    }

    /// Pixel position of the corner.
    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let (x, y) = self.tile.to_pixel(size);
        match self.pole {
            Pole::North => (x, y - size),
            Pole::South => (x, y + size),
        }
    }
}

/// Canonical side of an edge's addressing tile. Edges described from the
/// other tile (SW/W/NW sides) normalize to one of these three.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Side {
    NorthEast,
    East,
    SouthEast,
}

/// Edge address: a canonical (tile, side) pair. The canonical describing
/// tile is the lexicographically smaller of the two tiles sharing the
/// edge, which always leaves the side as NE, E, or SE.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeCoord {
    tile: TileCoord,
    side: Side,
}

impl EdgeCoord {
    /// Build an edge from any of the six sides of a tile. SW/W/NW sides
    /// canonicalize to the neighboring tile's NE/E/SE side. N and S are
    /// not edges of a pointy-top hex.
    pub fn new(tile: TileCoord, side: Compass) -> Result<Self, GridError> {
        tile.edge(side)
    }

    const fn raw(tile: TileCoord, side: Side) -> Self {
        Self { tile, side }
    }

    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    pub const fn side(&self) -> Side {
        self.side
    }

    /// The four directions toward edges sharing an endpoint with this one.
    pub const fn edge_directions(&self) -> [Compass; 4] {
        match self.side {
            Side::NorthEast => [Compass::NorthWest, Compass::West, Compass::East, Compass::SouthEast],
            Side::East => [Compass::NorthEast, Compass::NorthWest, Compass::SouthWest, Compass::SouthEast],
            Side::SouthEast => [Compass::NorthEast, Compass::East, Compass::SouthWest, Compass::West],
        }
    }

    /// The two directions toward this edge's endpoint corners.
    pub const fn corner_directions(&self) -> [Compass; 2] {
        match self.side {
            Side::NorthEast => [Compass::NorthWest, Compass::SouthEast],
            Side::East => [Compass::North, Compass::South],
            Side::SouthEast => [Compass::NorthEast, Compass::SouthWest],
        }
    }

    /// The two directions toward the tiles sharing this edge.
    pub const fn tile_directions(&self) -> [Compass; 2] {
        match self.side {
            Side::NorthEast => [Compass::SouthWest, Compass::NorthEast],
            Side::East => [Compass::West, Compass::East],
            Side::SouthEast => [Compass::NorthWest, Compass::SouthEast],
        }
    }

    /// Edge sharing an endpoint with this one, in the given direction.
    pub fn neighbor(&self, direction: Compass) -> Result<EdgeCoord, GridError> {
        let t = self.tile;
        match (self.side, direction) {
            (Side::NorthEast, Compass::NorthWest) => Ok(Self::raw(t.offset(0, -1), Side::East)),
            (Side::NorthEast, Compass::West) => Ok(Self::raw(t.offset(0, -1), Side::SouthEast)),
            (Side::NorthEast, Compass::East) => Ok(Self::raw(t.offset(1, -1), Side::SouthEast)),
            (Side::NorthEast, Compass::SouthEast) => Ok(Self::raw(t, Side::East)),
            (Side::East, Compass::NorthEast) => Ok(Self::raw(t.offset(1, -1), Side::SouthEast)),
            (Side::East, Compass::NorthWest) => Ok(Self::raw(t, Side::NorthEast)),
            (Side::East, Compass::SouthWest) => Ok(Self::raw(t, Side::SouthEast)),
            (Side::East, Compass::SouthEast) => Ok(Self::raw(t.offset(0, 1), Side::NorthEast)),
            (Side::SouthEast, Compass::NorthEast) => Ok(Self::raw(t, Side::East)),
            (Side::SouthEast, Compass::East) => Ok(Self::raw(t.offset(0, 1), Side::NorthEast)),
            (Side::SouthEast, Compass::SouthWest) => Ok(Self::raw(t.offset(-1, 1), Side::East)),
            (Side::SouthEast, Compass::West) => Ok(Self::raw(t.offset(-1, 1), Side::NorthEast)),
            (_, d) => Err(invalid(d, "edge-edge")),
        }
    }

    /// Endpoint corner in the given direction.
    pub fn corner_toward(&self, direction: Compass) -> Result<CornerCoord, GridError> {
        let t = self.tile;
        match (self.side, direction) {
            (Side::NorthEast, Compass::NorthWest) => Ok(CornerCoord::new(t, Pole::North)),
            (Side::NorthEast, Compass::SouthEast) => {
                Ok(CornerCoord::new(t.offset(1, -1), Pole::South))
            }
            (Side::East, Compass::North) => Ok(CornerCoord::new(t.offset(1, -1), Pole::South)),
            (Side::East, Compass::South) => Ok(CornerCoord::new(t.offset(0, 1), Pole::North)),
            (Side::SouthEast, Compass::NorthEast) => {
                Ok(CornerCoord::new(t.offset(0, 1), Pole::North))
            }
            (Side::SouthEast, Compass::SouthWest) => Ok(CornerCoord::new(t, Pole::South)),
            (_, d) => Err(invalid(d, "edge-corner")),
        }
    }

    /// Sharing tile in the given direction.
    pub fn tile_toward(&self, direction: Compass) -> Result<TileCoord, GridError> {
        let t = self.tile;
        match (self.side, direction) {
            (Side::NorthEast, Compass::SouthWest) => Ok(t),
            (Side::NorthEast, Compass::NorthEast) => Ok(t.offset(1, -1)),
            (Side::East, Compass::West) => Ok(t),
            (Side::East, Compass::East) => Ok(t.offset(1, 0)),
            (Side::SouthEast, Compass::NorthWest) => Ok(t),
            (Side::SouthEast, Compass::SouthEast) => Ok(t.offset(0, 1)),
            (_, d) => Err(invalid(d, "edge-tile")),
        }
    }

    /// Both endpoint corners.
    pub fn endpoints(&self) -> [CornerCoord; 2] {
        self.corner_directions()
            .map(|d| self.corner_toward(d).expect("corner direction"))
    }

    /// Both sharing tiles.
    pub fn touching_tiles(&self) -> [TileCoord; 2] {
        self.tile_directions()
            .map(|d| self.tile_toward(d).expect("tile direction"))
    }

    /// The four edges sharing an endpoint with this one.
    pub fn adjacent_edges(&self) -> [EdgeCoord; 4] {
        self.edge_directions()
            .map(|d| self.neighbor(d).expect("edge direction"))
    }

    /// Pixel position of the edge midpoint.
    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let [a, b] = self.endpoints();
        let (ax, ay) = a.to_pixel(size);
        let (bx, by) = b.to_pixel(size);
        ((ax + bx) / 2.0, (ay + by) / 2.0)
    }
}

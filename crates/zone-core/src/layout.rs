//! Zone layout: hex grid cells to fixed world positions.
//!
//! Zones sit on a flat-top hex grid in offset coordinates. Odd columns are
//! pushed down by half a hex so the cells tile without gaps. The planar grid
//! is centered on the origin, scaled to world units and lifted by a
//! hand-tuned elevation per zone.
//!
//! The standard layout is computed once and shared read-only for the
//! lifetime of the process.

use glam::{Vec2, Vec3};
use std::sync::OnceLock;
use zone_events::{ZoneId, ZONE_COUNT};

/// Hexagon edge length in grid units.
pub const HEX_EDGE: f32 = 1.0;

/// Grid units to world units.
pub const WORLD_SCALE: f32 = 3.2;

/// Per-zone vertical offset in world units. Chosen by eye, not derived.
pub const ZONE_ELEVATION: [f32; ZONE_COUNT] = [0.0, 0.35, -0.2, 0.15, -0.3, 0.25, 0.1, -0.15];

/// Grid cell of each zone, indexed by zone id.
pub const ZONE_GRID: [GridCell; ZONE_COUNT] = [
    GridCell::new(0, 0),
    GridCell::new(2, 0),
    GridCell::new(1, 0),
    GridCell::new(3, 0),
    GridCell::new(1, 1),
    GridCell::new(2, 1),
    GridCell::new(0, 1),
    GridCell::new(3, 1),
];

/// Zone adjacency. Hand-picked: some neighbouring hexes are deliberately
/// left unconnected.
pub const ZONE_EDGES: [(ZoneId, ZoneId); 13] = [
    (0, 2),
    (2, 1),
    (1, 3),
    (0, 6),
    (2, 4),
    (2, 6),
    (2, 5),
    (3, 5),
    (3, 7),
    (1, 7),
    (4, 6),
    (6, 5),
    (5, 7),
];

/// Offset hex grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Center of this cell on the 2D plane, before centering and scaling.
    pub fn to_plane(self) -> Vec2 {
        let row_step = 3.0_f32.sqrt() * HEX_EDGE;
        let col_step = 1.5 * HEX_EDGE;
        let offset = if self.col.rem_euclid(2) == 1 {
            row_step / 2.0
        } else {
            0.0
        };
        Vec2::new(
            self.col as f32 * col_step,
            self.row as f32 * row_step + offset,
        )
    }
}

/// World positions and adjacency of every zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneLayout {
    positions: Vec<Vec3>,
    edges: Vec<(ZoneId, ZoneId)>,
}

impl ZoneLayout {
    /// Computes a layout from grid cells, per-zone elevations and an edge list.
    ///
    /// Missing elevations default to zero. The edge list is kept verbatim.
    pub fn compute(grid: &[GridCell], elevation: &[f32], edges: &[(ZoneId, ZoneId)]) -> Self {
        let planar: Vec<Vec2> = grid.iter().map(|cell| cell.to_plane()).collect();

        let centroid = if planar.is_empty() {
            Vec2::ZERO
        } else {
            planar.iter().copied().sum::<Vec2>() / planar.len() as f32
        };

        let positions = planar
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let centered = (*point - centroid) * WORLD_SCALE;
                let height = elevation.get(index).copied().unwrap_or(0.0);
                Vec3::new(centered.x, height, centered.y)
            })
            .collect();

        Self {
            positions,
            edges: edges.to_vec(),
        }
    }

    /// The map layout, computed on first use.
    pub fn standard() -> &'static ZoneLayout {
        static LAYOUT: OnceLock<ZoneLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            let layout = ZoneLayout::compute(&ZONE_GRID, &ZONE_ELEVATION, &ZONE_EDGES);
            tracing::debug!("Computed zone layout for {} zones", layout.len());
            layout
        })
    }

    /// World position of a zone, or `None` for unknown zones.
    pub fn position(&self, zone: ZoneId) -> Option<Vec3> {
        self.positions.get(usize::from(zone)).copied()
    }

    /// All positions, indexed by zone id.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Undirected adjacency pairs.
    pub fn edges(&self) -> &[(ZoneId, ZoneId)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Zones connected to `zone`.
    pub fn neighbors(&self, zone: ZoneId) -> impl Iterator<Item = ZoneId> + '_ {
        self.edges.iter().filter_map(move |&(a, b)| {
            if a == zone {
                Some(b)
            } else if b == zone {
                Some(a)
            } else {
                None
            }
        })
    }

    /// Returns true if the two zones share an edge, in either direction.
    pub fn are_adjacent(&self, a: ZoneId, b: ZoneId) -> bool {
        self.edges
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Mean of the planar (X/Z) components of every position.
    pub fn centroid(&self) -> Vec2 {
        if self.positions.is_empty() {
            return Vec2::ZERO;
        }
        let sum: Vec2 = self.positions.iter().map(|p| Vec2::new(p.x, p.z)).sum();
        sum / self.positions.len() as f32
    }

    /// Endpoints of every edge in world space. Edges naming unknown zones are skipped.
    pub fn edge_segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.edges
            .iter()
            .filter_map(|&(a, b)| Some((self.position(a)?, self.position(b)?)))
    }
}

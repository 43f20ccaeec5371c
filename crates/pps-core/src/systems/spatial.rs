//! Spatial Index
//!
//! Uniform grid over the domain used to bound neighbor searches. Cells are
//! `2r` wide, so every agent within `r` of a point lies in the point's own
//! cell or one of the eight cells around it.

use crate::components::agent::{Agent, AgentId};
use crate::geometry::Point;

/// Column/row address of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub col: usize,
    pub row: usize,
}

impl CellCoord {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// An agent as recorded at index construction time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    pub id: AgentId,
    pub position: Point,
}

/// Immutable grid of agent positions.
///
/// Built once per tick through [`SpatialIndexBuilder`] and only read afterwards.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    dimension: usize,
    /// Row-major cells: index = row * dimension + col
    cells: Vec<Vec<IndexEntry>>,
    len: usize,
}

impl SpatialIndex {
    /// An index with `ceil(domain_size / cell_size)` cells per side and no agents.
    pub fn empty(domain_size: f64, cell_size: f64) -> Self {
        let dimension = ((domain_size / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            dimension,
            cells: vec![Vec::new(); dimension * dimension],
            len: 0,
        }
    }

    /// Build an index holding each agent in the cell of its current position.
    pub fn build<'a>(
        agents: impl IntoIterator<Item = &'a Agent>,
        domain_size: f64,
        cell_size: f64,
    ) -> Self {
        let mut builder = SpatialIndexBuilder::new(domain_size, cell_size);
        for agent in agents {
            builder.insert(agent.id(), agent.position());
        }
        builder.finish()
    }

    /// Start an empty builder with the same geometry as this index.
    pub fn builder_like(&self) -> SpatialIndexBuilder {
        SpatialIndexBuilder {
            index: Self {
                cell_size: self.cell_size,
                dimension: self.dimension,
                cells: vec![Vec::new(); self.cells.len()],
                len: 0,
            },
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells per side
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of agents in the index
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell containing `position`.
    ///
    /// Positions outside the domain are clamped to the nearest edge cell.
    pub fn cell_of(&self, position: Point) -> CellCoord {
        CellCoord::new(self.axis_cell(position.x), self.axis_cell(position.y))
    }

    fn axis_cell(&self, value: f64) -> usize {
        // `as` saturates: negatives and NaN map to 0
        ((value / self.cell_size).floor() as usize).min(self.dimension - 1)
    }

    /// Entries stored in one cell.
    pub fn cell(&self, coord: CellCoord) -> &[IndexEntry] {
        if coord.col >= self.dimension || coord.row >= self.dimension {
            return &[];
        }
        &self.cells[coord.row * self.dimension + coord.col]
    }

    /// Every entry in the 3x3 block around `center`, clipped at the domain
    /// edges. There is no wraparound lookup across the edge.
    pub fn candidates(&self, center: CellCoord) -> impl Iterator<Item = &IndexEntry> + '_ {
        let last = self.dimension - 1;
        let cols = center.col.saturating_sub(1)..=(center.col + 1).min(last);
        let rows = center.row.saturating_sub(1)..=(center.row + 1).min(last);
        rows.flat_map(move |row| {
            cols.clone()
                .flat_map(move |col| self.cell(CellCoord::new(col, row)).iter())
        })
    }

    /// Entries other than `id` within `radius` of `position`, searched around `cell`.
    pub fn neighbors_of(
        &self,
        id: AgentId,
        position: Point,
        cell: CellCoord,
        radius: f64,
    ) -> impl Iterator<Item = &IndexEntry> + '_ {
        let radius_squared = radius * radius;
        self.candidates(cell).filter(move |entry| {
            entry.id != id && position.distance_squared(entry.position) <= radius_squared
        })
    }
}

/// Write side of a [`SpatialIndex`]; consumed once construction is done.
#[derive(Debug)]
pub struct SpatialIndexBuilder {
    index: SpatialIndex,
}

impl SpatialIndexBuilder {
    pub fn new(domain_size: f64, cell_size: f64) -> Self {
        Self {
            index: SpatialIndex::empty(domain_size, cell_size),
        }
    }

    /// Record an agent in the cell containing `position`.
    pub fn insert(&mut self, id: AgentId, position: Point) -> CellCoord {
        let coord = self.index.cell_of(position);
        let slot = coord.row * self.index.dimension + coord.col;
        self.index.cells[slot].push(IndexEntry { id, position });
        self.index.len += 1;
        coord
    }

    pub fn finish(self) -> SpatialIndex {
        self.index
    }
}

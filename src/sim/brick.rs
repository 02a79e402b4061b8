//! Bricks and the brick lattice
//!
//! The grid is a dense row-major array of `Option<Brick>` slots. A destroyed
//! brick leaves `None` behind; rows and columns never shift.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::hull::BrickCollision;
use crate::consts::{BASE_BRICK_SCORE, MIN_BRICK_SIZE};

/// Area-damage pattern of an explosive brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionType {
    /// Same row and same column, `dist` cells each way
    Radial,
    /// Same column, `2 * dist` cells each way
    Vertical,
    /// Same row, `2 * dist` cells each way
    Horizontal,
    /// Both diagonals, `dist` steps each way
    Diagonal,
}

impl ExplosionType {
    pub const ALL: [ExplosionType; 4] = [
        ExplosionType::Radial,
        ExplosionType::Vertical,
        ExplosionType::Horizontal,
        ExplosionType::Diagonal,
    ];
}

/// Payload carried by explosive bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub explosion_type: ExplosionType,
    /// Reach in grid cells
    pub explosion_dist: i32,
    /// Hits removed from each affected brick
    pub damage: u32,
}

/// Brick variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    Explosive(Explosion),
}

/// A single brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    position: Vec2,
    size: Vec2,
    pub kind: BrickKind,
    pub hits_left: u32,
    pub score: u32,
    pub collision: BrickCollision,
    /// Ticks until delayed removal, -1 when not armed
    pub ticks_before_explosion: i32,
    /// Set once this brick's cascade has run
    pub exploded: bool,
}

impl Brick {
    /// Create a brick; its hull is built from the final position and size
    pub fn new(rect: Rect, hits: u32, ball_radius: f32, ratio: f32) -> Self {
        Self {
            position: rect.pos,
            size: rect.size,
            kind: BrickKind::Normal,
            hits_left: hits,
            score: BASE_BRICK_SCORE,
            collision: BrickCollision::build(rect, ball_radius, ratio),
            ticks_before_explosion: -1,
            exploded: false,
        }
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn with_kind(mut self, kind: BrickKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Explosion payload, if this is an explosive brick
    pub fn explosion(&self) -> Option<Explosion> {
        match self.kind {
            BrickKind::Explosive(e) => Some(e),
            BrickKind::Normal => None,
        }
    }

    pub fn is_explosive(&self) -> bool {
        self.explosion().is_some()
    }

    /// Still blocks balls
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hits_left > 0
    }

    pub fn is_armed(&self) -> bool {
        self.ticks_before_explosion >= 0
    }

    /// Remove up to `amount` hits.
    /// Returns true only on the call that brings the brick to zero.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.hits_left == 0 {
            return false;
        }
        self.hits_left = self.hits_left.saturating_sub(amount);
        if self.hits_left == 0 {
            self.collision.visible = false;
            true
        } else {
            false
        }
    }
}

/// Lattice geometry shared by every brick of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Top-left of brick (0, 0)
    pub origin: Vec2,
    pub brick_size: Vec2,
    /// Gap between neighbouring bricks (columns, rows)
    pub padding: Vec2,
}

impl GridLayout {
    /// Fit `cols x rows` bricks across the world width and the given height.
    ///
    /// Padding that leaves no room gives bricks of `MIN_BRICK_SIZE`, and the
    /// lattice overflows the area.
    pub fn fit(world_width: f32, area_height: f32, cols: usize, rows: usize, padding: Vec2) -> Self {
        let cols_f = cols.max(1) as f32;
        let rows_f = rows.max(1) as f32;
        let brick_size = Vec2::new(
            (world_width - padding.x * (cols_f + 1.0)) / cols_f,
            (area_height - padding.y * (rows_f + 1.0)) / rows_f,
        )
        .max(Vec2::splat(MIN_BRICK_SIZE));
        Self {
            origin: padding,
            brick_size,
            padding,
        }
    }

    #[inline]
    pub fn pitch(&self) -> Vec2 {
        self.brick_size + self.padding
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let pos = self.origin + self.pitch() * Vec2::new(col as f32, row as f32);
        Rect::new(pos, self.brick_size)
    }
}

/// Inclusive row/column span of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub rows: (usize, usize),
    pub cols: (usize, usize),
}

impl CellRange {
    /// Cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> {
        let (c0, c1) = self.cols;
        let (r0, r1) = self.rows;
        (r0..=r1).flat_map(move |r| (c0..=c1).map(move |c| (r, c)))
    }
}

/// Fixed-size lattice of brick slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    rows: usize,
    cols: usize,
    layout: GridLayout,
    cells: Vec<Option<Brick>>,
}

impl BrickGrid {
    /// A grid with every slot empty
    pub fn empty(rows: usize, cols: usize, layout: GridLayout) -> Self {
        Self {
            rows,
            cols,
            layout,
            cells: vec![None; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    fn index(&self, row: isize, col: isize) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    /// Brick at (row, col); out-of-range coordinates yield `None`
    pub fn get(&self, row: isize, col: isize) -> Option<&Brick> {
        self.index(row, col).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, row: isize, col: isize) -> Option<&mut Brick> {
        self.index(row, col).and_then(|i| self.cells[i].as_mut())
    }

    /// Put a brick into a slot. Out-of-range coordinates are ignored.
    pub fn place(&mut self, row: usize, col: usize, brick: Brick) {
        if let Some(i) = self.index(row as isize, col as isize) {
            self.cells[i] = Some(brick);
        }
    }

    /// Empty a slot, returning what was there
    pub fn clear(&mut self, row: usize, col: usize) -> Option<Brick> {
        self.index(row as isize, col as isize)
            .and_then(|i| self.cells[i].take())
    }

    /// Occupied slots in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Brick)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|b| (i / cols, i % cols, b)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut Brick)> {
        let cols = self.cols;
        self.cells
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_mut().map(|b| (i / cols, i % cols, b)))
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Bricks that can still be hit
    pub fn alive(&self) -> usize {
        self.iter().filter(|(_, _, b)| b.is_alive()).count()
    }

    /// Cells whose footprint may touch `area`, or `None` if it misses the lattice
    pub fn cells_touching(&self, area: Rect) -> Option<CellRange> {
        if self.rows == 0 || self.cols == 0 {
            return None;
        }
        let pitch = self.layout.pitch();
        let min = (area.min() - self.layout.origin) / pitch;
        let max = (area.max() - self.layout.origin) / pitch;

        let last_col = (self.cols - 1) as f32;
        let last_row = (self.rows - 1) as f32;
        if max.x < 0.0 || max.y < 0.0 || min.x.floor() > last_col || min.y.floor() > last_row {
            return None;
        }

        Some(CellRange {
            cols: (
                min.x.floor().clamp(0.0, last_col) as usize,
                max.x.floor().clamp(0.0, last_col) as usize,
            ),
            rows: (
                min.y.floor().clamp(0.0, last_row) as usize,
                max.y.floor().clamp(0.0, last_row) as usize,
            ),
        })
    }

    /// Follow a horizontal ratio change on every hull
    pub fn rescale_hulls(&mut self, old_ratio: f32, new_ratio: f32, radius: f32) {
        for (_, _, brick) in self.iter_mut() {
            brick.collision.rescale(old_ratio, new_ratio, radius);
        }
    }
}

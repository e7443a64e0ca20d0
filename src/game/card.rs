//! Bingo card model and win detection
//!
//! A card is 25 cells in row-major order, one per (column, row) pair.
//! Cell identity is fixed at creation; `marked` is the only mutable field
//! and flips false -> true at most once.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One cell of the 5x5 grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Row-major index, 0..25
    pub id: u8,
    pub column: u8,
    pub row: u8,
    /// `None` for the free slot
    pub value: Option<u16>,
    pub marked: bool,
    pub is_free: bool,
}

/// Win rule variants, chosen per game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WinRule {
    /// Any full row, column, or either diagonal
    #[default]
    Line,
    /// All 25 cells marked
    Blackout,
    /// At least N non-free cells marked (the free slot does not count)
    AnyN(u8),
}

/// Width of each column's numeric window for a given level.
///
/// Narrow windows at low levels make golden offers easier to read;
/// the classic 15-wide windows apply from level 50 up.
pub fn column_span(level: u32) -> u16 {
    10 + (level.min(MAX_SCALING_LEVEL) / 10).min(5) as u16
}

/// Inclusive numeric range column `column` draws from at `level`
pub fn column_range(column: usize, level: u32) -> (u16, u16) {
    let span = column_span(level);
    let lo = column as u16 * span + 1;
    (lo, lo + span - 1)
}

/// A 5x5 bingo card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    cells: Vec<Cell>,
}

impl Card {
    /// Generate a card for `level`. Each column holds 5 unique values from
    /// its range; the center cell becomes a pre-marked free slot when
    /// `free_slot` is set, otherwise a live number.
    pub fn new<R: Rng>(level: u32, free_slot: bool, rng: &mut R) -> Self {
        let mut columns: [Vec<u16>; LANE_COUNT] = Default::default();
        for (c, col) in columns.iter_mut().enumerate() {
            let (lo, hi) = column_range(c, level);
            while col.len() < LANE_COUNT {
                let v = rng.random_range(lo..=hi);
                if !col.contains(&v) {
                    col.push(v);
                }
            }
        }

        let mut cells = Vec::with_capacity(CARD_CELLS);
        for r in 0..LANE_COUNT {
            for c in 0..LANE_COUNT {
                let is_free = free_slot && c == 2 && r == 2;
                cells.push(Cell {
                    id: (r * LANE_COUNT + c) as u8,
                    column: c as u8,
                    row: r as u8,
                    value: if is_free { None } else { Some(columns[c][r]) },
                    marked: is_free,
                    is_free,
                });
            }
        }
        Self { cells }
    }

    /// Build a card from explicit per-column values (tests, debugging)
    pub fn from_columns(columns: [[u16; 5]; 5], free_slot: bool) -> Self {
        let mut cells = Vec::with_capacity(CARD_CELLS);
        for r in 0..LANE_COUNT {
            for c in 0..LANE_COUNT {
                let is_free = free_slot && c == 2 && r == 2;
                cells.push(Cell {
                    id: (r * LANE_COUNT + c) as u8,
                    column: c as u8,
                    row: r as u8,
                    value: if is_free { None } else { Some(columns[c][r]) },
                    marked: is_free,
                    is_free,
                });
            }
        }
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cell_at(&self, column: usize, row: usize) -> &Cell {
        &self.cells[row * LANE_COUNT + column]
    }

    /// Mark the cell holding `value`, if present and unmarked.
    /// Values are unique per card by construction, so at most one cell
    /// changes; repeat calls for the same value are no-ops.
    pub fn mark_if_present(&mut self, value: u16) -> bool {
        if value == 0 {
            return false;
        }
        for cell in &mut self.cells {
            if cell.value == Some(value) && !cell.marked {
                cell.marked = true;
                return true;
            }
        }
        false
    }

    /// Mark every cell (debug force-win)
    pub fn mark_all(&mut self) {
        for cell in &mut self.cells {
            cell.marked = true;
        }
    }

    /// True if `value` appears anywhere in `column`
    pub fn column_contains(&self, column: usize, value: u16) -> bool {
        (0..LANE_COUNT).any(|r| self.cell_at(column, r).value == Some(value))
    }

    /// Column index holding `value`, if the card has it
    pub fn column_of(&self, value: u16) -> Option<u8> {
        self.cells
            .iter()
            .find(|c| c.value == Some(value))
            .map(|c| c.column)
    }

    /// Unmarked, non-free values grouped by column ("needed numbers")
    pub fn needed_by_column(&self) -> [Vec<u16>; 5] {
        let mut needed: [Vec<u16>; 5] = Default::default();
        for cell in &self.cells {
            if !cell.marked {
                if let Some(v) = cell.value {
                    needed[cell.column as usize].push(v);
                }
            }
        }
        needed
    }

    /// The 12 candidate win lines: 5 rows, 5 columns, both diagonals
    fn lines(&self) -> Vec<[&Cell; 5]> {
        let mut lines = Vec::with_capacity(12);
        for r in 0..LANE_COUNT {
            lines.push(std::array::from_fn(|c| self.cell_at(c, r)));
        }
        for c in 0..LANE_COUNT {
            lines.push(std::array::from_fn(|r| self.cell_at(c, r)));
        }
        lines.push(std::array::from_fn(|i| self.cell_at(i, i)));
        lines.push(std::array::from_fn(|i| self.cell_at(4 - i, i)));
        lines
    }

    /// Unmarked numbers that would each single-handedly complete a line
    pub fn near_miss_numbers(&self) -> Vec<u16> {
        let mut out: Vec<u16> = Vec::new();
        for line in self.lines() {
            let unmarked: Vec<&&Cell> = line.iter().filter(|c| !c.marked).collect();
            if let [only] = unmarked.as_slice() {
                if let Some(v) = only.value {
                    if !out.contains(&v) {
                        out.push(v);
                    }
                }
            }
        }
        out
    }

    /// Evaluate the card against a win rule
    pub fn check_win(&self, rule: WinRule) -> bool {
        match rule {
            WinRule::Line => self.lines().iter().any(|l| l.iter().all(|c| c.marked)),
            WinRule::Blackout => self.cells.iter().all(|c| c.marked),
            WinRule::AnyN(n) => {
                let marked = self.cells.iter().filter(|c| c.marked && !c.is_free).count();
                marked >= n as usize
            }
        }
    }
}

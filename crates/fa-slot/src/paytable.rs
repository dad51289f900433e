//! Paylines and win evaluation

use fa_core::{FaError, FaResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::symbols::SymbolCatalog;

/// Grid side length
pub const GRID_SIZE: usize = 3;

/// 3×3 grid of symbol IDs, indexed `[row][col]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid(pub [[u32; GRID_SIZE]; GRID_SIZE]);

impl Grid {
    pub fn new(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self(rows)
    }

    /// Nine independent weighted draws, row by row
    pub fn draw<R: Rng>(catalog: &SymbolCatalog, rng: &mut R) -> Self {
        let mut cells = [[0u32; GRID_SIZE]; GRID_SIZE];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = catalog.draw(rng);
            }
        }
        Self(cells)
    }

    pub fn at(&self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    pub fn rows(&self) -> &[[u32; GRID_SIZE]; GRID_SIZE] {
        &self.0
    }

    /// Reject grids holding IDs the catalog does not know
    pub fn validate(&self, catalog: &SymbolCatalog) -> FaResult<()> {
        for (r, row) in self.0.iter().enumerate() {
            for (c, id) in row.iter().enumerate() {
                if !catalog.contains(*id) {
                    return Err(FaError::InvalidParam(format!(
                        "unknown symbol id {} at row {}, column {}",
                        id, r, c
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render with symbol names, one row per line
    pub fn describe(&self, catalog: &SymbolCatalog) -> String {
        self.0
            .iter()
            .map(|row| {
                row.iter()
                    .map(|id| {
                        catalog
                            .get(*id)
                            .map(|s| format!("{:>9}", s.name))
                            .unwrap_or_else(|| format!("{:>9}", "?"))
                    })
                    .collect::<Vec<_>>()
                    .join(" |")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Payline shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Row,
    Column,
    Diagonal,
}

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    pub kind: LineKind,
    /// Cells as (row, col)
    pub cells: [(usize, usize); GRID_SIZE],
}

impl Payline {
    pub fn row(index: u8, row: usize) -> Self {
        Self {
            index,
            kind: LineKind::Row,
            cells: [(row, 0), (row, 1), (row, 2)],
        }
    }

    pub fn column(index: u8, col: usize) -> Self {
        Self {
            index,
            kind: LineKind::Column,
            cells: [(0, col), (1, col), (2, col)],
        }
    }

    /// Top-left to bottom-right when `falling`, else bottom-left to top-right
    pub fn diagonal(index: u8, falling: bool) -> Self {
        let cells = if falling {
            [(0, 0), (1, 1), (2, 2)]
        } else {
            [(2, 0), (1, 1), (0, 2)]
        };
        Self {
            index,
            kind: LineKind::Diagonal,
            cells,
        }
    }

    pub fn symbols(&self, grid: &Grid) -> [u32; GRID_SIZE] {
        self.cells.map(|(r, c)| grid.at(r, c))
    }
}

/// 3 rows, 3 columns, 2 diagonals
pub fn standard_paylines() -> Vec<Payline> {
    vec![
        Payline::row(0, 0),
        Payline::row(1, 1),
        Payline::row(2, 2),
        Payline::column(3, 0),
        Payline::column(4, 1),
        Payline::column(5, 2),
        Payline::diagonal(6, true),
        Payline::diagonal(7, false),
    ]
}

/// A matched payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    pub line_index: u8,
    pub kind: LineKind,
    /// Matched (non-wild) symbol
    pub symbol_id: u32,
    pub symbol_name: String,
    /// Points added to the reward
    pub payout: u64,
    /// Positions holding a wild
    pub wild_positions: Vec<(usize, usize)>,
}

/// Outcome of evaluating every payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub line_wins: Vec<LineWin>,
    pub match_count: usize,
    pub line_count: usize,
    /// Payout points plus the jackpot bonus when every line matched
    pub reward: u64,
    pub jackpot: bool,
}

/// Evaluates grids against a set of paylines
#[derive(Debug, Clone)]
pub struct PayTable {
    pub paylines: Vec<Payline>,
    /// Added to the reward when every payline matches
    pub jackpot_bonus: u64,
}

impl PayTable {
    pub fn standard(jackpot_bonus: u64) -> Self {
        Self {
            paylines: standard_paylines(),
            jackpot_bonus,
        }
    }

    /// Match a single line
    ///
    /// Wilds are dropped first. A line left empty (all wild) never matches;
    /// otherwise it matches when every remaining symbol equals the first.
    pub fn evaluate_line(
        &self,
        catalog: &SymbolCatalog,
        grid: &Grid,
        payline: &Payline,
    ) -> Option<LineWin> {
        let mut non_wild = Vec::with_capacity(GRID_SIZE);
        let mut wild_positions = Vec::new();

        for (row, col) in payline.cells {
            let id = grid.at(row, col);
            if catalog.is_wild(id) {
                wild_positions.push((row, col));
            } else {
                non_wild.push(id);
            }
        }

        let first = *non_wild.first()?;
        if non_wild.iter().any(|&id| id != first) {
            return None;
        }

        let symbol = catalog.get(first);
        Some(LineWin {
            line_index: payline.index,
            kind: payline.kind,
            symbol_id: first,
            symbol_name: symbol.map(|s| s.name.clone()).unwrap_or_default(),
            payout: symbol.map(|s| s.payout).unwrap_or(0),
            wild_positions,
        })
    }

    /// Evaluate every payline of a grid
    pub fn evaluate(&self, catalog: &SymbolCatalog, grid: &Grid) -> EvaluationResult {
        let line_wins: Vec<LineWin> = self
            .paylines
            .iter()
            .filter_map(|line| self.evaluate_line(catalog, grid, line))
            .collect();

        let match_count = line_wins.len();
        let line_count = self.paylines.len();
        let jackpot = line_count > 0 && match_count == line_count;

        let mut reward: u64 = line_wins.iter().map(|w| w.payout).sum();
        if jackpot {
            reward += self.jackpot_bonus;
        }

        EvaluationResult {
            line_wins,
            match_count,
            line_count,
            reward,
            jackpot,
        }
    }
}

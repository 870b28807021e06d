//! Level plans
//!
//! A plan is a grid of characters, one string per row. Each character is
//! either a static cell or an actor spawn:
//!
//! | char | meaning            |
//! |------|--------------------|
//! | `@`  | player             |
//! | `o`  | coin               |
//! | `=`  | horizontal lava    |
//! | `\|` | vertical lava      |
//! | `v`  | dripping lava      |
//! | `$`  | enemy              |
//! | `x`  | wall cell          |
//! | `!`  | lava cell          |
//!
//! Anything else is an empty cell.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Cell, LavaMode};
use crate::tuning::ConfigError;

/// Reasons a plan cannot become a level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("level plan has no rows")]
    Empty,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("level plan has no player spawn '@'")]
    MissingPlayer,

    #[error("level plan has {count} player spawns, expected exactly one")]
    MultiplePlayers { count: usize },
}

/// What a single plan character stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Static cell, no actor
    Cell(Cell),
    Player,
    Coin,
    Lava(LavaMode),
    Enemy,
}

impl Glyph {
    pub fn from_char(ch: char) -> Self {
        match ch {
            '@' => Glyph::Player,
            'o' => Glyph::Coin,
            '=' => Glyph::Lava(LavaMode::Horizontal),
            '|' => Glyph::Lava(LavaMode::Vertical),
            'v' => Glyph::Lava(LavaMode::Dripping),
            '$' => Glyph::Enemy,
            'x' => Glyph::Cell(Cell::Wall),
            '!' => Glyph::Cell(Cell::Lava),
            _ => Glyph::Cell(Cell::Empty),
        }
    }

    /// Static cell left behind in the grid (spawn cells are empty)
    pub fn cell(self) -> Cell {
        match self {
            Glyph::Cell(cell) => cell,
            _ => Cell::Empty,
        }
    }
}

/// A validated level plan: rectangular, exactly one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LevelPlan {
    rows: Vec<Vec<char>>,
}

impl LevelPlan {
    /// Validate rows into a plan
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, PlanError> {
        let rows: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();

        let expected = rows.first().map(Vec::len).ok_or(PlanError::Empty)?;
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(PlanError::RaggedRow {
                row,
                expected,
                found,
            });
        }

        let players = rows.iter().flatten().filter(|&&ch| ch == '@').count();
        match players {
            0 => return Err(PlanError::MissingPlayer),
            1 => {}
            count => return Err(PlanError::MultiplePlayers { count }),
        }

        Ok(Self { rows })
    }

    /// Parse a multi-line string, one row per line; trailing blank lines are dropped
    pub fn from_text(text: &str) -> Result<Self, PlanError> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        Self::parse(&lines)
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Every cell as `(x, y, glyph)` in row-major order
    pub fn glyphs(&self) -> impl Iterator<Item = (usize, usize, Glyph)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &ch)| (x, y, Glyph::from_char(ch)))
        })
    }

    /// Number of coin spawns
    pub fn coin_count(&self) -> usize {
        self.glyphs().filter(|&(_, _, g)| g == Glyph::Coin).count()
    }
}

impl TryFrom<Vec<String>> for LevelPlan {
    type Error = PlanError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(&rows)
    }
}

impl From<LevelPlan> for Vec<String> {
    fn from(plan: LevelPlan) -> Self {
        plan.rows.into_iter().map(|r| r.into_iter().collect()).collect()
    }
}

/// An ordered list of level plans, played first to last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSet {
    pub levels: Vec<LevelPlan>,
}

impl LevelSet {
    /// Parse a JSON array of plans (each an array of row strings)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let set = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Built-in levels
    pub fn builtin() -> Self {
        let levels = BUILTIN_LEVELS
            .iter()
            .filter_map(|rows| match LevelPlan::parse(*rows) {
                Ok(plan) => Some(plan),
                Err(e) => {
                    log::error!("Built-in level rejected: {}", e);
                    None
                }
            })
            .collect();
        Self { levels }
    }
}

const BUILTIN_LEVELS: &[&[&str]] = &[
    &[
        "                      ",
        "                      ",
        "  x              = x  ",
        "  x         o o    x  ",
        "  x @      xxxxx   x  ",
        "  xxxxx            x  ",
        "      x!!!!!!!!!!!!x  ",
        "      xxxxxxxxxxxxxx  ",
        "                      ",
    ],
    &[
        "                              ",
        "  x                        x  ",
        "  x   o    v        o      x  ",
        "  x                        x  ",
        "  x @      $      xxx      x  ",
        "  xxxxxxxxxxxxxx      xxxxxx  ",
        "               x!!!!!!x       ",
        "               xxxxxxxx       ",
    ],
    &[
        "                          ",
        "  x      |       |     x  ",
        "  x  o       o       o x  ",
        "  x                    x  ",
        "  x@    xxx   xxx      x  ",
        "  xxxx!!!!!!!!!!!!!!xxxx  ",
        "  xxxxxxxxxxxxxxxxxxxxxx  ",
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_plan() {
        let plan = LevelPlan::parse(&["x@ox", "xxxx"]).unwrap();
        assert_eq!(plan.width(), 4);
        assert_eq!(plan.height(), 2);
        assert_eq!(plan.coin_count(), 1);
    }

    #[test]
    fn test_empty_plan_rejected() {
        let rows: [&str; 0] = [];
        assert_eq!(LevelPlan::parse(&rows), Err(PlanError::Empty));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert_eq!(
            LevelPlan::parse(&["x@x", "xxxx"]),
            Err(PlanError::RaggedRow {
                row: 1,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_missing_player_rejected() {
        assert_eq!(
            LevelPlan::parse(&["x o", "xxx"]),
            Err(PlanError::MissingPlayer)
        );
    }

    #[test]
    fn test_two_players_rejected() {
        assert_eq!(
            LevelPlan::parse(&["@ @", "xxx"]),
            Err(PlanError::MultiplePlayers { count: 2 })
        );
    }

    #[test]
    fn test_glyph_legend() {
        assert_eq!(Glyph::from_char('x').cell(), Cell::Wall);
        assert_eq!(Glyph::from_char('!').cell(), Cell::Lava);
        assert_eq!(Glyph::from_char('?').cell(), Cell::Empty);
        assert_eq!(Glyph::from_char('v'), Glyph::Lava(LavaMode::Dripping));
        // Spawns leave an empty cell behind
        assert_eq!(Glyph::from_char('$').cell(), Cell::Empty);
        assert_eq!(Glyph::from_char('=').cell(), Cell::Empty);
    }

    #[test]
    fn test_from_text_drops_trailing_blank_lines() {
        let plan = LevelPlan::from_text("x@ox\nxxxx\n\n").unwrap();
        assert_eq!(plan.height(), 2);
    }

    #[test]
    fn test_level_set_json() {
        let set = LevelSet::from_json(r#"[["x@ox", "xxxx"], [" @ ", "xxx"]]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.levels[1].width(), 3);
    }

    #[test]
    fn test_level_set_json_rejects_bad_plan() {
        assert!(LevelSet::from_json(r#"[["x@ox", "xx"]]"#).is_err());
    }

    #[test]
    fn test_builtin_levels_all_valid() {
        let set = LevelSet::builtin();
        assert_eq!(set.len(), BUILTIN_LEVELS.len());
        assert!(set.levels.iter().all(|p| p.coin_count() > 0));
    }
}

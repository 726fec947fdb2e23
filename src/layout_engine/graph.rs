use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A cardinal direction: an axis plus a sign. Right and down point away from
/// the origin (positive), left and up towards it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_positive(self) -> bool { matches!(self, Direction::Right | Direction::Down) }

    /// Offset from a child index to its neighbour on this side.
    pub fn focus_offset(self) -> isize { if self.is_positive() { 1 } else { -1 } }

    /// The sibling index next to `index` on this side, if `len` children have one.
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        index.checked_add_signed(self.focus_offset()).filter(|&i| i < len)
    }
}

/// How a tiling container arranges its children. Only `Dwindle` containers take
/// part in dwindle insertion and navigation; the other kinds are laid out by
/// algorithms living outside this crate.
#[derive(
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayoutKind {
    Tiles,
    Accordion,
    #[default]
    Dwindle,
}

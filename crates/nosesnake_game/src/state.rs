//! # Snake State
//!
//! Everything one game owns. Replaced wholesale on restart.

use std::collections::VecDeque;
use std::fmt;

use nosesnake_shared::constants::{INITIAL_LENGTH, INITIAL_POSITION};
use nosesnake_shared::DirectionCommand;

/// Grid position in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position (grows downwards).
    pub y: i32,
}

impl Cell {
    /// Creates a cell.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Heading {
    /// Heading for a movement command, `None` for anything else.
    #[must_use]
    pub const fn from_command(command: DirectionCommand) -> Option<Self> {
        match command {
            DirectionCommand::Up => Some(Self::Up),
            DirectionCommand::Down => Some(Self::Down),
            DirectionCommand::Left => Some(Self::Left),
            DirectionCommand::Right => Some(Self::Right),
            DirectionCommand::NoChange | DirectionCommand::Start => None,
        }
    }

    /// The matching command.
    #[must_use]
    pub const fn as_command(self) -> DirectionCommand {
        match self {
            Self::Up => DirectionCommand::Up,
            Self::Down => DirectionCommand::Down,
            Self::Left => DirectionCommand::Left,
            Self::Right => DirectionCommand::Right,
        }
    }

    /// 180° reverse.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `cell` moved one grid step of `step` pixels this way.
    #[must_use]
    pub const fn advance(self, cell: Cell, step: i32) -> Cell {
        match self {
            Self::Up => Cell::new(cell.x, cell.y - step),
            Self::Down => Cell::new(cell.x, cell.y + step),
            Self::Left => Cell::new(cell.x - step, cell.y),
            Self::Right => Cell::new(cell.x + step, cell.y),
        }
    }
}

/// One game.
///
/// `body.len() == score + 3` holds after every tick; `body[0]` is the head
/// and equals `position`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeState {
    /// Head position.
    pub position: Cell,
    /// Occupied cells, head first.
    pub body: VecDeque<Cell>,
    /// Current heading.
    pub direction: Heading,
    /// Food eaten.
    pub score: u32,
    /// Current food cell.
    pub food: Cell,
}

impl SnakeState {
    /// Starting layout: head at (100, 50), two segments trailing left,
    /// heading right.
    #[must_use]
    pub fn initial(food: Cell, cell: i32) -> Self {
        let (x, y) = INITIAL_POSITION;
        let body = (0..INITIAL_LENGTH as i32).map(|i| Cell::new(x - i * cell, y)).collect();
        Self {
            position: Cell::new(x, y),
            body,
            direction: Heading::Right,
            score: 0,
            food,
        }
    }

    /// Snake length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a live snake.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True if a non-head segment sits on the head.
    #[must_use]
    pub fn bites_itself(&self) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == self.position)
    }
}

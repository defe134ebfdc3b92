use crossterm::style::{Color, Stylize};

use std::fmt;

use crate::maze::grid::Direction;

/// Ground type of a cell. Only the weighted solvers look at it.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    #[default]
    Dirt,
    Grass,
    Mud,
    Water,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Dirt, Terrain::Grass, Terrain::Mud, Terrain::Water];

    /// Cost of stepping onto a cell of this terrain: one for the step itself plus
    /// the terrain penalty. Always at least 1, so Manhattan distance never
    /// overestimates the remaining cost.
    pub const fn cost(self) -> u32 {
        match self {
            Terrain::Dirt => 1,
            Terrain::Grass => 2,
            Terrain::Mud => 6,
            Terrain::Water => 11,
        }
    }

    /// Background color used when drawing the cell.
    pub fn color(self) -> Color {
        match self {
            Terrain::Dirt => Color::Rgb {
                r: 225,
                g: 200,
                b: 160,
            },
            Terrain::Grass => Color::Rgb {
                r: 100,
                g: 180,
                b: 60,
            },
            Terrain::Mud => Color::Rgb {
                r: 120,
                g: 90,
                b: 60,
            },
            Terrain::Water => Color::Rgb {
                r: 100,
                g: 200,
                b: 230,
            },
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terrain::Dirt => write!(f, "Dirt"),
            Terrain::Grass => write!(f, "Grass"),
            Terrain::Mud => write!(f, "Mud"),
            Terrain::Water => write!(f, "Water"),
        }
    }
}

/// Role of a cell in the current maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Start,
    Exit,
}

/// Per-position state of the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Wall flags indexed by [`Direction`]; `true` means the side is closed.
    walls: [bool; 4],
    /// Set while a generation or solve pass has reached this cell. Purely
    /// observational: the algorithms keep their own bookkeeping.
    visited: bool,
    terrain: Terrain,
    label: Option<Label>,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::CLOSED
    }
}

impl Cell {
    /// A cell with all four walls up and no other state.
    pub const CLOSED: Cell = Cell {
        walls: [true; 4],
        visited: false,
        terrain: Terrain::Dirt,
        label: None,
    };
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        !self.has_wall(direction)
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }

    /// Number of open sides.
    pub fn open_sides(&self) -> usize {
        self.walls.iter().filter(|&&wall| !wall).count()
    }

    // Mutators stay crate-private: only `Maze` changes cells, so it can keep
    // neighboring walls in sync and publish every change.

    pub(crate) fn open(&mut self, direction: Direction) {
        self.walls[direction.index()] = false;
    }

    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    pub(crate) fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
    }

    pub(crate) fn set_label(&mut self, label: Option<Label>) {
        self.label = label;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let background = self.terrain.color();
        let styled_symbol = match (self.label, self.visited) {
            (Some(Label::Start), _) => "S ".with(Color::Black).on(background).bold(),
            (Some(Label::Exit), _) => "E ".with(Color::Red).on(background).bold(),
            (None, true) => "··".with(Color::DarkGrey).on(background),
            (None, false) => "  ".with(Color::Reset).on(background),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Cell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_costs_increase() {
        let costs = Terrain::ALL.map(Terrain::cost);
        assert!(costs.iter().all(|&c| c > 0));
        assert!(costs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_closed_cell() {
        let cell = Cell::default();
        assert!(Direction::ALL.iter().all(|&d| cell.has_wall(d)));
        assert_eq!(cell.open_sides(), 0);
        assert_eq!(cell.terrain(), Terrain::Dirt);
        assert_eq!(cell.label(), None);
        assert!(!cell.visited());
    }

    #[test]
    fn test_open_side() {
        let mut cell = Cell::CLOSED;
        cell.open(Direction::Left);
        assert!(cell.is_open(Direction::Left));
        assert!(cell.has_wall(Direction::Top));
        assert_eq!(cell.open_sides(), 1);
    }

    #[test]
    fn test_display_width() {
        let mut cell = Cell::CLOSED;
        cell.set_visited(true);
        // Rendering asserts the glyph width in debug builds
        assert!(!cell.to_string().is_empty());
        cell.set_label(Some(Label::Exit));
        assert!(cell.to_string().contains('E'));
    }
}

pub mod cell;
mod event;
mod grid;

use std::sync::mpsc::SyncSender;

pub use cell::{Cell, Label, Terrain};
pub use event::{MazeEvent, RunReport};
pub use grid::{Coord, Direction, Grid};

use crate::error::{MazeError, Result};

/// A rectangular maze of [`Cell`]s plus the state a solve pass publishes for
/// rendering.
///
/// Every mutation goes through this type so that the two sides of a wall are
/// always changed together and every change reaches the event sender, if any.
pub struct Maze {
    grid: Grid<Cell>,
    start: Option<Coord>,
    exit: Option<Coord>,
    /// Cell currently being carved or expanded
    processing: Option<Coord>,
    /// Path found by the last solve
    path: Vec<Coord>,
    sender: Option<SyncSender<MazeEvent>>,
}

impl Maze {
    /// Creates a maze of the given size with every wall closed.
    ///
    /// Returns [`MazeError::InvalidConfiguration`] if either dimension is zero.
    pub fn new(width: u16, height: u16, sender: Option<SyncSender<MazeEvent>>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidConfiguration(format!(
                "maze dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Maze {
            grid: Grid::new(width, height, Cell::CLOSED),
            start: None,
            exit: None,
            processing: None,
            path: Vec::new(),
            sender,
        })
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        self.grid.in_bounds(coord)
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.in_bounds(coord).then(|| &self.grid[coord])
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn exit(&self) -> Option<Coord> {
        self.exit
    }

    /// Whether both endpoints are placed, i.e. the maze can be solved.
    pub fn is_ready(&self) -> bool {
        self.start.is_some() && self.exit.is_some()
    }

    pub fn processing(&self) -> Option<Coord> {
        self.processing
    }

    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// The adjacent cell in `direction`, or `None` at the boundary.
    pub fn neighbor_of(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        self.grid.neighbor(coord, direction)
    }

    /// Cells reachable from `coord` through an open wall, ordered Top, Right, Bottom, Left.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.grid
            .neighbors(coord)
            .filter(move |&(dir, _)| self.grid[coord].is_open(dir))
            .map(|(_, c)| c)
    }

    /// Number of open walls between pairs of cells.
    pub fn open_passages(&self) -> usize {
        self.grid
            .coords()
            .map(|c| {
                [Direction::Right, Direction::Bottom]
                    .into_iter()
                    .filter(|&dir| {
                        self.grid.neighbor(c, dir).is_some() && self.grid[c].is_open(dir)
                    })
                    .count()
            })
            .sum()
    }

    /// Closes every wall and clears terrain, labels, visited flags and the last path.
    pub fn reset(&mut self) {
        self.grid.fill(Cell::CLOSED);
        self.start = None;
        self.exit = None;
        self.processing = None;
        self.path.clear();
        self.emit(MazeEvent::Reset {
            width: self.width(),
            height: self.height(),
        });
    }

    /// Opens the wall on the `direction` side of `from`, together with the matching
    /// wall of the neighbor on the other side.
    ///
    /// Returns `true` if a wall was removed, `false` if it was already open or
    /// `from` sits on the boundary in that direction.
    pub fn open_wall(&mut self, from: Coord, direction: Direction) -> bool {
        let Some(to) = self.neighbor_of(from, direction) else {
            return false;
        };
        if self.grid[from].is_open(direction) {
            return false;
        }
        self.update(from, |cell| cell.open(direction));
        self.update(to, |cell| cell.open(direction.opposite()));
        true
    }

    /// # Panics
    /// If `coord` is out of bounds.
    pub fn set_terrain(&mut self, coord: Coord, terrain: Terrain) {
        self.update(coord, |cell| cell.set_terrain(terrain));
    }

    /// # Panics
    /// If `coord` is out of bounds.
    pub fn mark_visited(&mut self, coord: Coord) {
        self.update(coord, |cell| cell.set_visited(true));
    }

    /// Clears the visited flag of every cell.
    pub fn clear_visited(&mut self) {
        let visited = self
            .grid
            .coords()
            .filter(|&c| self.grid[c].visited())
            .collect::<Vec<_>>();
        for coord in visited {
            self.update(coord, |cell| cell.set_visited(false));
        }
    }

    /// Labels `coord` as the start cell, moving the label if a start was set before.
    ///
    /// # Panics
    /// If `coord` is out of bounds.
    pub fn set_start(&mut self, coord: Coord) {
        if let Some(old) = self.start.take() {
            self.update(old, |cell| cell.set_label(None));
        }
        self.update(coord, |cell| cell.set_label(Some(Label::Start)));
        self.start = Some(coord);
    }

    /// Labels `coord` as the exit cell and forces its terrain to the cheapest kind.
    ///
    /// # Panics
    /// If `coord` is out of bounds.
    pub fn set_exit(&mut self, coord: Coord) {
        if let Some(old) = self.exit.take() {
            self.update(old, |cell| cell.set_label(None));
        }
        self.update(coord, |cell| {
            cell.set_label(Some(Label::Exit));
            cell.set_terrain(Terrain::Dirt);
        });
        self.exit = Some(coord);
    }

    pub fn set_processing(&mut self, coord: Option<Coord>) {
        if self.processing != coord {
            self.processing = coord;
            self.emit(MazeEvent::Processing(coord));
        }
    }

    pub fn set_path(&mut self, path: Vec<Coord>) {
        self.path = path;
        self.emit(MazeEvent::PathChanged(self.path.clone()));
    }

    /// Apply `f` to the cell at `coord` and publish the change, if there was one.
    fn update(&mut self, coord: Coord, f: impl FnOnce(&mut Cell)) {
        let cell = &mut self.grid[coord];
        let old = *cell;
        f(cell);
        let new = *cell;
        if old != new {
            self.emit(MazeEvent::CellChanged { coord, cell: new });
        }
    }

    fn emit(&self, event: MazeEvent) {
        if let Some(sender) = &self.sender {
            // A dropped receiver only means nobody is watching anymore
            let _ = sender.send(event);
        }
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

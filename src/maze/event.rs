use crate::{
    generators::GenerationReport,
    maze::{Cell, Coord},
    solvers::SolveReport,
};

/// Progress notification pushed by the engine while it works on the maze.
///
/// Events are sent in the order the changes happen, so replaying them on top of an
/// all-walls grid of the announced size reproduces the maze exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum MazeEvent {
    /// The grid was reset to all walls before a new generation.
    Reset { width: u16, height: u16 },
    /// A cell changed walls, visited flag, terrain or label.
    CellChanged { coord: Coord, cell: Cell },
    /// The cell currently being carved or expanded, `None` once a pass is over.
    Processing(Option<Coord>),
    /// The path found by the last solve. Empty when the path was cleared or none exists.
    PathChanged(Vec<Coord>),
    /// The run is over and the engine accepts new requests.
    Finished(RunReport),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    Generated(GenerationReport),
    Solved(SolveReport),
}

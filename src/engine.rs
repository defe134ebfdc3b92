//! Background runner that owns the maze and allows one generation or solve at a time.

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender,
    },
    thread::JoinHandle,
};

use crate::{
    config::MazeConfig,
    error::{MazeError, Result},
    generators::{GenerationReport, Generator, generate_maze},
    maze::{Maze, MazeEvent, RunReport},
    solvers::{SolveReport, Solver, solve_between},
};

/// Claim on the engine's single worker slot, released when dropped, even if the
/// worker panics.
struct BusyToken(Arc<AtomicBool>);

impl BusyToken {
    fn acquire(busy: &Arc<AtomicBool>) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyToken(Arc::clone(busy)))
    }
}

impl Drop for BusyToken {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs generations and solves on a worker thread and reports progress through an
/// optional event channel.
///
/// Requests made while a run is in progress are rejected with [`MazeError::Busy`];
/// nothing is queued. A run is over once [`MazeEvent::Finished`] has been sent, or
/// once its join handle returns.
pub struct Engine {
    maze: Arc<Mutex<Maze>>,
    busy: Arc<AtomicBool>,
    config: MazeConfig,
    events: Option<SyncSender<MazeEvent>>,
}

impl Engine {
    /// Validates `config` and sets up an all-walls grid of the configured size.
    pub fn new(config: MazeConfig, events: Option<SyncSender<MazeEvent>>) -> Result<Self> {
        config.validate()?;
        let maze = Maze::new(config.width, config.height, events.clone())?;
        Ok(Engine {
            maze: Arc::new(Mutex::new(maze)),
            busy: Arc::new(AtomicBool::new(false)),
            config,
            events,
        })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Whether a generation or solve is running right now.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Read the maze. Blocks until the current run, if any, is over.
    pub fn with_maze<R>(&self, f: impl FnOnce(&Maze) -> R) -> R {
        f(&lock(&self.maze))
    }

    /// Start generating a new maze in the background.
    pub fn generate(&self, generator: Generator) -> Result<JoinHandle<GenerationReport>> {
        let token = self.claim("generate")?;
        let maze = Arc::clone(&self.maze);
        let config = self.config.clone();
        let events = self.events.clone();

        Ok(std::thread::spawn(move || {
            let report = generate_maze(&mut lock(&maze), generator, &config);
            // Free the slot before announcing completion so observers can react to
            // the announcement with a new request
            drop(token);
            notify(&events, MazeEvent::Finished(RunReport::Generated(report.clone())));
            report
        }))
    }

    /// Start solving the current maze in the background.
    ///
    /// Returns [`MazeError::NotReady`] if no maze has been generated yet.
    pub fn solve(&self, solver: Solver) -> Result<JoinHandle<SolveReport>> {
        let token = self.claim("solve")?;
        let endpoints = {
            let maze = lock(&self.maze);
            maze.start().zip(maze.exit())
        };
        let Some((start, exit)) = endpoints else {
            tracing::warn!("[engine] solve with {} rejected: no maze yet", solver);
            return Err(MazeError::NotReady);
        };

        let maze = Arc::clone(&self.maze);
        let seed = self.config.seed;
        let events = self.events.clone();

        Ok(std::thread::spawn(move || {
            let report = solve_between(&mut lock(&maze), solver, start, exit, seed);
            drop(token);
            notify(&events, MazeEvent::Finished(RunReport::Solved(report.clone())));
            report
        }))
    }

    fn claim(&self, request: &str) -> Result<BusyToken> {
        BusyToken::acquire(&self.busy).ok_or_else(|| {
            tracing::warn!("[engine] {} rejected: a run is in progress", request);
            MazeError::Busy
        })
    }
}

/// A worker that panicked mid-run leaves a half-carved grid behind, which the next
/// generation resets anyway.
fn lock(maze: &Mutex<Maze>) -> MutexGuard<'_, Maze> {
    maze.lock().unwrap_or_else(PoisonError::into_inner)
}

fn notify(events: &Option<SyncSender<MazeEvent>>, event: MazeEvent) {
    if let Some(sender) = events {
        let _ = sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{is_connected, is_valid_path};
    use std::sync::mpsc::{Receiver, sync_channel};

    /// Drain events until the next `Finished`, returning everything received.
    fn until_finished(rx: &Receiver<MazeEvent>) -> Vec<MazeEvent> {
        let mut events = Vec::new();
        for event in rx.iter() {
            let done = matches!(event, MazeEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn test_invalid_configuration() {
        let result = Engine::new(MazeConfig::new(0, 3), None);
        assert!(matches!(result, Err(MazeError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_generate_then_solve() {
        let engine = Engine::new(MazeConfig::new(10, 7).with_seed(Some(1)), None).unwrap();
        let generated = engine.generate(Generator::Kruskal).unwrap().join().unwrap();
        assert_eq!(generated.open_passages, 69);
        assert!(!engine.is_busy());

        let solved = engine.solve(Solver::AStar).unwrap().join().unwrap();
        assert!(solved.found());
        engine.with_maze(|maze| {
            assert!(is_connected(maze));
            assert!(is_valid_path(maze, &solved.path));
            assert_eq!(maze.path(), solved.path.as_slice());
            assert_eq!(maze.exit(), Some(generated.exit));
        });
    }

    #[test]
    fn test_solve_before_generate_is_rejected() {
        let engine = Engine::new(MazeConfig::new(4, 4), None).unwrap();
        assert!(matches!(engine.solve(Solver::Bfs), Err(MazeError::NotReady)));
        // The rejected request must not hold on to the worker slot
        assert!(!engine.is_busy());
        assert!(engine.generate(Generator::Prim).unwrap().join().is_ok());
    }

    #[test]
    fn test_requests_rejected_while_busy() {
        // A rendezvous channel stalls the worker on its first event until we receive
        let (tx, rx) = sync_channel(0);
        let engine = Engine::new(MazeConfig::new(6, 6).with_seed(Some(3)), Some(tx)).unwrap();

        let handle = engine.generate(Generator::Prim).unwrap();
        assert!(engine.is_busy());
        assert!(matches!(engine.generate(Generator::Kruskal), Err(MazeError::Busy)));
        assert!(matches!(engine.solve(Solver::Dfs), Err(MazeError::Busy)));

        let events = until_finished(&rx);
        assert!(matches!(events.first(), Some(MazeEvent::Reset { width: 6, height: 6 })));
        // The slot is already free when completion is announced
        assert!(!engine.is_busy());
        let report = handle.join().unwrap();
        assert_eq!(
            events.last(),
            Some(&MazeEvent::Finished(RunReport::Generated(report)))
        );

        let handle = engine.solve(Solver::Dfs).unwrap();
        assert!(matches!(engine.solve(Solver::Bfs), Err(MazeError::Busy)));
        let events = until_finished(&rx);
        let report = handle.join().unwrap();
        let expansions = events
            .iter()
            .filter(|e| matches!(e, MazeEvent::Processing(Some(_))))
            .count();
        assert_eq!(expansions, report.expanded);
        assert!(events.contains(&MazeEvent::PathChanged(report.path.clone())));
    }

    #[test]
    fn test_events_replay_to_the_same_maze() {
        let (tx, rx) = sync_channel(256);
        let engine = Engine::new(
            MazeConfig::new(7, 5).with_seed(Some(12)).with_braid(true),
            Some(tx),
        )
        .unwrap();
        engine.generate(Generator::Prim).unwrap();
        let events = until_finished(&rx);

        let mut replica = crate::maze::Grid::new(7, 5, crate::maze::Cell::CLOSED);
        for event in events {
            if let MazeEvent::CellChanged { coord, cell } = event {
                replica[coord] = cell;
            }
        }
        engine.with_maze(|maze| {
            assert!(replica.iter().eq(maze.grid().iter()));
        });
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let engine =
                Engine::new(MazeConfig::new(12, 12).with_seed(Some(99)).with_braid(true), None)
                    .unwrap();
            let generated = engine.generate(Generator::Prim).unwrap().join().unwrap();
            let solved = engine.solve(Solver::Dfs).unwrap().join().unwrap();
            (generated, solved)
        };
        assert_eq!(run(), run());
    }
}

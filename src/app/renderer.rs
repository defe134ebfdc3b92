use std::{
    collections::VecDeque,
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError, TryRecvError},
    },
    time::Duration,
};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::maze::{Cell, Coord, Direction, Grid, MazeEvent, RunReport};

/// Requests from the main thread to the render thread
#[derive(Debug)]
pub enum UiEvent {
    /// Append a line to the log area
    Log(LogLine),
    /// Terminal resize
    Resize,
    /// Decrease the delay between animation steps
    SpeedUp,
    /// Increase the delay between animation steps
    SlowDown,
}

/// A message shown in the log rows below the maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    text: String,
    color: Color,
}

impl LogLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::Cyan,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::Green,
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::Yellow,
        }
    }

    /// The line cut to fit in `columns` terminal columns.
    fn styled(&self, columns: u16) -> StyledContent<&str> {
        let (text, _) = self.text.unicode_truncate(columns as usize);
        text.with(self.color).attribute(Attribute::Bold)
    }
}

impl From<&RunReport> for LogLine {
    fn from(report: &RunReport) -> Self {
        match report {
            RunReport::Generated(report) => LogLine::success(report.to_string()),
            RunReport::Solved(report) if report.found() => LogLine::success(report.to_string()),
            RunReport::Solved(report) => LogLine::warn(report.to_string()),
        }
    }
}

/// Delay after every animation step, adjustable while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDelay {
    micros: u64,
}

impl FrameDelay {
    const MIN_MICROS: u64 = 50;
    const MAX_MICROS: u64 = 200_000;
    /// Rough time a whole pass over the grid should take at the default speed
    const PASS_MICROS: u64 = 3_000_000;

    /// Default delay for a grid of the given size, so small and large mazes animate
    /// in comparable time.
    pub fn calibrated(width: u16, height: u16) -> Self {
        let cells = (width as u64 * height as u64).max(1);
        Self {
            micros: (Self::PASS_MICROS / cells).clamp(Self::MIN_MICROS, 20_000),
        }
    }

    pub fn current(&self) -> Duration {
        Duration::from_micros(self.micros)
    }

    pub fn speed_up(&mut self) {
        self.micros = (self.micros / 2).max(Self::MIN_MICROS);
    }

    pub fn slow_down(&mut self) {
        self.micros = (self.micros * 2).min(Self::MAX_MICROS);
    }
}

/// Screen unit (in cell widths) of the inside of a cell. Walls and corners take one
/// unit each between cells.
fn interior_unit((x, y): Coord) -> (u16, u16) {
    (2 * x + 1, 2 * y + 1)
}

fn side_unit(coord: Coord, direction: Direction) -> (u16, u16) {
    let (ux, uy) = interior_unit(coord);
    match direction {
        Direction::Top => (ux, uy - 1),
        Direction::Right => (ux + 1, uy),
        Direction::Bottom => (ux, uy + 1),
        Direction::Left => (ux - 1, uy),
    }
}

fn move_to_unit((ux, uy): (u16, u16)) -> cursor::MoveTo {
    cursor::MoveTo(ux * Cell::CELL_WIDTH, uy)
}

/// Terminal columns and rows the maze takes up, without the log area.
pub fn screen_size(width: u16, height: u16) -> (u32, u32) {
    let units = |n: u16| 2 * n as u32 + 1;
    (units(width) * Cell::CELL_WIDTH as u32, units(height))
}

/// Largest maze that fits a terminal of the given size next to the log rows.
pub fn max_maze_size(columns: u16, rows: u16) -> (u16, u16) {
    let cells = |units: u16| (units.saturating_sub(1) / 2).max(1);
    (
        cells(columns / Cell::CELL_WIDTH),
        cells(rows.saturating_sub(NUM_LOG_ROWS)),
    )
}

const WALL: &str = "  ";
/// Rows reserved below the maze for log messages
pub const NUM_LOG_ROWS: u16 = 6;

/// What the render thread knows about the maze, rebuilt from [`MazeEvent`]s.
struct Mirror {
    cells: Grid<Cell>,
    /// Position of each cell on the current path
    path_index: Grid<Option<usize>>,
    path: Vec<Coord>,
    processing: Option<Coord>,
}

impl Mirror {
    fn new(width: u16, height: u16) -> Self {
        Self {
            cells: Grid::new(width, height, Cell::CLOSED),
            path_index: Grid::new(width, height, None),
            path: Vec::new(),
            processing: None,
        }
    }

    /// Overlay for the inside of a cell, or `None` to draw the cell itself.
    fn overlay(&self, coord: Coord) -> Option<StyledContent<&'static str>> {
        let cell = &self.cells[coord];
        let background = cell.terrain().color();
        if self.processing == Some(coord) {
            Some("<>".with(Color::Blue).on(background).bold())
        } else if self.path_index[coord].is_some() && cell.label().is_none() {
            Some("••".with(Color::Red).on(background).bold())
        } else {
            None
        }
    }

    fn side(&self, coord: Coord, direction: Direction) -> StyledContent<&'static str> {
        let cell = &self.cells[coord];
        if cell.has_wall(direction) {
            return WALL.on(Color::DarkGrey);
        }
        let background = cell.terrain().color();
        let on_path = self
            .cells
            .neighbor(coord, direction)
            .and_then(|next| Some((self.path_index[coord]?, self.path_index[next]?)))
            .is_some_and(|(a, b)| a.abs_diff(b) == 1);
        if on_path {
            "••".with(Color::Red).on(background).bold()
        } else {
            WALL.on(background)
        }
    }

    fn set_path(&mut self, path: Vec<Coord>) -> Vec<Coord> {
        for &coord in &self.path {
            self.path_index[coord] = None;
        }
        for (i, &coord) in path.iter().enumerate() {
            if self.path_index.in_bounds(coord) {
                self.path_index[coord] = Some(i);
            }
        }
        std::mem::replace(&mut self.path, path)
    }
}

/// Draws the maze and a few log rows, following the engine's events.
pub struct Renderer<W: Write> {
    out: W,
    mirror: Mirror,
    logs: VecDeque<LogLine>,
    frame_delay: FrameDelay,
    terminal_size: (u16, u16),
    /// Whether the terminal is large enough to draw the maze
    fits: bool,
}

impl<W: Write> Renderer<W> {
    /// How often the render loop checks the stop flag while no event arrives
    const POLL_TIMEOUT: Duration = Duration::from_millis(50);

    /// A renderer for an all-walls maze of the given size, matching a freshly created
    /// engine.
    pub fn new(out: W, width: u16, height: u16, terminal_size: (u16, u16)) -> Self {
        Self {
            out,
            mirror: Mirror::new(width, height),
            logs: VecDeque::with_capacity(NUM_LOG_ROWS as usize),
            frame_delay: FrameDelay::calibrated(width, height),
            terminal_size,
            fits: false,
        }
    }

    /// Render loop: applies maze events and UI requests until `should_stop` is set or
    /// every sender is gone.
    pub fn render(
        &mut self,
        maze_event_rx: Receiver<MazeEvent>,
        ui_event_rx: Receiver<UiEvent>,
        should_stop: &AtomicBool,
    ) -> std::io::Result<()> {
        self.redraw()?;
        'render: loop {
            if should_stop.load(Ordering::Acquire) {
                break;
            }

            loop {
                match ui_event_rx.try_recv() {
                    Ok(event) => self.handle_ui_event(event)?,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        tracing::debug!("[render] UI channel closed, exiting render thread");
                        break 'render;
                    }
                }
            }

            match maze_event_rx.recv_timeout(Self::POLL_TIMEOUT) {
                Ok(event) => {
                    let is_step = matches!(event, MazeEvent::Processing(Some(_)));
                    self.apply(event)?;
                    if is_step {
                        std::thread::sleep(self.frame_delay.current());
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("[render] maze event channel closed, exiting render thread");
                    break;
                }
            }
        }
        // Leave the cursor below everything we drew
        let bottom = self.log_top() + NUM_LOG_ROWS;
        queue!(self.out, cursor::MoveTo(0, bottom), cursor::Show)?;
        self.out.flush()
    }

    fn handle_ui_event(&mut self, event: UiEvent) -> std::io::Result<()> {
        match event {
            UiEvent::Log(line) => self.log(line),
            UiEvent::Resize => {
                let (columns, rows) = terminal::size()?;
                self.resize(columns, rows)
            }
            UiEvent::SpeedUp => {
                self.frame_delay.speed_up();
                self.log(LogLine::info(format!("Step delay {:?}", self.frame_delay.current())))
            }
            UiEvent::SlowDown => {
                self.frame_delay.slow_down();
                self.log(LogLine::info(format!("Step delay {:?}", self.frame_delay.current())))
            }
        }
    }

    /// Bring the mirror up to date with one event and draw what changed.
    pub fn apply(&mut self, event: MazeEvent) -> std::io::Result<()> {
        match event {
            MazeEvent::Reset { width, height } => {
                self.mirror = Mirror::new(width, height);
                return self.redraw();
            }
            MazeEvent::CellChanged { coord, cell } => {
                if !self.mirror.cells.in_bounds(coord) {
                    tracing::warn!("[render] change for {:?} outside the grid", coord);
                    return Ok(());
                }
                self.mirror.cells[coord] = cell;
                self.draw_cell(coord)?;
            }
            MazeEvent::Processing(coord) => {
                let previous = std::mem::replace(&mut self.mirror.processing, coord);
                for coord in previous.into_iter().chain(coord) {
                    self.draw_cell(coord)?;
                }
            }
            MazeEvent::PathChanged(path) => {
                let previous = self.mirror.set_path(path);
                let current = self.mirror.path.clone();
                for coord in previous.into_iter().chain(current) {
                    self.draw_cell(coord)?;
                }
            }
            MazeEvent::Finished(report) => return self.log(LogLine::from(&report)),
        }
        self.out.flush()
    }

    pub fn log(&mut self, line: LogLine) -> std::io::Result<()> {
        if self.logs.len() == NUM_LOG_ROWS as usize {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
        self.draw_logs()?;
        self.out.flush()
    }

    pub fn resize(&mut self, columns: u16, rows: u16) -> std::io::Result<()> {
        self.terminal_size = (columns, rows);
        self.redraw()
    }

    /// First row of the log area
    fn log_top(&self) -> u16 {
        if self.fits {
            2 * self.mirror.cells.height() + 1
        } else {
            // Below the "terminal too small" notice
            2
        }
    }

    /// Clear the screen and draw everything from the mirror.
    fn redraw(&mut self) -> std::io::Result<()> {
        let (width, height) = (self.mirror.cells.width(), self.mirror.cells.height());
        let (columns, rows) = self.terminal_size;
        let (needed_columns, needed_rows) = screen_size(width, height);
        self.fits = needed_columns <= columns as u32
            && needed_rows + NUM_LOG_ROWS as u32 <= rows as u32;

        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        if self.fits {
            for uy in (0..=2 * height).step_by(2) {
                for ux in (0..=2 * width).step_by(2) {
                    queue!(
                        self.out,
                        move_to_unit((ux, uy)),
                        style::PrintStyledContent(WALL.on(Color::DarkGrey))
                    )?;
                }
            }
            for coord in self.mirror.cells.coords() {
                self.draw_cell(coord)?;
            }
        } else {
            let msg = format!(
                "Terminal too small ({}x{}) to draw a {}x{} maze, it needs {}x{}. Please resize the terminal.",
                columns,
                rows,
                width,
                height,
                needed_columns,
                needed_rows + NUM_LOG_ROWS as u32
            );
            let (msg, _) = msg.unicode_truncate(columns as usize);
            queue!(
                self.out,
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold))
            )?;
        }
        self.draw_logs()?;
        self.out.flush()
    }

    fn draw_cell(&mut self, coord: Coord) -> std::io::Result<()> {
        if !self.fits || !self.mirror.cells.in_bounds(coord) {
            return Ok(());
        }
        queue!(self.out, move_to_unit(interior_unit(coord)))?;
        let cell = self.mirror.cells[coord];
        match self.mirror.overlay(coord) {
            Some(glyph) => queue!(self.out, style::PrintStyledContent(glyph))?,
            None => queue!(self.out, style::Print(cell))?,
        }
        for direction in Direction::ALL {
            let glyph = self.mirror.side(coord, direction);
            queue!(
                self.out,
                move_to_unit(side_unit(coord, direction)),
                style::PrintStyledContent(glyph)
            )?;
        }
        Ok(())
    }

    fn draw_logs(&mut self) -> std::io::Result<()> {
        let top = self.log_top();
        let columns = self.terminal_size.0;
        for row in 0..NUM_LOG_ROWS {
            queue!(
                self.out,
                cursor::MoveTo(0, top + row),
                terminal::Clear(ClearType::CurrentLine)
            )?;
            if let Some(line) = self.logs.get(row as usize) {
                queue!(self.out, style::PrintStyledContent(line.styled(columns)))?;
            }
        }
        Ok(())
    }
}

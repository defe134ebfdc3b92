mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError, Sender},
    },
    thread::JoinHandle,
    time::Duration,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::{LogLine, Renderer, UiEvent, max_maze_size},
    config::MazeConfig,
    engine::Engine,
    generators::Generator,
    maze::MazeEvent,
    solvers::Solver,
};

enum UserInputEvent {
    KeyPress(event::KeyEvent),
    Resize,
}

/// Something the user asked the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Generate(Generator),
    Solve(Solver),
}

impl Request {
    fn from_key(key: char) -> Option<Request> {
        match key.to_ascii_lowercase() {
            'p' => Some(Request::Generate(Generator::Prim)),
            'k' => Some(Request::Generate(Generator::Kruskal)),
            'b' => Some(Request::Solve(Solver::Bfs)),
            'd' => Some(Request::Solve(Solver::Dfs)),
            'j' => Some(Request::Solve(Solver::Dijkstra)),
            'a' => Some(Request::Solve(Solver::AStar)),
            _ => None,
        }
    }

    /// Hand the request to the engine and describe the outcome for the log area.
    /// Rejections are not errors for the app, they only get a log line.
    fn submit(self, engine: &Engine) -> LogLine {
        let started = match self {
            Request::Generate(generator) => engine
                .generate(generator)
                .map(|_| format!("Generating with {}...", generator)),
            Request::Solve(solver) => engine
                .solve(solver)
                .map(|_| format!("Solving with {}...", solver)),
        };
        match started {
            Ok(msg) => LogLine::info(msg),
            Err(e) => LogLine::warn(format!("Request ignored: {}", e)),
        }
    }
}

pub struct App {
    /// Timeout for receiving input events, a.k.a. how often to check whether the
    /// render thread is still alive
    input_recv_timeout: Duration,
    /// Timeout for polling input events in the input thread, a.k.a.
    /// how often to check for the stop flag
    user_input_event_poll_timeout: Duration,
    /// Seed passed on to every run, for reproducible mazes
    seed: Option<u64>,
    /// Braid setting from the command line. Asked interactively when unset.
    braid: Option<bool>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_recv_timeout: Duration::from_millis(100),
            user_input_event_poll_timeout: Duration::from_millis(100),
            seed: None,
            braid: None,
        }
    }
}

impl App {
    /// Maximum number of maze events to buffer in the channel between the engine and
    /// render threads
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_braid(mut self, braid: Option<bool>) -> Self {
        self.braid = braid;
        self
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let Some((width, height)) = App::ask_maze_dimensions(stdout)? else {
            return Ok(());
        };

        let braid = match self.braid {
            Some(braid) => braid,
            None => match App::select_from_menu(
                stdout,
                "Braid the maze so it has loops? (use arrow keys and Enter, or Esc to exit):",
                &["No", "Yes"],
            )? {
                Some(choice) => choice == "Yes",
                None => return Ok(()),
            },
        };

        let config = MazeConfig::new(width, height)
            .with_seed(self.seed)
            .with_braid(braid);
        let (maze_event_tx, maze_event_rx) =
            std::sync::mpsc::sync_channel::<MazeEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);
        let engine = match Engine::new(config, Some(maze_event_tx)) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!("[app] {}", e);
                stdout.execute(style::PrintStyledContent(
                    format!("{}\r\n", e).with(Color::Red).attribute(Attribute::Bold),
                ))?;
                return Ok(());
            }
        };

        // Flag to tell the input and render threads to exit. Set by the main thread on Esc.
        let should_stop = Arc::new(AtomicBool::new(false));

        let (user_input_event_tx, user_input_event_rx) =
            std::sync::mpsc::channel::<UserInputEvent>();
        let user_input_event_poll_timeout = self.user_input_event_poll_timeout;
        let should_stop_for_input = should_stop.clone();
        // Spawn a thread to listen for user input
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_to_user_input(
                user_input_event_tx,
                user_input_event_poll_timeout,
                &should_stop_for_input,
            )
        });

        let (ui_event_tx, ui_event_rx) = std::sync::mpsc::channel::<UiEvent>();
        let terminal_size = terminal::size()?;
        let should_stop_for_render = should_stop.clone();
        // Spawn a thread to follow maze events and draw the maze
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = Renderer::new(std::io::stdout(), width, height, terminal_size);
            renderer.render(maze_event_rx, ui_event_rx, &should_stop_for_render)
        });

        // Error only happens if the render thread is gone already
        ui_event_tx
            .send(UiEvent::Log(LogLine::info(
                "p/k: generate with Prim/Kruskal | b/d/j/a: solve with BFS/DFS/Dijkstra/A* | ↑/↓: speed | Esc: exit",
            )))
            .ok();

        self.app_loop(
            &engine,
            user_input_event_rx,
            ui_event_tx,
            &should_stop,
            &render_thread_handle,
        );
        should_stop.store(true, Ordering::Release);

        let joined = |name: &str| std::io::Error::other(format!("{} thread panicked", name));
        input_thread_handle.join().map_err(|_| joined("input"))??;
        render_thread_handle.join().map_err(|_| joined("render"))??;
        // A run still in progress finishes on its own once its events have nowhere to go
        tracing::info!("[app] exiting, engine busy: {}", engine.is_busy());
        Ok(())
    }

    /// App loop after starting input and render threads
    fn app_loop(
        &self,
        engine: &Engine,
        user_input_event_rx: Receiver<UserInputEvent>,
        ui_event_tx: Sender<UiEvent>,
        should_stop: &AtomicBool,
        render_thread_handle: &JoinHandle<std::io::Result<()>>,
    ) {
        tracing::info!("[app loop] started");
        loop {
            if render_thread_handle.is_finished() {
                tracing::warn!("[app loop] render thread exited early");
                break;
            }

            let event = match user_input_event_rx.recv_timeout(self.input_recv_timeout) {
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
                Ok(UserInputEvent::Resize) => UiEvent::Resize,
                Ok(UserInputEvent::KeyPress(key_event)) => match key_event.code {
                    KeyCode::Esc => {
                        tracing::debug!("[app loop] Esc key pressed, stopping");
                        should_stop.store(true, Ordering::Release);
                        break;
                    }
                    KeyCode::Up => UiEvent::SpeedUp,
                    KeyCode::Down => UiEvent::SlowDown,
                    KeyCode::Char(key) => match Request::from_key(key) {
                        Some(request) => {
                            tracing::debug!("[app loop] {:?} requested", request);
                            UiEvent::Log(request.submit(engine))
                        }
                        None => continue,
                    },
                    _ => continue,
                },
            };

            if ui_event_tx.send(event).is_err() {
                // Render thread has exited
                break;
            }
        }
        tracing::info!("[app loop] exiting");
    }

    /// Listen for user input events (key presses and resize)
    /// This function runs in a separate thread, and is the only place where user input is read
    fn listen_to_user_input(
        user_input_event_tx: Sender<UserInputEvent>,
        event_poll_timeout: Duration,
        should_stop: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            if should_stop.load(Ordering::Acquire) {
                return Ok(());
            }

            // Poll for events with a timeout
            if !event::poll(event_poll_timeout)? {
                continue;
            }

            // We only care about key presses and resizes
            let input_event = match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    UserInputEvent::KeyPress(key_event)
                }
                event::Event::Resize(_, _) => UserInputEvent::Resize,
                _ => continue,
            };

            let should_exit = matches!(
                input_event,
                UserInputEvent::KeyPress(event::KeyEvent {
                    code: KeyCode::Esc,
                    ..
                })
            );

            if user_input_event_tx.send(input_event).is_err() {
                // Receiver has been dropped, exit the thread
                return Ok(());
            }

            if should_exit {
                tracing::debug!("[input loop] Esc key pressed, exiting");
                return Ok(());
            }
        }
    }

    /// Get user input with real-time validation and feedback
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();

        let value = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            // Decide color based on validity
            let validation_result = validate(input.trim());
            let color = if validation_result.is_ok() {
                Color::Green
            } else {
                Color::Red
            };
            queue!(
                stdout,
                style::SetForegroundColor(color),
                style::Print(&input),
                style::ResetColor,
                style::Print(" \r\n")
            )?;

            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }

            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Enter => {
                        if let Ok(value) = validate(input.trim()) {
                            break Some(value);
                        }
                    }
                    KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => {
                        input.push(c);
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(value)
    }

    /// Parse a maze dimension between 1 and `max`. Empty input picks `max`.
    fn parse_dimension(s: &str, max: u16) -> Result<u16, String> {
        if s.is_empty() {
            return Ok(max);
        }
        let error_msg = format!("Please enter a valid number between 1 and {}.", max);
        match s.parse::<u16>() {
            Ok(n) if (1..=max).contains(&n) => Ok(n),
            _ => Err(error_msg),
        }
    }

    /// Ask user for maze dimensions that fit the current terminal
    /// Returns None if user cancels input with Esc
    fn ask_maze_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<(u16, u16)>> {
        stdout.execute(style::PrintStyledContent(
            "Enter maze dimensions, or press Esc to exit. Leave empty for the largest maze \
that fits the current terminal.\r\n"
                .with(Color::Blue),
        ))?;

        let max_size = || {
            terminal::size()
                .map(|(columns, rows)| max_maze_size(columns, rows))
                .unwrap_or((u8::MAX as u16, u8::MAX as u16))
        };
        let validate_width = |s: &str| App::parse_dimension(s, max_size().0);
        let validate_height = |s: &str| App::parse_dimension(s, max_size().1);

        let Some(width) = App::prompt_with_validation(stdout, "Width: ", validate_width)? else {
            return Ok(None);
        };
        stdout.execute(style::PrintStyledContent(
            format!("Width set to {}\r\n", width)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let Some(height) = App::prompt_with_validation(stdout, "Height: ", validate_height)?
        else {
            return Ok(None);
        };
        stdout.execute(style::PrintStyledContent(
            format!("Height set to {}\r\n", height)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        Ok(Some((width, height)))
    }

    /// Present a menu of options to the user and let them select one using arrow keys
    /// Returns None if user cancels input with Esc
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let selected_option = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;

            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = selected.checked_sub(1).unwrap_or(options.len() - 1);
                    }
                    KeyCode::Down => {
                        selected = (selected + 1) % options.len();
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(selected_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MazeError;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Request::from_key('p'), Some(Request::Generate(Generator::Prim)));
        assert_eq!(Request::from_key('K'), Some(Request::Generate(Generator::Kruskal)));
        assert_eq!(Request::from_key('j'), Some(Request::Solve(Solver::Dijkstra)));
        assert_eq!(Request::from_key('a'), Some(Request::Solve(Solver::AStar)));
        assert_eq!(Request::from_key('x'), None);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(App::parse_dimension("", 40), Ok(40));
        assert_eq!(App::parse_dimension("12", 40), Ok(12));
        assert!(App::parse_dimension("0", 40).is_err());
        assert!(App::parse_dimension("41", 40).is_err());
        assert!(App::parse_dimension("ten", 40).is_err());
    }

    #[test]
    fn test_rejected_request_becomes_warning() {
        let engine = Engine::new(MazeConfig::new(4, 4), None).unwrap();
        let line = Request::Solve(Solver::Bfs).submit(&engine);
        assert_eq!(
            line,
            LogLine::warn(format!("Request ignored: {}", MazeError::NotReady))
        );
        assert!(!engine.is_busy());
    }
}

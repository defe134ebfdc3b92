use terramaze::app::App;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: terramaze [--seed <u64>] [--braid | --no-braid]";

/// Log to a file, since the terminal belongs to the maze.
/// The returned guard flushes pending lines when dropped.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never("logs", "terramaze.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("terramaze=info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<App, String> {
    let mut app = App::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let seed = args
                    .next()
                    .ok_or("--seed needs a value")?
                    .parse::<u64>()
                    .map_err(|e| format!("invalid seed: {}", e))?;
                app = app.with_seed(Some(seed));
            }
            "--braid" => app = app.with_braid(Some(true)),
            "--no-braid" => app = app.with_braid(Some(false)),
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(app)
}

fn main() -> std::io::Result<()> {
    let app = match parse_args(std::env::args().skip(1)) {
        Ok(app) => app,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };
    let _guard = init_logging();

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("App exited with error: {}", e);
    }
    result
}

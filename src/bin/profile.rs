use std::time::Instant;

use terramaze::{Engine, Generator, MazeConfig, MazeEvent, Solver};
use tracing_subscriber::EnvFilter;

/// Headless runs of every generator and solver, draining events the way the renderer
/// would but without drawing.
fn main() -> terramaze::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("terramaze=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let config = MazeConfig::new(u8::MAX as u16, u8::MAX as u16)
        .with_seed(seed)
        .with_braid(true);
    let (event_tx, event_rx) = std::sync::mpsc::sync_channel::<MazeEvent>(1000);
    let drain = std::thread::spawn(move || event_rx.iter().count());
    let engine = Engine::new(config, Some(event_tx))?;

    for iter in 0..num_iters {
        for generator in Generator::ALL {
            let started = Instant::now();
            let Ok(report) = engine.generate(generator)?.join() else {
                eprintln!("{} panicked", generator);
                continue;
            };
            println!("[{}] {:?} {}", iter, started.elapsed(), report);

            for solver in Solver::ALL {
                let started = Instant::now();
                match engine.solve(solver)?.join() {
                    Ok(report) => println!("[{}] {:?} {}", iter, started.elapsed(), report),
                    Err(_) => eprintln!("{} panicked", solver),
                }
            }
        }
    }

    drop(engine);
    if let Ok(events) = drain.join() {
        println!("{} events emitted", events);
    }
    Ok(())
}

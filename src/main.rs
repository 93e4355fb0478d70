use std::{io, process, thread};
use todo_console::{Console, TaskStore, cli, console};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    // Quiet by default; RUST_LOG=todo_console=debug shows state changes.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let args = cli::parse_args();
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut store = match args.db_path {
        Some(ref path) => match TaskStore::open(path) {
            Ok(store) => Some(store),
            Err(e) => {
                eprintln!("Failed to open task database: {}", e);
                return Ok(());
            }
        },
        None => None,
    };

    let mut manager = match store.as_ref().map(TaskStore::load).transpose() {
        Ok(loaded) => loaded.unwrap_or_default(),
        Err(e) => {
            eprintln!("Failed to load tasks: {}", e);
            return Ok(());
        }
    };

    spawn_interrupt_handler();

    let mut console = Console::new(&mut manager);
    if let Some(store) = store.as_mut() {
        console = console.with_store(store);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = console.run(stdin.lock(), &mut stdout) {
        eprintln!("{}", e);
    }

    Ok(())
}

/// Ctrl-C ends the session with the same farewell as `exit`. Every change is
/// already saved by the time the prompt is shown, so nothing is lost.
fn spawn_interrupt_handler() {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            warn!(error = %e, "no interrupt handler");
            return;
        }
    };

    thread::spawn(move || {
        let signal = tokio::signal::ctrl_c();
        match console::wait_for_interrupt(&runtime, signal, &mut io::stdout()) {
            Ok(()) => process::exit(0),
            Err(e) => warn!(error = %e, "interrupt handler stopped"),
        }
    });
}

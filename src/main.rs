//! ttsd main entry point
//!
//! Startup sequence: parse arguments, initialize logging, load the
//! config file, construct the engine (the expensive part), resolve the
//! initial voice style, emit the readiness marker on stderr, then hand
//! stdin/stdout to the request loop.

use log::{error, info};
use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::io;
use std::process;
use ttsd::config::Config;
use ttsd::session::Session;
use ttsd::speech::create_engine;
use ttsd::{daemon, Result, TtsdError};

/// SIGINT/SIGTERM handler - flags the loop to exit cleanly
extern "C" fn handle_shutdown(_: libc::c_int) {
    daemon::request_shutdown();
}

fn main() {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    // stderr is the diagnostic channel the launching process watches, so
    // status lines default to visible; --debug raises verbosity
    env_logger::Builder::from_default_env()
        .filter_level(if debug_mode {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    info!("{} version {} starting", ttsd::APP_NAME, ttsd::VERSION);

    // Run the daemon
    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::load()?;
    info!("Configuration loaded from {}", config.path().display());

    // Positional arguments override the config file:
    // voice, language, speed, steps (all optional)
    let args: Vec<String> = std::env::args()
        .skip(1)
        .filter(|arg| arg != "--debug" && arg != "-d")
        .collect();

    let voice = args.first().cloned().unwrap_or_else(|| config.voice());
    let language = args.get(1).cloned().unwrap_or_else(|| config.language());
    let speed = match args.get(2) {
        Some(raw) => raw
            .parse()
            .map_err(|_| TtsdError::Config(format!("Invalid speed argument '{}'", raw)))?,
        None => config.speed(),
    };
    let steps = match args.get(3) {
        Some(raw) => raw
            .parse()
            .map_err(|_| TtsdError::Config(format!("Invalid steps argument '{}'", raw)))?,
        None => config.steps(),
    };

    info!(
        "Loading engine... voice={} lang={} speed={} steps={}",
        voice, language, speed, steps
    );
    let engine = create_engine(&config.backend())?;
    let mut session = Session::new(engine, &voice, &language, speed, steps)?;

    install_signal_handlers()?;

    // Readiness marker: the launching process blocks on this line before
    // sending its first frame. Written directly rather than through the
    // logger so log filtering can never suppress it.
    eprintln!("READY sample_rate={}", session.sample_rate());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    daemon::run(&mut input, &mut output, &mut session)?;

    info!("Daemon stopped");
    Ok(())
}

/// Install SIGINT/SIGTERM handlers
///
/// SA_RESTART is deliberately not set: a blocking stdin read has to
/// return EINTR for the loop to observe the shutdown flag.
fn install_signal_handlers() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_shutdown),
        SaFlags::empty(),
        SigSet::empty(),
    );

    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        unsafe {
            signal::sigaction(sig, &action).map_err(|e| {
                TtsdError::Other(format!("Failed to install {} handler: {}", sig, e))
            })?;
        }
    }

    Ok(())
}

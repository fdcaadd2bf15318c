use clap::Parser;
use orthoctl::{
    actuator::{ActuatorStack, MediaActuator, MediaKeyActuator, OsaScriptActuator},
    cli::{apply_overrides, choose_port, validate_port, Args},
    config::Settings,
    logging,
    midi::MidirSource,
    session::ControlSession,
    state::StatusBoard,
    ui::run_status_display,
};
use std::sync::Arc;
use std::thread;

fn main() {
    let args = Args::parse();
    let settings = load_settings(&args);
    initialize_logging(&settings);

    let ports = list_input_ports();

    if args.list_ports {
        print_available_ports(&ports);
        return;
    }

    let port = match resolve_port(&settings, &ports) {
        Some(port) => port,
        None => {
            let error_msg = "No MIDI port selected; pass --port or connect the remote";
            log::error!("{}", error_msg);
            eprintln!("{}", error_msg);
            std::process::exit(1);
        }
    };

    if let Err(message) = validate_port(&port, &ports) {
        // Not fatal: the supervisor waits for the port to appear.
        log::warn!("{}", message);
        println!("{}", message);
        println!("Waiting for it to appear...");
    }

    let actuators = build_actuator_stack();
    let board = StatusBoard::new();

    if !args.no_status {
        start_status_display(&board);
    }

    println!("Bridging '{}'. Press Ctrl+C to exit...", port);
    run_supervisor(&port, actuators, &settings, &board);
}

fn load_settings(args: &Args) -> Settings {
    match Settings::load(args.config.as_deref()) {
        Ok(mut settings) => {
            apply_overrides(args, &mut settings);
            settings
        }
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    }
}

fn initialize_logging(settings: &Settings) {
    if let Err(e) = logging::init_logger(settings.level_filter()) {
        eprintln!("Logger initialization failed: {}", e);
        std::process::exit(1);
    }
    log::info!("Application starting");
}

fn list_input_ports() -> Vec<String> {
    match MidirSource::list_input_ports() {
        Ok(ports) => ports,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn print_available_ports(ports: &[String]) {
    println!("Available MIDI input ports:");
    for port in ports {
        println!("  - {}", port);
    }
}

fn resolve_port(settings: &Settings, ports: &[String]) -> Option<String> {
    if let Some(port) = &settings.port {
        return Some(port.clone());
    }
    choose_port(ports)
}

fn build_actuator_stack() -> Arc<ActuatorStack> {
    let backends: Vec<Arc<dyn MediaActuator>> = vec![
        Arc::new(OsaScriptActuator::new()),
        Arc::new(MediaKeyActuator::new()),
    ];
    let stack = ActuatorStack::new(backends);
    log::info!("Actuator backends: {}", stack.backend_names().join(", "));
    Arc::new(stack)
}

fn start_status_display(board: &StatusBoard) {
    let display_board = board.clone();
    thread::spawn(move || {
        run_status_display(display_board);
    });
}

/// Outer connection loop: wait for the port, run one session against it,
/// tear down, repeat. Runs until the process is killed.
fn run_supervisor(
    port: &str,
    actuators: Arc<ActuatorStack>,
    settings: &Settings,
    board: &StatusBoard,
) {
    let mut announced_waiting = false;

    loop {
        if !MidirSource::is_present(port) {
            if !announced_waiting {
                log::info!("Waiting for '{}' to appear", port);
                announced_waiting = true;
            }
            thread::sleep(settings.poll_interval());
            continue;
        }
        announced_waiting = false;

        let source = match MidirSource::connect(port, settings.sysex_handshake) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Error connecting to '{}': {}", port, e);
                thread::sleep(settings.poll_interval());
                continue;
            }
        };

        let actuator: Arc<dyn MediaActuator> = actuators.clone();
        let mut session = ControlSession::begin(actuator, settings, board.clone());

        session.run(source.events(), settings.poll_interval(), || {
            MidirSource::is_present(port)
        });

        session.end();
        log::info!("Session over for '{}'; watching for its return", port);
        thread::sleep(settings.poll_interval());
    }
}

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use airwatch::location::{AirVisualClient, LocationMode, LocationResolver, SelectionInput};
use airwatch::render::render_state;
use airwatch::{logging, server, Config, Session, SessionState};

/// airwatch — current weather and air quality (AirVisual API)
///
/// Pick a place by country/state/city, by IP address, or by coordinates.
/// Leave out a lower level to list the choices for it.
///
/// Examples:
///   airwatch --country USA
///   airwatch --country USA --state Florida --city Miami
///   airwatch --auto
///   airwatch --lat 25.793449 --lon -80.139198
///   airwatch --serve --port 8080
#[derive(Parser)]
#[command(name = "airwatch", version, about, long_about = None)]
struct Cli {
    /// Location mode: city, nearest, or coords. Inferred from the other flags if omitted.
    #[arg(long, short = 'm')]
    mode: Option<LocationMode>,

    /// Country name as listed by the API (e.g. USA).
    #[arg(long)]
    country: Option<String>,

    /// State name within the country.
    #[arg(long)]
    state: Option<String>,

    /// City name within the state.
    #[arg(long)]
    city: Option<String>,

    /// Nearest city to this machine's IP address.
    #[arg(long, short = 'a')]
    auto: bool,

    /// Latitude (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Print the session state as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Serve the web page instead of answering once.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Path to a JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// AirVisual API key.
    #[arg(long, env = "AIRWATCH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// More log output (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Priority: --mode > --auto > --lat/--lon > any of --country/--state/--city
    fn effective_mode(&self) -> Option<LocationMode> {
        if self.mode.is_some() {
            return self.mode;
        }
        if self.auto {
            return Some(LocationMode::ByNetworkLocation);
        }
        if self.lat.is_some() || self.lon.is_some() {
            return Some(LocationMode::ByCoordinates);
        }
        if self.country.is_some() || self.state.is_some() || self.city.is_some() {
            return Some(LocationMode::ByAdministrativeName);
        }
        None
    }

    fn selection(&self) -> SelectionInput {
        SelectionInput {
            country: self.country.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            latitude: self.lat.clone(),
            longitude: self.lon.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // ── Configuration ───────────────────────────────────────────

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c.with_api_key(cli.api_key.clone()),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let session = Session::new(LocationResolver::new(AirVisualClient::new(&config)));

    // ── Web front end ───────────────────────────────────────────

    if cli.serve {
        return serve(&cli.host, cli.port, session);
    }

    // ── One-shot evaluation ─────────────────────────────────────

    let mode = cli.effective_mode();
    if mode.is_none() {
        print_usage();
        return ExitCode::FAILURE;
    }

    let mut session = session;
    let state = session.evaluate(mode, &cli.selection());

    if cli.json {
        match serde_json::to_string_pretty(state) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else if let SessionState::Failed(_) = state {
        eprint!("{}", render_state(state));
    } else {
        print!("{}", render_state(state));
    }

    match state {
        SessionState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

fn serve(host: &str, port: u16, session: Session<AirVisualClient>) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: cannot start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(server::start(host, port, session)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Error: No location specified.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  airwatch --country USA --state Florida --city Miami");
    eprintln!("  airwatch --auto");
    eprintln!("  airwatch --lat 25.793449 --lon -80.139198");
    eprintln!("  airwatch --serve");
}

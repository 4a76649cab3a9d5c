use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use std::{
    io::Read,
    path::{Path, PathBuf},
};

use wearcast_core::{
    Config, ForecastSnapshot, Geocoder, Location, TemperatureBias, UserPreferences, WeatherCode,
    assess,
    provider::{geocoder_from_config, openmeteo::parse_forecast, provider_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wearcast", version, about = "What to wear for the weather outside")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set preferences and a default location.
    Configure,

    /// Show severity and a wardrobe recommendation.
    Show(ShowArgs),

    /// Print the label for a WMO weather code.
    Code {
        code: u16,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Place name or address to look up, e.g. "Berlin"; defaults to the last location used.
    #[arg(conflicts_with_all = ["lat", "lon", "file"])]
    pub place: Option<String>,

    /// Latitude; defaults to the saved location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude; defaults to the saved location.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Read a saved Open-Meteo response instead of fetching ("-" for stdin).
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub file: Option<PathBuf>,

    /// Treat me as someone who runs cold for this run.
    #[arg(long, conflicts_with = "hot")]
    pub cold: bool,

    /// Treat me as someone who runs hot for this run.
    #[arg(long)]
    pub hot: bool,

    /// Prefer smarter, formal-ish pieces.
    #[arg(long)]
    pub formal: bool,

    /// Commuting by bike or on foot.
    #[arg(long)]
    pub bike: bool,

    /// Print the full assessment as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Saved preferences with this run's flags layered on top.
    pub fn preferences(&self, saved: UserPreferences) -> UserPreferences {
        let bias = if self.cold {
            TemperatureBias::RunsCold
        } else if self.hot {
            TemperatureBias::RunsHot
        } else {
            saved.bias
        };

        UserPreferences {
            bias,
            formal: saved.formal || self.formal,
            bike_walk: saved.bike_walk || self.bike,
        }
    }

    /// Where to fetch for: a searched place, named coordinates, or the saved location.
    async fn location(&self, config: &Config, geocoder: &dyn Geocoder) -> anyhow::Result<Location> {
        if let Some(place) = self.place.as_deref().map(str::trim) {
            return match geocoder.search(place).await? {
                Some(found) => Ok(found),
                None => bail!("No place found for '{place}'.\nHint: try a city name, or pass --lat/--lon."),
            };
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(geocoder.reverse(lat, lon).await.unwrap_or_else(|err| {
                tracing::warn!("could not name coordinates: {err:#}");
                Location::from_coordinates(lat, lon)
            })),
            _ => config.saved_location().cloned(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure().await,
            Command::Show(args) => show(args).await,
            Command::Code { code } => {
                println!("{}", WeatherCode(code).label());
                Ok(())
            }
        }
    }
}

async fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let biases = TemperatureBias::all().to_vec();
    let cursor = biases.iter().position(|b| *b == cfg.preferences.bias).unwrap_or(0);
    let bias = Select::new("How do you usually feel?", biases)
        .with_starting_cursor(cursor)
        .prompt()?;
    match bias {
        TemperatureBias::RunsCold => cfg.set_runs_cold(true),
        TemperatureBias::RunsHot => cfg.set_runs_hot(true),
        TemperatureBias::Neutral => cfg.preferences.bias = TemperatureBias::Neutral,
    }

    cfg.preferences.formal = Confirm::new("Prefer formal-ish attire?")
        .with_default(cfg.preferences.formal)
        .prompt()?;
    cfg.preferences.bike_walk = Confirm::new("Do you usually bike or walk?")
        .with_default(cfg.preferences.bike_walk)
        .prompt()?;

    if Confirm::new("Save a default location?").with_default(cfg.location.is_none()).prompt()? {
        let query = Text::new("Place (city or address):").prompt()?;
        let geocoder = geocoder_from_config(&cfg)?;

        let found = geocoder.search(query.trim()).await.unwrap_or_else(|err| {
            tracing::warn!("place search failed: {err:#}");
            None
        });

        let location = match found {
            Some(found) if Confirm::new(&format!("Use {}?", found.name)).with_default(true).prompt()? => found,
            _ => {
                println!("Enter coordinates for {query} instead.");
                let latitude = CustomType::<f64>::new("Latitude:")
                    .with_error_message("Please enter a number, e.g. 52.52")
                    .prompt()?;
                let longitude = CustomType::<f64>::new("Longitude:")
                    .with_error_message("Please enter a number, e.g. 13.405")
                    .prompt()?;
                Location { name: query, latitude, longitude }
            }
        };
        cfg.set_location(location);
    }

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let prefs = args.preferences(config.preferences);

    let (place, snapshot) = match &args.file {
        Some(path) => (path.display().to_string(), read_snapshot(path)?),
        None => {
            let geocoder = geocoder_from_config(&config)?;
            let location = args.location(&config, geocoder.as_ref()).await?;
            let provider = provider_from_config(&config)?;
            let snapshot = provider.fetch(&location).await?;
            let place = location.name.clone();
            if remember_location(&mut config, location) {
                config
                    .save()
                    .unwrap_or_else(|err| tracing::warn!("could not save last location: {err:#}"));
            }
            (place, snapshot)
        }
    };

    tracing::debug!(%place, ?prefs, "assessing snapshot");
    let assessment = assess(&snapshot, prefs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print!("{}", render::Report { place: &place, assessment: &assessment });
    }

    Ok(())
}

/// Make a successfully fetched location the default for the next run.
/// Returns whether the config changed and needs saving.
fn remember_location(config: &mut Config, location: Location) -> bool {
    if config.location.as_ref() == Some(&location) {
        return false;
    }

    config.set_location(location);
    true
}

fn read_snapshot(path: &Path) -> anyhow::Result<ForecastSnapshot> {
    let body = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read forecast from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read forecast file: {}", path.display()))?
    };

    parse_forecast(&body).with_context(|| format!("Invalid forecast data in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("wearcast").chain(args.iter().copied()))
    }

    fn show_args(args: &[&str]) -> ShowArgs {
        match parse(args).expect("valid args").command {
            Command::Show(show) => show,
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn cold_and_hot_conflict() {
        let err = parse(&["show", "--cold", "--hot"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn lat_requires_lon() {
        assert!(parse(&["show", "--lat", "52.5"]).is_err());
    }

    #[test]
    fn negative_coordinates_parse() {
        let args = show_args(&["show", "--lat", "-33.87", "--lon", "151.21"]);
        assert_eq!(args.lat, Some(-33.87));
        assert_eq!(args.lon, Some(151.21));
    }

    #[test]
    fn flags_override_saved_preferences() {
        let saved = UserPreferences { bias: TemperatureBias::RunsHot, formal: true, bike_walk: false };

        let prefs = show_args(&["show", "--cold", "--bike"]).preferences(saved);
        assert_eq!(prefs.bias, TemperatureBias::RunsCold);
        assert!(prefs.formal);
        assert!(prefs.bike_walk);

        let prefs = show_args(&["show"]).preferences(saved);
        assert_eq!(prefs, saved);
    }

    /// Knows one place, names every point "Somewhere" unless `offline`.
    #[derive(Debug, Default)]
    struct FakeGeocoder {
        offline: bool,
    }

    #[async_trait::async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, query: &str) -> anyhow::Result<Option<Location>> {
            Ok((query == "Berlin").then(berlin))
        }

        async fn reverse(&self, latitude: f64, longitude: f64) -> anyhow::Result<Location> {
            if self.offline {
                bail!("connection refused");
            }
            Ok(Location { name: "Somewhere".into(), latitude, longitude })
        }
    }

    fn berlin() -> Location {
        Location { name: "Berlin, Deutschland".into(), latitude: 52.52, longitude: 13.405 }
    }

    fn oslo() -> Location {
        Location { name: "Oslo".into(), latitude: 59.91, longitude: 10.75 }
    }

    #[test]
    fn place_is_positional_and_conflicts_with_coordinates() {
        assert_eq!(show_args(&["show", "New York"]).place.as_deref(), Some("New York"));
        assert!(parse(&["show", "Berlin", "--lat", "1", "--lon", "2"]).is_err());
        assert!(parse(&["show", "Berlin", "--file", "snap.json"]).is_err());
    }

    #[tokio::test]
    async fn place_is_searched() {
        let mut cfg = Config::default();
        cfg.set_location(oslo());

        let loc = show_args(&["show", " Berlin "])
            .location(&cfg, &FakeGeocoder::default())
            .await
            .expect("found");
        assert_eq!(loc, berlin());

        let err = show_args(&["show", "Atlantis"])
            .location(&cfg, &FakeGeocoder::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No place found for 'Atlantis'"));
    }

    #[tokio::test]
    async fn coordinates_are_named_by_reverse_lookup() {
        let args = show_args(&["show", "--lat", "1", "--lon", "2"]);

        let loc = args.location(&Config::default(), &FakeGeocoder::default()).await.expect("named");
        assert_eq!(loc.name, "Somewhere");

        let loc = args
            .location(&Config::default(), &FakeGeocoder { offline: true })
            .await
            .expect("falls back");
        assert_eq!(loc, Location::from_coordinates(1.0, 2.0));
    }

    #[tokio::test]
    async fn saved_location_is_the_default() {
        let mut cfg = Config::default();
        cfg.set_location(oslo());

        let loc = show_args(&["show"]).location(&cfg, &FakeGeocoder::default()).await.expect("saved");
        assert_eq!(loc, oslo());

        assert!(show_args(&["show"]).location(&Config::default(), &FakeGeocoder::default()).await.is_err());
    }

    #[test]
    fn last_location_is_remembered_once() {
        let mut cfg = Config::default();
        cfg.set_location(oslo());

        assert!(!remember_location(&mut cfg, oslo()));
        assert!(remember_location(&mut cfg, berlin()));
        assert_eq!(cfg.location, Some(berlin()));
        assert!(!remember_location(&mut cfg, berlin()));
    }
}

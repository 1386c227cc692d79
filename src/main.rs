use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use exoplanet_generator::atmosphere::{generate_atmosphere, generate_winds, WindParams};
use exoplanet_generator::biomes::{biome_histogram, generate_biomes};
use exoplanet_generator::climate::{generate_climate, ClimateParams};
use exoplanet_generator::exoplanet::Exoplanet;
use exoplanet_generator::hydro::{coverage, Hydrosphere};
use exoplanet_generator::noise_field::SimplexFbm;
use exoplanet_generator::projection::lat_lon_degrees;
use exoplanet_generator::render;
use exoplanet_generator::thermal::{ThermalModel, PROFILE_POINTS};
use exoplanet_generator::{generate_terrain, PlanetConfig, TerrainConstants};

/// Width of the thermal texture image
const THERMAL_TEXTURE_WIDTH: usize = 1024;

/// TRAPPIST-1, used when no planet file is given
const DEFAULT_STAR_TEMPERATURE: f64 = 2566.0;
const DEFAULT_STAR_RADIUS: f64 = 0.1192;

#[derive(Parser, Debug)]
#[command(name = "exoplanet_generator")]
#[command(about = "Generate procedural exoplanet altitude, climate and biome maps")]
struct Args {
    /// Load the planet configuration from a JSON file (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load terrain constants from a JSON file
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Width of the map in cells (default: 512)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in cells (default: 256)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Noise seed (default: 42)
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Continent noise frequency (default: 2.0)
    #[arg(long)]
    continent_scale: Option<f64>,

    /// Mountain noise frequency (default: 5.0)
    #[arg(long)]
    mountain_scale: Option<f64>,

    /// Mountain weight on land (default: 0.3)
    #[arg(long)]
    mountain_strength: Option<f64>,

    /// Directory for all exports
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Sea level for the ocean / coast / land classification
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    sea_level: f32,

    /// Coastal band half-width around sea level
    #[arg(long, default_value = "0.05")]
    coast_threshold: f32,

    /// Globe rotation in degrees of longitude
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    rotation: f64,

    /// Globe image size in pixels
    #[arg(long, default_value = "512")]
    globe_size: u32,

    /// Planet JSON written by fetch_exoplanet, for the thermal profile
    #[arg(long)]
    planet: Option<PathBuf>,

    /// Also write the raw f32 altitude array with a JSON sidecar
    #[arg(long)]
    raw: bool,

    /// Skip all PNG exports
    #[arg(long)]
    no_images: bool,
}

impl Args {
    fn planet_config(&self) -> Result<PlanetConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => PlanetConfig::from_json_file(path)?,
            None => PlanetConfig::default(),
        };
        if let Some(v) = self.width { config.width = v; }
        if let Some(v) = self.height { config.height = v; }
        if let Some(v) = self.seed { config.seed = v; }
        if let Some(v) = self.continent_scale { config.continent_scale = v; }
        if let Some(v) = self.mountain_scale { config.mountain_scale = v; }
        if let Some(v) = self.mountain_strength { config.mountain_strength = v; }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = args.planet_config()?;
    let constants = match &args.constants {
        Some(path) => TerrainConstants::from_json_file(path)?,
        None => TerrainConstants::default(),
    };

    println!("Generating planet with seed: {}", config.seed);
    println!("Map size: {}x{}", config.width, config.height);

    // Terrain
    let layers = generate_terrain(&config, &constants, &SimplexFbm::new())?;
    let heights = &layers.altitude.heights;
    let (min_h, max_h) = heights.min_max();
    println!(
        "Continents: {:.1}% above threshold {}",
        100.0 * layers.continents.land_fraction(constants.continent_threshold),
        constants.continent_threshold
    );
    println!("Altitude range: {:.3} to {:.3}", min_h, max_h);
    if layers.altitude.degenerate {
        println!("Warning: altitude field was flat and has been zeroed");
    }

    // Hydrosphere
    let hydrosphere = Hydrosphere::new(args.sea_level, args.coast_threshold);
    let water = hydrosphere.classify(heights);
    let cover = coverage(&water);
    println!(
        "Water: {:.1}% ocean, {:.1}% coast, {:.1}% land",
        100.0 * cover.ocean,
        100.0 * cover.coast,
        100.0 * cover.land
    );

    // Climate and biomes
    let climate_params = ClimateParams::default();
    let climate = generate_climate(heights, &climate_params, config.seed as u64);
    let (min_t, max_t) = climate.temperature.min_max();
    println!(
        "Temperature range: {:.1}°C to {:.1}°C (equator {:.1}°C)",
        min_t, max_t, climate.equator_temp
    );

    let biomes = generate_biomes(heights, &climate, climate_params.sea_level);
    println!("Biomes:");
    let total = biomes.len() as f32;
    for (biome, count) in biome_histogram(&biomes) {
        println!("  {:<18} {:5.1}%", biome.name(), 100.0 * count as f32 / total);
    }

    // Atmosphere
    let precipitation = climate.precipitation();
    let (lat, lon) = lat_lon_degrees(config.width, config.height);
    let winds = generate_winds(
        heights,
        &climate.temperature,
        &lat,
        &lon,
        &WindParams::default(),
        config.seed as u64,
    );
    let atmosphere = generate_atmosphere(heights, &climate.temperature, &precipitation, &winds.speed);
    let (_, max_wind) = winds.speed.min_max();
    let (min_p, max_p) = atmosphere.pressure.min_max();
    println!("Max wind speed: {:.1} m/s, pressure {:.1} to {:.1} hPa", max_wind, min_p, max_p);

    // Thermal profile
    let thermal = match &args.planet {
        Some(path) => thermal_from_file(path)?,
        None => ThermalModel::new(DEFAULT_STAR_TEMPERATURE, DEFAULT_STAR_RADIUS),
    };
    println!("Mean equilibrium temperature: {:.1} K", thermal.mean_temperature());

    // Exports
    let out = &args.output;
    if !args.no_images {
        info!(dir = %out.display(), "writing images");
        let relief = render::render_shaded_relief(heights, 0.05);
        render::save_png(&render::render_grayscale(heights), &out.join("altitude.png"))?;
        render::save_png(&relief, &out.join("relief.png"))?;
        render::save_png(&render::render_water(&water), &out.join("hydrosphere.png"))?;
        render::save_png(&render::render_biomes(&biomes), &out.join("biomes.png"))?;
        render::save_png(&render::render_wind_speed(&winds.speed), &out.join("wind_speed.png"))?;

        let (latitudes, profile) = thermal.profile(PROFILE_POINTS);
        let texture = render::render_thermal_texture(&profile, THERMAL_TEXTURE_WIDTH);
        render::save_png(&texture, &out.join("thermal_texture.png"))?;
        let chart = render::render_profile_chart(&latitudes, &profile, 800, 400);
        render::save_png(&chart, &out.join("temperature_profile.png"))?;

        let globe = render::render_globe(&relief, args.globe_size, args.rotation.to_radians());
        render::save_png(&globe, &out.join("globe.png"))?;
        println!("Images written to {}", out.display());
    }

    if args.raw {
        let path = render::export_raw(&layers.altitude, &config, out, "altitude")?;
        println!("Raw altitude written to {}", path.display());
    }

    Ok(())
}

fn thermal_from_file(path: &Path) -> Result<ThermalModel, Box<dyn Error>> {
    let planet: Exoplanet = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    ThermalModel::from_exoplanet(&planet).ok_or_else(|| {
        format!("{} lacks star temperature or radius", path.display()).into()
    })
}

//! Fetch a planet from the NASA Exoplanet Archive and store it for the
//! thermal model.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exoplanet_generator::exoplanet::{
    clean_records, export_csv, export_json, to_exoplanet, ArchiveConfig, NasaExoplanetClient,
    DEFAULT_PLANET,
};
use exoplanet_generator::thermal::ThermalModel;

#[derive(Parser, Debug)]
#[command(name = "fetch_exoplanet")]
#[command(about = "Download exoplanet parameters from the NASA Exoplanet Archive")]
struct Args {
    /// Planet name as listed in the archive
    #[arg(short, long, default_value = DEFAULT_PLANET)]
    planet: String,

    /// Directory for the JSON and CSV files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value = "15")]
    timeout: u64,
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
    let client = NasaExoplanetClient::new(ArchiveConfig {
        timeout_secs: args.timeout,
        ..Default::default()
    })?;

    println!("Querying archive for {}...", args.planet);
    let rows = client.fetch_planet(&args.planet)?;
    let cleaned = clean_records(rows);
    let planet = to_exoplanet(&cleaned, &args.planet)?;

    let stem = args.planet.replace(' ', "_");
    let json = export_json(&planet, &args.data_dir, &format!("{stem}.json"))?;
    let csv = export_csv(&cleaned, &args.data_dir, &format!("{stem}.csv"))?;
    println!("Saved {} and {}", json.display(), csv.display());

    let show = |v: Option<f64>| v.map(|x| format!("{x}")).unwrap_or_else(|| "-".to_string());
    println!("  host:          {}", planet.hostname.as_deref().unwrap_or("-"));
    println!("  radius (R⊕):   {}", show(planet.pl_rade));
    println!("  mass (M⊕):     {}", show(planet.pl_masse));
    println!("  star Teff (K): {}", show(planet.st_teff));
    println!("  star R (R☉):   {}", show(planet.st_rad));
    println!("  distance (pc): {}", show(planet.sy_dist));

    match ThermalModel::from_exoplanet(&planet) {
        Some(model) => println!("Mean equilibrium temperature: {:.1} K", model.mean_temperature()),
        None => println!("Star parameters missing, no thermal estimate"),
    }

    Ok(())
}

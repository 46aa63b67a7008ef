use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use az_core::units::convert;
use az_earth::OperatingPoint;
use az_mission::{Requirements, Technology, design};
use az_propulsion::{ElectrofanNacelle, PropulsionModel, Rating, RatingTable};
use tracing::info;

#[derive(Parser)]
#[command(name = "az-cli")]
#[command(about = "Aerosizer CLI - conceptual aircraft and propulsion sizing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size an aircraft and print the mass breakdown and payload-range envelope
    Size {
        /// Seating capacity
        #[arg(long, default_value_t = 150.0)]
        npax: f64,
        /// Design range in nautical miles
        #[arg(long, default_value_t = 3000.0)]
        range: f64,
        /// Cruise Mach number
        #[arg(long, default_value_t = 0.78)]
        mach: f64,
        /// Cruise pressure altitude in feet
        #[arg(long, default_value_t = 35_000.0)]
        altitude: f64,
        /// Temperature offset from standard day (K)
        #[arg(long, default_value_t = 0.0)]
        disa: f64,
    },
    /// Thrust sweep of an electrofan sized for the same requirement
    Sweep {
        /// Seating capacity
        #[arg(long, default_value_t = 150.0)]
        npax: f64,
        /// Design range in nautical miles
        #[arg(long, default_value_t = 3000.0)]
        range: f64,
        /// Cruise Mach number
        #[arg(long, default_value_t = 0.75)]
        mach: f64,
        /// Cruise pressure altitude in feet
        #[arg(long, default_value_t = 35_000.0)]
        altitude: f64,
        /// Number of engines
        #[arg(long, default_value_t = 2)]
        engines: u32,
        /// Number of sweep points from 110% down to 50% of cruise thrust
        #[arg(long, default_value_t = 13)]
        points: usize,
        /// Optional YAML file overriding the rating table
        #[arg(long)]
        ratings: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Size {
            npax,
            range,
            mach,
            altitude,
            disa,
        } => cmd_size(npax, range, mach, altitude, disa),
        Commands::Sweep {
            npax,
            range,
            mach,
            altitude,
            engines,
            points,
            ratings,
        } => cmd_sweep(npax, range, mach, altitude, engines, points, ratings.as_deref()),
    }
}

fn cmd_size(npax: f64, range_nm: f64, mach: f64, altitude_ft: f64, disa: f64) -> Result<(), Box<dyn Error>> {
    let requirements = Requirements {
        npax,
        design_range: convert::m_nm(range_nm),
        cruise_mach: mach,
        cruise_altp: convert::m_ft(altitude_ft),
        cruise_disa: disa,
    };
    info!(npax, range_nm, mach, "sizing aircraft");
    let ac = design(&requirements, &Technology::default())?;

    println!("Aircraft sized for {npax:.0} pax over {range_nm:.0} NM at M{mach:.2}");
    println!();
    println!("Mass breakdown:");
    println!("  MTOW          {:>9.0} kg", ac.mtow);
    println!("  OWE           {:>9.0} kg", ac.owe);
    println!("  Payload       {:>9.0} kg", ac.payload);
    println!("  Mission fuel  {:>9.0} kg", ac.mission_fuel);
    println!("  Reserve fuel  {:>9.0} kg", ac.reserve_fuel);
    println!();
    println!("Cruise: {:.1} m/s TAS, L/D {:.1}", ac.cruise_speed, ac.lift_to_drag);
    println!();
    println!("Payload-range envelope:");
    let env = &ac.envelope;
    println!(
        "  max payload   {:>9.0} kg  at {:>6.0} NM",
        env.payload_max,
        convert::nm_m(env.range_payload_max)
    );
    println!(
        "  max fuel      {:>9.0} kg  at {:>6.0} NM",
        env.payload_fuel_max,
        convert::nm_m(env.range_fuel_max)
    );
    println!(
        "  ferry         {:>9.0} kg  at {:>6.0} NM",
        0.0,
        convert::nm_m(env.range_no_payload)
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_sweep(
    npax: f64,
    range_nm: f64,
    mach: f64,
    altitude_ft: f64,
    engines: u32,
    points: usize,
    ratings_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let ratings = match ratings_path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let table: RatingTable = serde_yaml::from_str(&text)?;
            table
        }
        None => RatingTable::electrofan(),
    };

    let design_range = convert::m_nm(range_nm);
    let reference_power =
        ElectrofanNacelle::reference_power_from_requirement(npax, design_range, f64::from(engines));
    let mut nacelle = ElectrofanNacelle::new(reference_power, ratings)?;

    let op = OperatingPoint::new(convert::m_ft(altitude_ft), 0.0, mach)?;
    let shaft = nacelle.reference_power.value * nacelle.ratings.mcr;
    let geom = *nacelle.design(&op, shaft)?;
    println!(
        "Electrofan: {:.1} MW reference, fan diameter {:.2} m, design flow {:.0} kg/s",
        reference_power / 1.0e6,
        geom.fan_width.value,
        geom.design_flow.value
    );

    let cruise_thrust = nacelle
        .unitary_thrust(&op, Rating::Mcr, 1.0, 0.0, None)?
        .thrust
        .value;
    let targets: Vec<f64> = (0..points)
        .map(|i| {
            let f = 1.1 - 0.6 * i as f64 / (points.max(2) - 1) as f64;
            f * cruise_thrust
        })
        .collect();
    let reports = nacelle.thrust_sweep(&op, Rating::Mcr, &targets, 0.0)?;

    println!();
    println!("{:>12} {:>12} {:>10} {:>14}", "thrust (N)", "power (kW)", "throttle", "sc (W/N)");
    for (target, report) in targets.iter().zip(&reports) {
        println!(
            "{:>12.0} {:>12.1} {:>10.3} {:>14.1}",
            target,
            report.shaft_power.value / 1.0e3,
            report.throttle,
            report.specific_consumption
        );
    }
    Ok(())
}

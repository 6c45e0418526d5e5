use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;

use artillery_engine::{
    plan_mission, range_difference_per_mil, solve_closed_form, solve_with_drag, ArcMode,
    FiringContext, GridPosition, TerrainHeightIndex, WindConditions,
};

#[derive(Parser)]
#[command(name = "artillery")]
#[command(version = "0.1.0")]
#[command(about = "Artillery firing-solution calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Arc {
    Low,
    High,
}

impl From<Arc> for ArcMode {
    fn from(arc: Arc) -> Self {
        match arc {
            Arc::Low => ArcMode::Low,
            Arc::High => ArcMode::High,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Closed-form elevation (no air resistance)
    Solve {
        /// Muzzle velocity (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Horizontal range to the target (m)
        #[arg(short = 'r', long)]
        range: f64,

        /// Target height minus gun height (m)
        #[arg(long, default_value = "0.0")]
        height_delta: f64,

        /// Gravitational acceleration (m/s²)
        #[arg(short = 'g', long, default_value = "9.81")]
        gravity: f64,

        /// Trajectory family
        #[arg(short = 'a', long, value_enum, default_value = "low")]
        arc: Arc,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Drag-aware elevation via angle search
    DragSearch {
        /// Muzzle velocity (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Horizontal range to the target (m)
        #[arg(short = 'r', long)]
        range: f64,

        /// Target height minus gun height (m)
        #[arg(long, default_value = "0.0")]
        height_delta: f64,

        /// Air temperature (°C)
        #[arg(short = 't', long, default_value = "15.0")]
        temperature: f64,

        /// Barometric pressure (hPa)
        #[arg(short = 'p', long, default_value = "1013.25")]
        pressure: f64,

        /// Base drag coefficient (1/m)
        #[arg(short = 'k', long, default_value = "0.00006")]
        drag_base: f64,

        /// Gravitational acceleration (m/s²)
        #[arg(short = 'g', long, default_value = "9.81")]
        gravity: f64,

        /// Trajectory family
        #[arg(short = 'a', long, value_enum, default_value = "low")]
        arc: Arc,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Range change per mil of elevation
    Sensitivity {
        /// Muzzle velocity (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Current elevation (mils)
        #[arg(short = 'e', long)]
        elevation_mils: f64,

        /// Target height minus gun height (m)
        #[arg(long, default_value = "0.0")]
        height_delta: f64,

        /// Gravitational acceleration (m/s²)
        #[arg(short = 'g', long, default_value = "9.81")]
        gravity: f64,
    },

    /// Height of the nearest terrain sample
    Terrain {
        /// Terrain sample file (whitespace-delimited: x y height)
        #[arg(short = 'f', long)]
        file: String,

        /// Grid X coordinate
        #[arg(short = 'x', long)]
        x: f64,

        /// Grid Y coordinate
        #[arg(short = 'y', long)]
        y: f64,
    },

    /// Full fire mission from grid coordinates and a terrain file
    Mission {
        /// Terrain sample file
        #[arg(short = 'f', long)]
        file: String,

        #[arg(long)]
        gun_x: f64,

        #[arg(long)]
        gun_y: f64,

        #[arg(long)]
        target_x: f64,

        #[arg(long)]
        target_y: f64,

        /// Muzzle velocity (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Trajectory family
        #[arg(short = 'a', long, value_enum, default_value = "low")]
        arc: Arc,

        /// Use the drag-aware angle search instead of the closed form
        #[arg(long)]
        drag: bool,

        /// Air temperature (°C)
        #[arg(short = 't', long, default_value = "15.0")]
        temperature: f64,

        /// Barometric pressure (hPa)
        #[arg(short = 'p', long, default_value = "1013.25")]
        pressure: f64,

        /// Base drag coefficient (1/m)
        #[arg(short = 'k', long, default_value = "0.00006")]
        drag_base: f64,

        /// Wind speed (m/s)
        #[arg(long, default_value = "0.0")]
        wind_speed: f64,

        /// Direction the wind blows from (degrees)
        #[arg(long, default_value = "0.0")]
        wind_direction: f64,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

fn print_serializable<T: Serialize>(
    value: &T,
    format: OutputFormat,
    table: String,
    csv_header: &str,
    csv_row: String,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Table => println!("{table}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Csv => {
            println!("{csv_header}");
            println!("{csv_row}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            velocity,
            range,
            height_delta,
            gravity,
            arc,
            output,
        } => {
            let context = FiringContext {
                muzzle_velocity: velocity,
                horizontal_range: range,
                height_delta,
                gravity,
                ..FiringContext::default()
            };
            let solution = solve_closed_form(&context, arc.into())?;
            print_serializable(
                &solution,
                output,
                format!(
                    "ELEVATION\n  Elevation:    {} mil\n  Flight time:  {:.1} s",
                    solution.elevation_mils, solution.flight_time_s
                ),
                "elevation_mils,flight_time_s",
                format!("{},{:.3}", solution.elevation_mils, solution.flight_time_s),
            )?;
        }

        Commands::DragSearch {
            velocity,
            range,
            height_delta,
            temperature,
            pressure,
            drag_base,
            gravity,
            arc,
            output,
        } => {
            let context = FiringContext {
                muzzle_velocity: velocity,
                horizontal_range: range,
                height_delta,
                gravity,
                temperature_c: temperature,
                pressure_hpa: pressure,
                drag_coefficient_base: drag_base,
            };
            let solution = solve_with_drag(&context, arc.into())?;
            print_serializable(
                &solution,
                output,
                format!(
                    "DRAG SEARCH\n  Elevation:    {:.2}° ({:.0} mil)\n  Flight time:  {:.1} s\n  \
                     Impact:       {:.1} m downrange, {:.1} m height\n  Miss:         {:.2} m",
                    solution.angle_deg,
                    solution.elevation_mils,
                    solution.flight_time_s,
                    solution.impact_downrange_m,
                    solution.impact_height_m,
                    solution.miss_distance_m
                ),
                "angle_deg,elevation_mils,flight_time_s,impact_downrange_m,impact_height_m,miss_distance_m",
                format!(
                    "{:.4},{:.1},{:.3},{:.2},{:.2},{:.3}",
                    solution.angle_deg,
                    solution.elevation_mils,
                    solution.flight_time_s,
                    solution.impact_downrange_m,
                    solution.impact_height_m,
                    solution.miss_distance_m
                ),
            )?;
        }

        Commands::Sensitivity {
            velocity,
            elevation_mils,
            height_delta,
            gravity,
        } => {
            let diff = range_difference_per_mil(velocity, elevation_mils, height_delta, gravity)?;
            println!("Range change per mil: {diff:.2} m");
        }

        Commands::Terrain { file, x, y } => {
            let index = TerrainHeightIndex::load(&file)?;
            let (point, distance) = index.query(x, y)?;
            println!(
                "Height: {:.1} m (nearest sample at ({:.0}, {:.0}), {:.1} m away, {} samples loaded)",
                point.height, point.x, point.y, distance, index.len()
            );
        }

        Commands::Mission {
            file,
            gun_x,
            gun_y,
            target_x,
            target_y,
            velocity,
            arc,
            drag,
            temperature,
            pressure,
            drag_base,
            wind_speed,
            wind_direction,
            output,
        } => {
            let index = TerrainHeightIndex::load(&file)?;
            let context = FiringContext {
                muzzle_velocity: velocity,
                temperature_c: temperature,
                pressure_hpa: pressure,
                drag_coefficient_base: drag_base,
                ..FiringContext::default()
            };
            let solution = plan_mission(
                GridPosition { x: gun_x, y: gun_y },
                GridPosition {
                    x: target_x,
                    y: target_y,
                },
                &context,
                arc.into(),
                drag,
                &index,
                WindConditions {
                    speed_mps: wind_speed,
                    direction_deg: wind_direction,
                },
            )?;

            let sensitivity = solution
                .range_sensitivity_m_per_mil
                .map(|v| format!("{v:.2} m/mil"))
                .unwrap_or_else(|| "n/a".to_string());
            print_serializable(
                &solution,
                output,
                format!(
                    "FIRE MISSION\n  Distance:     {:.1} m\n  Azimuth:      {} mil\n  \
                     Gun height:   {:.1} m\n  Target height:{:.1} m\n  \
                     Elevation:    {:.0} mil\n  Flight time:  {:.1} s\n  \
                     Sensitivity:  {}\n  Crosswind:    {:.1} m/s\n  \
                     Drift:        {:.1} m\n  Az correction:{:.1} mil",
                    solution.distance_m,
                    solution.azimuth_mils,
                    solution.gun_height_m,
                    solution.target_height_m,
                    solution.elevation_mils,
                    solution.flight_time_s,
                    sensitivity,
                    solution.crosswind_mps,
                    solution.lateral_deviation_m,
                    solution.azimuth_correction_mils
                ),
                "distance_m,azimuth_mils,elevation_mils,flight_time_s,lateral_deviation_m,azimuth_correction_mils",
                format!(
                    "{:.2},{},{:.1},{:.3},{:.2},{:.2}",
                    solution.distance_m,
                    solution.azimuth_mils,
                    solution.elevation_mils,
                    solution.flight_time_s,
                    solution.lateral_deviation_m,
                    solution.azimuth_correction_mils
                ),
            )?;
        }
    }

    Ok(())
}

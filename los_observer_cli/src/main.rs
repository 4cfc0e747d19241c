use clap::{Parser, Subcommand};
use los_observer::{
    geometry::Point3,
    layers::MapDocument,
    list_eligible_surfaces, offset_in_surface_units, Capture, DistanceUnit, LosConfig, LosError,
    MapContentsListener, MarkerRecorder, ToolModeController,
};
use std::io;

#[derive(Parser)]
#[command(author, version, about = "Observer point capture for line-of-sight analysis")]
struct Cli {
    /// JSON file with offsets, marker styles and mode tokens.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the layers of a map that can be used as elevation surfaces.
    Surfaces { map: String },
    /// Convert a vertical offset into the elevation units of a surface.
    Offset {
        map: String,
        value: f64,
        #[arg(long, default_value = "meters")]
        unit: String,
        /// Surface whose Z factor is applied. Defaults to the first eligible one.
        #[arg(long, conflicts_with = "z_factor")]
        surface: Option<String>,
        /// Explicit Z factor, bypassing surface lookup.
        #[arg(long)]
        z_factor: Option<f64>,
    },
    /// Replay map clicks from a CSV file of x,y[,z] rows.
    Capture {
        map: String,
        clicks: String,
        #[arg(long, default_value = "Observer")]
        mode: String,
        /// Treat the owning view as inactive.
        #[arg(long)]
        inactive: bool,
        /// Indices (0 = newest) of captured points to delete afterwards.
        #[arg(long, value_delimiter = ',')]
        delete: Vec<usize>,
    },
}

fn read_clicks(path: &str) -> io::Result<Vec<Point3>> {
    let contents = std::fs::read_to_string(path)?;
    let mut pts = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = line
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {}", idx + 1, e))
            })?;
        match values.as_slice() {
            [x, y] => pts.push(Point3::planar(*x, *y)),
            [x, y, z] => pts.push(Point3::new(*x, *y, *z)),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: expected x,y or x,y,z", idx + 1),
                ))
            }
        }
    }
    Ok(pts)
}

fn new_controller(config: LosConfig, map: &MapDocument) -> ToolModeController<MarkerRecorder> {
    let mut controller = ToolModeController::new(config, MarkerRecorder::new());
    controller.map_contents_changed(map);
    controller
}

fn run(cli: Cli) -> los_observer::Result<()> {
    let config = match &cli.config {
        Some(path) => LosConfig::load(path)?,
        None => LosConfig::default(),
    };
    match cli.command {
        Commands::Surfaces { map } => {
            let map = MapDocument::load(&map)?;
            for name in list_eligible_surfaces(&map) {
                println!("{}", name);
            }
        }
        Commands::Offset {
            map,
            value,
            unit,
            surface,
            z_factor,
        } => {
            let map = MapDocument::load(&map)?;
            let unit: DistanceUnit = unit.parse()?;
            let result = match z_factor {
                Some(z) => offset_in_surface_units(&map, value, z, unit)?,
                None => {
                    let mut controller = new_controller(config, &map);
                    if let Some(name) = surface {
                        controller.select_surface(&name)?;
                    }
                    controller.set_offset_unit(unit);
                    controller.set_observer_offset(Some(value))?;
                    controller.observer_offset_in_surface_units(&map)?
                }
            };
            println!("{:.3}", result);
        }
        Commands::Capture {
            map,
            clicks,
            mode,
            inactive,
            delete,
        } => {
            let map = MapDocument::load(&map)?;
            let clicks = read_clicks(&clicks)?;
            let mut controller = new_controller(config, &map);
            let mode = controller.activate(&mode);
            println!("Mode: {:?}", mode);
            let captured = clicks
                .into_iter()
                .filter(|p| matches!(controller.handle_point(*p, !inactive), Capture::Observer(_)))
                .count();
            log::info!("captured {} observer points", captured);

            let mut ids = Vec::with_capacity(delete.len());
            for index in delete {
                let point = controller.observer_points().at(index).ok_or_else(|| {
                    LosError::InvalidInput(format!("no captured point at index {}", index))
                })?;
                ids.push(point.id);
            }
            controller.delete_points(&ids);

            for p in controller.observer_points().iter() {
                println!("{:.3},{:.3},{:.3}", p.location.x, p.location.y, p.location.z);
            }
            if let Some(t) = controller.target_point() {
                println!("Target: {:.3},{:.3},{:.3}", t.x, t.y, t.z);
            }
            println!("Markers: {}", controller.graphics().len());
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

use argh::FromArgs;
use std::path::PathBuf;

use mvgrid::algebra::{Mat4F64, Viewpoint};
use mvgrid::grid::{render, OccupancyGrid};
use mvgrid::reproject::{self as rp, BlobLayout, BlobShape, ExecutionStrategy};
use mvgrid::sampler::{InMemoryCatalog, ViewId, ViewRecord, ViewSampler, ViewSamplerConfig};

#[derive(FromArgs)]
/// Rotate a synthetic occupancy grid between two viewpoints
struct Args {
    /// the grid edge length
    #[argh(option, short = 's', default = "32")]
    size: usize,

    /// the yaw between the two viewpoints, in degrees
    #[argh(option, short = 'y', default = "90.0")]
    yaw: f64,

    /// the occupancy threshold of the depth map
    #[argh(option, short = 't', default = "0.5")]
    threshold: f32,

    /// path to a JSON sampler configuration, enables multi-view aggregation
    #[argh(option)]
    config: Option<PathBuf>,

    /// the number of threads, uses the global pool when not set
    #[argh(option)]
    num_threads: Option<usize>,
}

const CAMERA_DISTANCE: f64 = 5.0;

fn camera(yaw: f64) -> Viewpoint {
    Viewpoint::new(
        Mat4F64::from_rotation_y(yaw),
        Mat4F64::from_translation([0.0, 0.0, -CAMERA_DISTANCE]),
    )
}

// an off-center box, so that a rotation visibly moves it
fn synthetic_grid(size: usize) -> Result<OccupancyGrid<f32>, Box<dyn std::error::Error>> {
    let mut grid = OccupancyGrid::zeros(size)?;
    for layer in size / 3..size / 3 + size / 4 {
        for row in size / 4..size / 2 {
            for col in size / 2..size / 2 + size / 4 {
                grid[[layer, row, col]] = 1.0;
            }
        }
    }
    Ok(grid)
}

fn occupied(grid: &OccupancyGrid<f32>, threshold: f32) -> usize {
    grid.as_slice().iter().filter(|&&v| v > threshold).count()
}

// one character per pixel, darker is closer
fn print_depth_map(grid: &OccupancyGrid<f32>, threshold: f32) {
    const RAMP: &[u8] = b"@%#*+=-:. ";
    let size = grid.size();
    let depth = render::first_occupied_layer(grid, threshold);
    for row in depth.chunks_exact(size) {
        let line = row
            .iter()
            .map(|d| match d {
                Some(layer) => RAMP[layer * (RAMP.len() - 1) / size] as char,
                None => ' ',
            })
            .collect::<String>();
        println!("|{line}|");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let strategy = match args.num_threads {
        Some(n) => ExecutionStrategy::Fixed(n),
        None => ExecutionStrategy::default(),
    };

    let proj = Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0);
    let src = camera(0.0);
    let dst = camera(args.yaw.to_radians());

    let grid = synthetic_grid(args.size)?;
    println!("Source grid: {} occupied cells", occupied(&grid, args.threshold));
    print_depth_map(&grid, args.threshold);

    let rotated = rp::reproject(&grid, &src, &dst, &proj, strategy)?;
    println!(
        "Rotated by {} degrees: {} occupied cells",
        args.yaw,
        occupied(&rotated, args.threshold)
    );
    print_depth_map(&rotated, args.threshold);

    let depth = render::first_occupied_layer(&rotated, args.threshold);
    let colors = render::iso_surface(&rotated, args.threshold);
    let closest = depth
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.map(|layer| (layer, i)))
        .min();
    println!(
        "Iso-surface: {} of {} pixels hit",
        depth.iter().flatten().count(),
        colors.len()
    );
    if let Some((layer, pixel)) = closest {
        println!("Closest surface: layer {layer}, color {:?}", colors[pixel]);
    }

    let Some(path) = args.config else {
        return Ok(());
    };

    let config: ViewSamplerConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    log::info!("sampler configuration: {config:?}");

    // record every view of the object as if the box had been predicted from it
    let mut catalog = InMemoryCatalog::new();
    let shape = BlobShape::new(args.size, args.size, args.size);
    for view in 0..config.views_per_object {
        let yaw = view as f64 * std::f64::consts::TAU / config.views_per_object as f64;
        let viewpoint = camera(yaw);
        let prediction = rp::reproject(&grid, &src, &viewpoint, &proj, strategy)?;
        catalog.insert(
            ViewId::new(0, view),
            ViewRecord {
                viewpoint,
                projection: proj,
                prediction: prediction.as_slice().to_vec(),
                layout: BlobLayout::new(shape),
                ground_truth: Some(prediction),
            },
        );
    }

    let mut sampler = ViewSampler::from_config(config)?;
    let anchor = ViewId::new(0, 0);
    let sample = sampler.sample_example(anchor, &catalog, strategy)?;
    println!(
        "Aggregated {:?} from views {:?}: {} occupied cells",
        sample.source,
        sample.views.iter().map(|id| id.view).collect::<Vec<_>>(),
        occupied(&sample.grid, args.threshold)
    );
    print_depth_map(&sample.grid, args.threshold);

    Ok(())
}

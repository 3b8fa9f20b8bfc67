//! Spindrift - headless spectral ocean snapshot tool
//!
//! Simulates a wind-driven sea on a periodic patch and writes the surface
//! fields out as images (and optionally OBJ meshes) per frame.

use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use clap::Parser;

use spindrift::cli::Args;
use spindrift::controller::OceanSimulation;
use spindrift::export::{self, FieldName};
use spindrift::mesh::SurfaceMesh;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let params = args.ocean_parameters();
    let config = args.snapshot_config();
    let fields = args.parse_fields();

    println!("Spindrift is running!");
    println!(
        "Ocean: {0}x{0} cells over {1}m, wind {2}m/s, seed {3}",
        params.resolution, params.domain_size, params.wind_speed, params.seed
    );

    let mut sim = OceanSimulation::new();
    if let Err(e) = sim.initialize(params) {
        eprintln!("Failed to initialize simulation: {}", e);
        std::process::exit(1);
    }

    let mut mesh = if args.obj {
        Some(SurfaceMesh::new(args.resolution, args.domain_size))
    } else {
        None
    };

    let start = Instant::now();
    for frame in 0..config.frames {
        let t = frame as f32 * config.time_step;
        if let Err(e) = sim.step(t) {
            eprintln!("Simulation step failed: {}", e);
            std::process::exit(1);
        }

        for field in &fields {
            let path = config.frame_path(field.label(), frame);
            let result = match field {
                FieldName::Height => {
                    export::save_height_png(sim.height_field().expect("sim is live"), &path)
                }
                FieldName::Displacement => export::save_displacement_png(
                    sim.displacement_field().expect("sim is live"),
                    &path,
                ),
                FieldName::Normal => {
                    export::save_normal_png(sim.normal_field().expect("sim is live"), &path)
                }
                // Raw internals go out as flat f32 data, not images.
                other => {
                    let bytes = sim.export_field(*other).expect("sim is live");
                    let raw_path = path.replace(".png", ".f32");
                    std::fs::write(&raw_path, bytes).map_err(image::ImageError::IoError)
                }
            };
            if let Err(e) = result {
                eprintln!("Failed to save {} frame {}: {}", field.label(), frame, e);
            }
        }

        if let Some(mesh) = mesh.as_mut() {
            if let Err(e) = write_mesh(mesh, &sim, &config.mesh_path(frame)) {
                eprintln!("Failed to save mesh frame {}: {}", frame, e);
            }
        }

        let heights = sim.height_field().expect("sim is live");
        let (min, max) = heights
            .data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });
        println!(
            "Frame {}/{} (t = {:.2}s) height [{:.3}, {:.3}]m",
            frame + 1,
            config.frames,
            t,
            min,
            max
        );
    }

    println!(
        "Captured {} frame(s) covering {:.1}s of sea state to {}/ in {:.2}s",
        config.frames,
        config.duration_secs(),
        config.output_dir,
        start.elapsed().as_secs_f32()
    );
}

fn write_mesh(
    mesh: &mut SurfaceMesh,
    sim: &OceanSimulation,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    mesh.displace(sim)?;
    let mut writer = BufWriter::new(File::create(path)?);
    mesh.write_obj(&mut writer)?;
    Ok(())
}

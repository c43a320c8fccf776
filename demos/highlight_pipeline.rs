//! End-to-end highlighting pipeline example
//!
//! This example walks through the full interactive flow:
//! - Building a mesh vertex buffer (stand-in for a loaded model)
//! - Converting it into the session's point cloud
//! - Highlighting points around feature locations
//! - Producing a renderable buffer and saving the colored cloud
//!
//! Run with `RUST_LOG=debug` to see the per-feature query logging.

use anyhow::Context;
use pointbrush_algorithms::count_highlighted;
use pointbrush_core::{FeaturePoint, HighlightConfig, VertexAttribute, VertexBuffer};
use pointbrush_io::read_point_cloud;
use pointbrush_pipeline::Session;

/// Build a sphere of vertices with outward normals using a golden-ratio
/// spiral, spaced evenly enough for radius queries to behave predictably.
fn sphere_buffer(radius: f32, num_points: usize) -> VertexBuffer {
    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut positions = Vec::with_capacity(num_points);
    let mut normals = Vec::with_capacity(num_points);

    for i in 0..num_points {
        let theta = 2.0 * std::f32::consts::PI * i as f32 / golden_ratio;
        let phi = (1.0 - 2.0 * (i as f32 + 0.5) / num_points as f32).acos();

        let x = radius * phi.sin() * theta.cos();
        let y = radius * phi.sin() * theta.sin();
        let z = radius * phi.cos();

        positions.push([x, y, z]);
        normals.push([x / radius, y / radius, z / radius]);
    }

    let mut buffer = VertexBuffer::new();
    buffer.insert_attribute(VertexAttribute::Position, positions);
    buffer.insert_attribute(VertexAttribute::Normal, normals);
    buffer
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Highlight Pipeline Example ===\n");

    // 1. Load a mesh vertex buffer into a session
    println!("1. Loading mesh vertex buffer:");
    let buffer = sphere_buffer(1.0, 2000);
    let mut session = Session::new();
    session.load_mesh_buffer(&buffer)?;
    println!(
        "   Session holds {} points (uncolored)",
        session.cloud().map(|c| c.len()).unwrap_or(0)
    );
    println!();

    // 2. Configure feature points
    println!("2. Configuring feature points:");
    let parsed: FeaturePoint = "1.0 0.0 0.0 0.3".parse()?;
    let config = HighlightConfig::new(vec![
        parsed,
        FeaturePoint::new(0.0, 0.0, 1.0, 0.3),
    ]);
    for (i, feature) in config.feature_points.iter().enumerate() {
        println!(
            "   Feature {}: center ({:.2}, {:.2}, {:.2}), radius {:.2}",
            i + 1,
            feature.position.x,
            feature.position.y,
            feature.position.z,
            feature.radius
        );
    }
    println!();

    // 3. Colorize
    println!("3. Applying highlights:");
    session.apply_highlights(&config)?;
    let cloud = session.cloud().context("session has no cloud")?;
    let highlighted = count_highlighted(cloud, &config)?;
    println!("   {} of {} points highlighted", highlighted, cloud.len());
    println!();

    // 4. Hand the result back to a renderer
    println!("4. Building renderable buffer:");
    let render = session.render_buffer().context("session has no cloud")?;
    let vertices = render.interleaved()?;
    println!(
        "   {} interleaved vertices ({} bytes per vertex)",
        vertices.len(),
        std::mem::size_of::<pointbrush_core::PointVertex>()
    );
    println!();

    // 5. Save and verify
    println!("5. Saving colored cloud:");
    let output = "highlighted_cloud.ply";
    session.save(output)?;
    let reloaded = read_point_cloud(output)?;
    println!(
        "   Wrote {} (binary little endian), reloaded {} points, colors: {}",
        output,
        reloaded.len(),
        reloaded.has_colors()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

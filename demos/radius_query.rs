//! Example comparing the spatial index against brute-force search
//!
//! This example shows how to build the r-tree index over a point
//! cloud's positions, run radius and k-nearest queries, and check the
//! results against the brute-force reference implementation.

use pointbrush_algorithms::{BruteForceSearch, RTreeIndex};
use pointbrush_core::{NearestNeighborSearch, Point3f};
use rand::Rng;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Radius Query Example ===\n");

    // A regular grid plus some random points for less uniform spacing
    let mut positions = Vec::new();
    for x in 0..10 {
        for y in 0..10 {
            for z in 0..10 {
                positions.push(Point3f::new(x as f32 * 0.1, y as f32 * 0.1, z as f32 * 0.1));
            }
        }
    }
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        positions.push(Point3f::new(
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        ));
    }
    println!("Point cloud: {} points\n", positions.len());

    // 1. Build the index
    println!("1. Building the spatial index:");
    let start = Instant::now();
    let index = RTreeIndex::build(&positions);
    println!("   Indexed {} points in {:?}", index.len(), start.elapsed());
    println!();

    // 2. Radius query
    println!("2. Radius query:");
    let query = Point3f::new(0.45, 0.45, 0.45);
    let radius = 0.2;
    let mut neighbors = index.find_radius_neighbors(&query, radius);
    neighbors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    println!("   Query point: ({:.2}, {:.2}, {:.2})", query.x, query.y, query.z);
    println!("   Neighbors within radius {}: {}", radius, neighbors.len());
    for (i, (idx, distance)) in neighbors.iter().take(5).enumerate() {
        println!("   {}. Point {} at distance {:.3}", i + 1, idx, distance);
    }
    if neighbors.len() > 5 {
        println!("   ... and {} more neighbors", neighbors.len() - 5);
    }
    println!();

    // 3. K-nearest query
    println!("3. K-nearest query:");
    let nearest = index.find_k_nearest(&query, 5);
    for (i, (idx, distance)) in nearest.iter().enumerate() {
        println!("   {}. Point {} at distance {:.3}", i + 1, idx, distance);
    }
    println!();

    // 4. Consistency against brute force
    println!("4. Comparing against brute force:");
    let brute_force = BruteForceSearch::new(&positions);

    let mut tree_result = index.find_radius_neighbors(&query, radius);
    let mut brute_result = brute_force.find_radius_neighbors(&query, radius);
    tree_result.sort_by_key(|(idx, _)| *idx);
    brute_result.sort_by_key(|(idx, _)| *idx);

    let results_match = tree_result.len() == brute_result.len()
        && tree_result
            .iter()
            .zip(brute_result.iter())
            .all(|(a, b)| a.0 == b.0 && (a.1 - b.1).abs() < 1e-6);
    println!("   Results match: {}", results_match);
    println!();

    // 5. Performance comparison
    println!("5. Performance comparison:");
    let iterations = 100;
    let query_points: Vec<Point3f> = (0..iterations)
        .map(|_| {
            Point3f::new(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            )
        })
        .collect();

    let start = Instant::now();
    for q in &query_points {
        let _ = index.find_radius_neighbors(q, radius);
    }
    let tree_time = start.elapsed();

    let start = Instant::now();
    for q in &query_points {
        let _ = brute_force.find_radius_neighbors(q, radius);
    }
    let brute_time = start.elapsed();

    println!("   {} radius queries:", iterations);
    println!("   R-tree time: {:?}", tree_time);
    println!("   Brute force time: {:?}", brute_time);
    println!(
        "   Speedup: {:.2}x",
        brute_time.as_nanos() as f64 / tree_time.as_nanos() as f64
    );
    println!();

    // 6. Edge cases
    println!("6. Edge cases:");
    let empty = RTreeIndex::build(&[]);
    let empty_result = empty.find_radius_neighbors(&query, 1.0);
    println!("   Empty index result: {} neighbors", empty_result.len());

    let exact = index.find_radius_neighbors(&Point3f::new(0.1, 0.1, 0.1), 0.0);
    println!("   radius = 0 result: {} neighbors", exact.len());

    let negative = index.find_radius_neighbors(&query, -1.0);
    println!("   negative radius result: {} neighbors", negative.len());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

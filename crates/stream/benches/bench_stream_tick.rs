//! Micro-benchmarks for the per-frame streaming path.
//!
//! Run with: cargo bench -p runner-stream

use rand::SeedableRng;
use rand_pcg::Pcg32;
use runner_common::TemplateId;
use runner_kernel::World;
use runner_stream::{LevelSetup, StreamConfig, StreamController};
use std::hint::black_box;
use std::time::Instant;

fn controller(segments_to_keep: usize) -> StreamController<World, Pcg32> {
    let setup = LevelSetup::new(
        StreamConfig {
            segments_to_keep,
            ..StreamConfig::default()
        },
        (0..8).map(TemplateId).collect(),
        TemplateId(100),
    );
    let mut c = StreamController::new(setup, World::new(), Pcg32::seed_from_u64(1));
    if let Err(e) = c.start() {
        panic!("bench setup failed: {e}");
    }
    c
}

fn bench_tick(segments_to_keep: usize, speed: f32, iterations: usize) {
    let mut c = controller(segments_to_keep);
    let mut z = c.frontier_position() - 40.0;

    let start = Instant::now();
    for _ in 0..iterations {
        z += speed;
        black_box(c.tick(black_box(z)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  tick (keep={segments_to_keep}, speed={speed}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}, spawned {}",
        c.stats().segments_spawned
    );
}

fn bench_start_stop(segments_to_keep: usize, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let mut c = controller(segments_to_keep);
        black_box(c.stop());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  start+stop (keep={segments_to_keep}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Stream Tick Benchmarks ===\n");

    println!("Idle ticks (no spawn):");
    bench_tick(5, 0.0, 100_000);

    println!("\nSteady ticks (spawn + retire every frame):");
    bench_tick(5, 10.0, 100_000);
    bench_tick(64, 10.0, 100_000);
    bench_tick(1024, 10.0, 100_000);

    println!("\nSession lifecycle:");
    bench_start_stop(5, 10_000);
    bench_start_stop(256, 1_000);

    println!("\n=== Done ===");
}

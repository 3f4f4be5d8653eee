use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::{Map, Value};

/// Write a synthetic tuning result for trying out the trellis viewer.
#[derive(Parser)]
#[command(name = "generate-sample")]
struct Cli {
    /// Output JSON file
    #[arg(value_name = "OUT", default_value = "sample_results.json")]
    output: PathBuf,
}

/// Synthetic kernel run time: fastest around 128×4 threads with a tile of 4.
fn run_time(block_x: f64, block_y: f64, tile: f64, rng: &mut SimpleRng) -> f64 {
    let threads = block_x * block_y;
    let occupancy = ((threads.log2() - 9.0).powi(2) / 4.0).exp();
    let shape = (block_x.log2() - 7.0).abs() * 0.15;
    let tiling = (tile.log2() - 2.0).powi(2) * 0.1;
    (1.0 + shape + tiling) * occupancy + rng.gauss(0.0, 0.02)
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> anyhow::Result<()> {
    let output_path = Cli::parse().output;

    let mut rng = SimpleRng::new(42);

    let block_sizes_x = [16.0, 32.0, 64.0, 128.0, 256.0];
    let block_sizes_y = [1.0, 2.0, 4.0, 8.0];
    let tile_sizes = [1.0, 2.0, 4.0, 8.0];

    // column name → row index → value, the pandas `orient='columns'` layout
    let mut columns: BTreeMap<&str, Map<String, Value>> = BTreeMap::new();
    let mut row: usize = 0;
    for &bx in &block_sizes_x {
        for &by in &block_sizes_y {
            for &tile in &tile_sizes {
                // Repeated measurements give the aggregation something to do.
                for _ in 0..2 {
                    let time = run_time(bx, by, tile, &mut rng);
                    for (name, value) in [
                        ("block_size_x", bx),
                        ("block_size_y", by),
                        ("tile_size", tile),
                        ("time", time),
                    ] {
                        columns
                            .entry(name)
                            .or_default()
                            .insert(row.to_string(), Value::from(value));
                    }
                    row += 1;
                }
            }
        }
    }

    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    serde_json::to_writer_pretty(file, &columns).context("writing JSON")?;

    println!("Wrote {row} tuning results to {}", output_path.display());
    Ok(())
}

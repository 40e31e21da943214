use std::io::Write;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use adviter::SeqExt;

/// Values are drawn from this half-open range.
pub const VALUE_RANGE: std::ops::Range<i32> = 1..100;

/// Draws `count` values, reproducibly when `seed` is given.
pub fn draw(count: usize, seed: Option<u64>) -> Vec<i32> {
    match seed {
        Some(seed) => draw_with(&mut StdRng::seed_from_u64(seed), count),
        None => draw_with(&mut rand::rng(), count),
    }
}

fn draw_with<R: Rng>(rng: &mut R, count: usize) -> Vec<i32> {
    (0..count).map(|_| rng.random_range(VALUE_RANGE)).collect()
}

/// Writes one label per value, in draw order.
pub fn write_labels<W: Write>(values: &[i32], threshold: i32, out: &mut W) -> Result<()> {
    let labels = values
        .iter()
        .select_if(|n| **n > threshold, |_| "Bigger", |_| "Smaller");
    for label in labels {
        writeln!(out, "{label}").context("Failed to write label")?;
    }
    Ok(())
}

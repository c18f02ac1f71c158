//! Synthetic input files in the ingestion formats
//!
//! Used to exercise the pipeline end to end without real data.

use crate::{Error, Result};
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write `users` lines of uniformly random `"<lat>,<lon>"` pairs
pub fn generate_locations<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    users: usize,
    rng: &mut R,
) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    for _ in 0..users {
        let lat: f64 = rng.gen_range(-90.0..90.0);
        let lon: f64 = rng.gen_range(-180.0..180.0);
        writeln!(out, "{lat:.6},{lon:.6}").map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), users, "Generated locations");
    Ok(())
}

/// Write `users` lines of follow lists
///
/// Line `i` lists between 0 and `max_per_user` distinct targets in
/// `[1, users]`, never `i` itself; users without follows get an empty line.
pub fn generate_connections<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    users: usize,
    max_per_user: usize,
    rng: &mut R,
) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    let others = users.saturating_sub(1);
    let mut edges = 0usize;

    for user in 1..=users {
        let count = rng.gen_range(0..=max_per_user.min(others));
        let targets: Vec<String> = rand::seq::index::sample(rng, others, count)
            .into_iter()
            .map(|idx| if idx + 1 < user { idx + 1 } else { idx + 2 })
            .map(|target| target.to_string())
            .collect();
        edges += targets.len();
        writeln!(out, "{}", targets.join(",")).map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), users, edges, "Generated connections");
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| Error::io(path, e))
}

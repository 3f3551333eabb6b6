use crate::foundation::core::FrameViewMut;
use crate::foundation::error::{WarpError, WarpResult};

/// Minimum output rows handed to one band; amortizes dispatch overhead and
/// has no effect on results.
pub(crate) const MIN_ROWS_PER_BAND: u32 = 20;

/// Fork-join worker pool for row-band parallelism.
///
/// Every warp entry point accepts `Option<&Worker>`; `None` runs the kernel
/// on the calling thread. With a worker, the output row range is split into
/// contiguous bands and each band is computed independently; the call joins
/// before returning. Each band owns a disjoint mutable slice of the output,
/// so results are byte-identical for every thread count.
pub struct Worker {
    pool: rayon::ThreadPool,
}

impl Worker {
    /// Build a worker over a pool with rayon's default thread count.
    pub fn new() -> WarpResult<Self> {
        build_pool(None)
    }

    /// Build a worker with an explicit thread count (must be >= 1).
    pub fn with_threads(threads: usize) -> WarpResult<Self> {
        build_pool(Some(threads))
    }

    pub(crate) fn max_bands(&self) -> usize {
        self.pool.current_num_threads().max(1)
    }
}

fn build_pool(threads: Option<usize>) -> WarpResult<Worker> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(WarpError::layout("worker 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| WarpError::Other(anyhow::Error::new(e)))?;
    Ok(Worker { pool })
}

/// Row counts of the bands a `rows`-high output is split into: as many
/// near-equal bands as the pool has threads, none smaller than `min_rows`.
pub(crate) fn band_heights(rows: u32, min_rows: u32, max_bands: usize) -> Vec<u32> {
    let largest = (rows / min_rows.max(1)).max(1);
    let bands = largest.min(max_bands as u32).max(1);
    let base = rows / bands;
    let rem = rows % bands;
    (0..bands).map(|i| base + u32::from(i < rem)).collect()
}

fn split_bands<'a, T>(view: FrameViewMut<'a, T>, heights: &[u32]) -> Vec<FrameViewMut<'a, T>> {
    let mut bands = Vec::with_capacity(heights.len());
    let mut rest = view;
    for &h in &heights[..heights.len() - 1] {
        let (band, tail) = rest.split_at_row(h);
        bands.push(band);
        rest = tail;
    }
    bands.push(rest);
    bands
}

/// Run `f(first_row, band)` over disjoint row bands of `out`.
pub(crate) fn run_bands<T, F>(worker: Option<&Worker>, out: FrameViewMut<'_, T>, f: F)
where
    T: Send,
    F: Fn(u32, FrameViewMut<'_, T>) + Sync,
{
    let Some(worker) = worker else {
        f(0, out);
        return;
    };

    let heights = band_heights(out.height(), MIN_ROWS_PER_BAND, worker.max_bands());
    if heights.len() <= 1 {
        f(0, out);
        return;
    }

    let bands = split_bands(out, &heights);
    worker.pool.scope(|s| {
        let f = &f;
        let mut first = 0u32;
        for (&h, band) in heights.iter().zip(bands) {
            s.spawn(move |_| f(first, band));
            first += h;
        }
    });
}

/// Run `f(first_row, band, mask_band)` over matching disjoint row bands of
/// `out` and `mask`. Caller guarantees equal heights.
pub(crate) fn run_bands_masked<T, F>(
    worker: Option<&Worker>,
    out: FrameViewMut<'_, T>,
    mask: FrameViewMut<'_, u8>,
    f: F,
) where
    T: Send,
    F: Fn(u32, FrameViewMut<'_, T>, FrameViewMut<'_, u8>) + Sync,
{
    debug_assert_eq!(out.height(), mask.height());

    let Some(worker) = worker else {
        f(0, out, mask);
        return;
    };

    let heights = band_heights(out.height(), MIN_ROWS_PER_BAND, worker.max_bands());
    if heights.len() <= 1 {
        f(0, out, mask);
        return;
    }

    let bands = split_bands(out, &heights);
    let mask_bands = split_bands(mask, &heights);
    worker.pool.scope(|s| {
        let f = &f;
        let mut first = 0u32;
        for ((&h, band), mask_band) in heights.iter().zip(bands).zip(mask_bands) {
            s.spawn(move |_| f(first, band, mask_band));
            first += h;
        }
    });
}

#[cfg(test)]
#[path = "../tests/unit/worker.rs"]
mod tests;

//! Node-range partitioning and fork-join reduction.
//!
//! Each evaluation phase is data-parallel over contiguous node slices. A
//! bond (i, p) writes force contributions to both node i and node p, and p
//! may fall in another worker's slice, so every worker accumulates into its
//! own private full-size buffer and the buffers are summed elementwise in
//! fixed worker order after all workers complete. No shared accumulator is
//! written concurrently, and the fixed merge order keeps floating-point
//! results reproducible for a given worker count.

use crate::error::{Error, Result};
use rayon::prelude::*;
use std::ops::Range;

/// Evaluation options.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Number of workers T (≥ 1). T = 1 degrades to sequential execution
    /// with identical results; T controls the partitioning, not the math.
    pub n_workers: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self { n_workers: 1 }
    }
}

impl EvalOptions {
    /// Options for the given worker count.
    pub fn with_workers(n_workers: usize) -> Self {
        Self { n_workers }
    }
}

/// Split `[0, n_nodes)` into `n_workers` contiguous slices.
///
/// Each slice gets `n_nodes / n_workers` nodes; the last slice absorbs the
/// remainder. Slices may be empty when there are more workers than nodes.
///
/// # Errors
///
/// Returns `InvalidConfiguration` if `n_workers` is zero.
pub fn split_ranges(n_nodes: usize, n_workers: usize) -> Result<Vec<Range<usize>>> {
    if n_workers == 0 {
        return Err(Error::InvalidConfiguration(
            "worker count must be at least 1".into(),
        ));
    }

    let part = n_nodes / n_workers;
    let mut ranges = Vec::with_capacity(n_workers);
    for worker in 0..n_workers {
        let start = worker * part;
        let end = if worker < n_workers - 1 {
            (worker + 1) * part
        } else {
            n_nodes
        };
        ranges.push(start..end);
    }
    Ok(ranges)
}

/// Run `f` once per slice with a private zeroed buffer of `buf_len`, then
/// sum the buffers elementwise in slice order.
pub fn sum_reduce<F>(ranges: &[Range<usize>], buf_len: usize, f: F) -> Result<Vec<f64>>
where
    F: Fn(Range<usize>, &mut [f64]) -> Result<()> + Sync,
{
    let buffers: Vec<Vec<f64>> = ranges
        .par_iter()
        .map(|range| {
            let mut buf = vec![0.0; buf_len];
            f(range.clone(), &mut buf)?;
            Ok(buf)
        })
        .collect::<Result<_>>()?;

    let mut merged = vec![0.0; buf_len];
    for buf in &buffers {
        for (m, v) in merged.iter_mut().zip(buf) {
            *m += v;
        }
    }
    Ok(merged)
}

/// Like [`sum_reduce`], but each worker fills two private buffers (e.g. the
/// dilatation field and the bond extension arena of one phase).
pub fn sum_reduce_pair<F>(
    ranges: &[Range<usize>],
    len_a: usize,
    len_b: usize,
    f: F,
) -> Result<(Vec<f64>, Vec<f64>)>
where
    F: Fn(Range<usize>, &mut [f64], &mut [f64]) -> Result<()> + Sync,
{
    let buffers: Vec<(Vec<f64>, Vec<f64>)> = ranges
        .par_iter()
        .map(|range| {
            let mut a = vec![0.0; len_a];
            let mut b = vec![0.0; len_b];
            f(range.clone(), &mut a, &mut b)?;
            Ok((a, b))
        })
        .collect::<Result<_>>()?;

    let mut merged_a = vec![0.0; len_a];
    let mut merged_b = vec![0.0; len_b];
    for (a, b) in &buffers {
        for (m, v) in merged_a.iter_mut().zip(a) {
            *m += v;
        }
        for (m, v) in merged_b.iter_mut().zip(b) {
            *m += v;
        }
    }
    Ok((merged_a, merged_b))
}

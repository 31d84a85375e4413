use crate::error::{Error, Result};
use crate::palette::{Palette, PaletteEntry};
use image::Rgb;
use log::{debug, trace};
use std::ops::Range;

/// Inputs longer than this are stride-sampled before splitting.
pub const MAX_SAMPLES: usize = 25_000;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
enum SplitBy {
    #[default]
    Red,
    Green,
    Blue,
}

impl SplitBy {
    const ALL: [SplitBy; 3] = [SplitBy::Red, SplitBy::Green, SplitBy::Blue];

    #[inline]
    fn channel(self) -> usize {
        match self {
            SplitBy::Red => 0,
            SplitBy::Green => 1,
            SplitBy::Blue => 2,
        }
    }
}

/// A contiguous run of the shared sample buffer plus its per-channel extent.
#[derive(Clone, Debug)]
struct Bucket {
    span: Range<usize>,
    deltas: [u8; 3],
}

impl Bucket {
    fn from(colors: &[Rgb<u8>], span: Range<usize>) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for c in &colors[span.clone()] {
            for ch in 0..3 {
                min[ch] = min[ch].min(c[ch]);
                max[ch] = max[ch].max(c[ch]);
            }
        }
        let mut deltas = [0; 3];
        for ch in 0..3 {
            deltas[ch] = max[ch].saturating_sub(min[ch]);
        }
        Self { span, deltas }
    }

    #[inline]
    fn len(&self) -> usize {
        self.span.len()
    }

    fn mean(&self, colors: &[Rgb<u8>]) -> PaletteEntry {
        let mut sum = [0u64; 3];
        for c in &colors[self.span.clone()] {
            for ch in 0..3 {
                sum[ch] += c[ch] as u64;
            }
        }
        let len = self.len().max(1) as u64;
        // Round half up, all values are non-negative.
        let [r, g, b] = sum.map(|s| ((2 * s + len) / (2 * len)) as u8);
        PaletteEntry::new(r, g, b)
    }
}

/// Keeps every `len / MAX_SAMPLES`-th sample once the input exceeds
/// [`MAX_SAMPLES`], preserving order.
pub fn subsample(samples: &[Rgb<u8>]) -> Vec<Rgb<u8>> {
    if samples.len() <= MAX_SAMPLES {
        return samples.to_vec();
    }
    let step = samples.len() / MAX_SAMPLES;
    let kept: Vec<_> = samples.iter().step_by(step).copied().collect();
    debug!(
        "median_cut: sub-sampled {} colors to {} (step {step})",
        samples.len(),
        kept.len()
    );
    kept
}

/// Bucket and axis with the widest channel extent. Ties keep the first one
/// seen, scanning buckets in order and channels as R, G, B.
fn widest(buckets: &[Bucket]) -> Option<(usize, SplitBy, u8)> {
    let mut best: Option<(usize, SplitBy, u8)> = None;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.len() < 2 {
            continue;
        }
        for split_by in SplitBy::ALL {
            let delta = bucket.deltas[split_by.channel()];
            if best.map_or(true, |(_, _, d)| delta > d) {
                best = Some((i, split_by, delta));
            }
        }
    }
    best
}

/// Median-cut quantization of `samples` into at most `palette_size` colors,
/// sorted by ascending luminance.
///
/// The result is shorter than requested when every bucket is down to a single
/// color. A `palette_size` of zero is treated as one.
pub fn quantize(samples: &[Rgb<u8>], palette_size: usize) -> Result<Palette> {
    if samples.is_empty() {
        return Err(Error::EmptySamples);
    }
    let palette_size = palette_size.max(1);
    debug!("median_cut: requested palette size: {}", palette_size);

    let mut colors = subsample(samples);
    let mut buckets = vec![Bucket::from(&colors, 0..colors.len())];

    while buckets.len() < palette_size {
        let Some((i, split_by, delta)) = widest(&buckets) else {
            break;
        };
        if delta == 0 {
            break;
        }
        let span = buckets[i].span.clone();
        let ch = split_by.channel();
        // Stable, so equal values keep their relative order.
        colors[span.clone()].sort_by_key(|c| c[ch]);
        let mid = (span.len() / 2).max(1);
        trace!(
            "median_cut: split bucket {i} ({} colors) by {split_by:?}, delta {delta}",
            span.len()
        );
        let left = Bucket::from(&colors, span.start..span.start + mid);
        let right = Bucket::from(&colors, span.start + mid..span.end);
        buckets[i] = left;
        buckets.insert(i + 1, right);
    }

    let mut entries: Vec<PaletteEntry> = buckets.iter().map(|b| b.mean(&colors)).collect();
    entries.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));
    debug!("median_cut: colors_count: {}", entries.len());
    Ok(Palette::new(entries))
}

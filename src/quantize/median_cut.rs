//! Median-cut palette extraction over a reduced-precision histogram

use std::collections::BinaryHeap;

use crate::buffer::PixelBuffer;
use crate::color::rgba::Rgba;
use crate::io::error::{Result, source_data_error};

/// Significant bits kept per channel in the reduced color space
const SIGBITS: u32 = 5;
/// Bits dropped from each 8-bit channel
const RSHIFT: u32 = 8 - SIGBITS;
/// Number of histogram bins
const HISTOGRAM_SIZE: usize = 1 << (3 * SIGBITS);
/// Guard against splitting loops that make no progress
const MAX_ITERATIONS: usize = 1000;
/// Share of the palette filled in the population-ordered phase
const POPULATION_FRACTION: f64 = 0.75;

/// Channel axes of the reduced color space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Red,
    Green,
    Blue,
}

/// Axis-aligned box in reduced RGB space bounding a pixel population
#[derive(Debug, Clone, Copy)]
struct VBox {
    r1: u32,
    r2: u32,
    g1: u32,
    g2: u32,
    b1: u32,
    b2: u32,
    count: u64,
}

impl VBox {
    /// Smallest box covering every populated histogram bin
    fn from_histogram(histogram: &[u64]) -> Option<Self> {
        let mut min = [u32::MAX; 3];
        let mut max = [0u32; 3];
        let mut total = 0u64;
        for (index, &count) in histogram.iter().enumerate() {
            if count == 0 {
                continue;
            }
            total += count;
            let rgb = bin_channels(index);
            for (channel, &value) in rgb.iter().enumerate() {
                if let Some(entry) = min.get_mut(channel) {
                    *entry = (*entry).min(value);
                }
                if let Some(entry) = max.get_mut(channel) {
                    *entry = (*entry).max(value);
                }
            }
        }
        (total > 0).then(|| Self {
            r1: min.first().copied().unwrap_or(0),
            r2: max.first().copied().unwrap_or(0),
            g1: min.get(1).copied().unwrap_or(0),
            g2: max.get(1).copied().unwrap_or(0),
            b1: min.get(2).copied().unwrap_or(0),
            b2: max.get(2).copied().unwrap_or(0),
            count: total,
        })
    }

    const fn volume(&self) -> u64 {
        ((self.r2 - self.r1 + 1) as u64)
            * ((self.g2 - self.g1 + 1) as u64)
            * ((self.b2 - self.b1 + 1) as u64)
    }

    fn population(&self, histogram: &[u64]) -> u64 {
        let mut total = 0;
        for r in self.r1..=self.r2 {
            for g in self.g1..=self.g2 {
                for b in self.b1..=self.b2 {
                    total += histogram.get(bin_index(r, g, b)).copied().unwrap_or(0);
                }
            }
        }
        total
    }

    fn longest_axis(&self) -> Axis {
        let r = self.r2 - self.r1;
        let g = self.g2 - self.g1;
        let b = self.b2 - self.b1;
        if r >= g && r >= b {
            Axis::Red
        } else if g >= b {
            Axis::Green
        } else {
            Axis::Blue
        }
    }

    const fn axis_range(&self, axis: Axis) -> (u32, u32) {
        match axis {
            Axis::Red => (self.r1, self.r2),
            Axis::Green => (self.g1, self.g2),
            Axis::Blue => (self.b1, self.b2),
        }
    }

    /// Histogram population of one slice perpendicular to `axis`
    fn slice_population(&self, axis: Axis, at: u32, histogram: &[u64]) -> u64 {
        let mut sum = 0;
        match axis {
            Axis::Red => {
                for g in self.g1..=self.g2 {
                    for b in self.b1..=self.b2 {
                        sum += histogram.get(bin_index(at, g, b)).copied().unwrap_or(0);
                    }
                }
            }
            Axis::Green => {
                for r in self.r1..=self.r2 {
                    for b in self.b1..=self.b2 {
                        sum += histogram.get(bin_index(r, at, b)).copied().unwrap_or(0);
                    }
                }
            }
            Axis::Blue => {
                for r in self.r1..=self.r2 {
                    for g in self.g1..=self.g2 {
                        sum += histogram.get(bin_index(r, g, at)).copied().unwrap_or(0);
                    }
                }
            }
        }
        sum
    }

    fn with_axis_bounds(&self, axis: Axis, low: u32, high: u32, histogram: &[u64]) -> Self {
        let mut vbox = *self;
        match axis {
            Axis::Red => {
                vbox.r1 = low;
                vbox.r2 = high;
            }
            Axis::Green => {
                vbox.g1 = low;
                vbox.g2 = high;
            }
            Axis::Blue => {
                vbox.b1 = low;
                vbox.b2 = high;
            }
        }
        vbox.count = vbox.population(histogram);
        vbox
    }

    /// Frequency-weighted average color of the box, or its midpoint when empty
    fn average(&self, histogram: &[u64]) -> Rgba {
        let mult = f64::from(1u32 << RSHIFT);
        let mut total = 0u64;
        let mut sums = [0.0f64; 3];
        for r in self.r1..=self.r2 {
            for g in self.g1..=self.g2 {
                for b in self.b1..=self.b2 {
                    let count = histogram.get(bin_index(r, g, b)).copied().unwrap_or(0);
                    if count == 0 {
                        continue;
                    }
                    total += count;
                    let weight = count as f64 * mult;
                    for (sum, value) in sums.iter_mut().zip([r, g, b]) {
                        *sum += weight * (f64::from(value) + 0.5);
                    }
                }
            }
        }
        if total > 0 {
            let channel =
                |sum: f64| -> u8 { (sum / total as f64).min(255.0) as u8 };
            Rgba::opaque(
                channel(sums.first().copied().unwrap_or(0.0)),
                channel(sums.get(1).copied().unwrap_or(0.0)),
                channel(sums.get(2).copied().unwrap_or(0.0)),
            )
        } else {
            self.midpoint()
        }
    }

    /// Geometric center of the box mapped back to 8-bit channels
    fn midpoint(&self) -> Rgba {
        let mult = f64::from(1u32 << RSHIFT);
        let center =
            |low: u32, high: u32| -> u8 { (mult * f64::from(low + high + 1) / 2.0).min(255.0) as u8 };
        Rgba::opaque(
            center(self.r1, self.r2),
            center(self.g1, self.g2),
            center(self.b1, self.b2),
        )
    }
}

const fn bin_index(r: u32, g: u32, b: u32) -> usize {
    ((r << (2 * SIGBITS)) | (g << SIGBITS) | b) as usize
}

const fn bin_channels(index: usize) -> [u32; 3] {
    let mask = (1u32 << SIGBITS) - 1;
    [
        (index as u32 >> (2 * SIGBITS)) & mask,
        (index as u32 >> SIGBITS) & mask,
        index as u32 & mask,
    ]
}

/// Heap entry carrying a precomputed priority; the largest pops first
struct Prioritized {
    priority: u64,
    vbox: VBox,
}

impl PartialEq for Prioritized {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for Prioritized {}
impl PartialOrd for Prioritized {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Prioritized {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority.cmp(&other.priority)
    }
}

/// Split one box at the median of its longest axis
///
/// A box covering a single pixel is returned unsplit. The cut point slides
/// towards the larger side of the median bin and back off empty leading
/// bins, so the first sub-box is never empty; the second sub-box is absent
/// when the cut lands on the last bin.
fn median_cut(vbox: &VBox, histogram: &[u64]) -> Option<(VBox, Option<VBox>)> {
    if vbox.count == 0 {
        return None;
    }
    if vbox.count == 1 {
        return Some((*vbox, None));
    }

    let axis = vbox.longest_axis();
    let (low, high) = vbox.axis_range(axis);

    // Cumulative population along the axis
    let mut partial = Vec::with_capacity((high - low + 1) as usize);
    let mut total = 0u64;
    for at in low..=high {
        total += vbox.slice_population(axis, at, histogram);
        partial.push(total);
    }
    let sum_to = |at: i64| -> u64 {
        if at < i64::from(low) || at > i64::from(high) {
            return 0;
        }
        partial
            .get((at - i64::from(low)) as usize)
            .copied()
            .unwrap_or(0)
    };

    for at in low..=high {
        if sum_to(i64::from(at)) > total / 2 {
            let left = i64::from(at - low);
            let right = i64::from(high - at);
            let mut cut = if left <= right {
                (i64::from(high) - 1).min(i64::from(at) + right / 2)
            } else {
                i64::from(low).max(i64::from(at) - 1 - left / 2)
            };
            while cut < i64::from(high) && sum_to(cut) == 0 {
                cut += 1;
            }
            while cut > i64::from(low) && sum_to(cut) >= total && sum_to(cut - 1) > 0 {
                cut -= 1;
            }
            let cut = cut.clamp(i64::from(low), i64::from(high)) as u32;
            let first = vbox.with_axis_bounds(axis, low, cut, histogram);
            let second = (cut < high)
                .then(|| vbox.with_axis_bounds(axis, cut + 1, high, histogram));
            return Some((first, second));
        }
    }
    None
}

/// Run one splitting phase until `target` boxes exist or progress stalls
fn split_until(
    queue: &mut BinaryHeap<Prioritized>,
    target: usize,
    histogram: &[u64],
    priority: impl Fn(&VBox) -> u64,
) {
    let mut iterations = 0;
    while queue.len() < target && iterations < MAX_ITERATIONS {
        iterations += 1;
        let Some(entry) = queue.pop() else {
            return;
        };
        let vbox = entry.vbox;
        if vbox.count == 0 {
            // Nothing left to split here; park it and try the next candidate
            queue.push(Prioritized {
                priority: priority(&vbox),
                vbox,
            });
            continue;
        }
        let Some((first, second)) = median_cut(&vbox, histogram) else {
            continue;
        };
        queue.push(Prioritized {
            priority: priority(&first),
            vbox: first,
        });
        if let Some(second) = second {
            queue.push(Prioritized {
                priority: priority(&second),
                vbox: second,
            });
        }
    }
}

/// Extract a palette of exactly `number_of_colors` entries by median cut
///
/// Pixels are flattened onto `background` before binning. The first phase
/// splits the most populated box until three quarters of the palette exists;
/// the second phase reprioritizes by population times volume and splits
/// until the full count is reached. Each final box contributes its
/// frequency-weighted average color.
///
/// # Errors
///
/// Returns an error when the buffer holds no pixels.
pub(crate) fn median_cut_palette(
    pixels: &PixelBuffer<'_>,
    number_of_colors: usize,
    background: Rgba,
) -> Result<Vec<Rgba>> {
    let mut histogram = vec![0u64; HISTOGRAM_SIZE];
    for pixel in pixels.pixels() {
        let flat = pixel.flatten_onto(background);
        let index = bin_index(
            u32::from(flat.red >> RSHIFT),
            u32::from(flat.green >> RSHIFT),
            u32::from(flat.blue >> RSHIFT),
        );
        if let Some(bin) = histogram.get_mut(index) {
            *bin += 1;
        }
    }

    let seed = VBox::from_histogram(&histogram)
        .ok_or_else(|| source_data_error("image contains no pixels to quantize"))?;

    let population_target = (POPULATION_FRACTION * number_of_colors as f64).ceil() as usize;
    let mut queue = BinaryHeap::new();
    queue.push(Prioritized {
        priority: seed.count,
        vbox: seed,
    });
    split_until(
        &mut queue,
        population_target.min(number_of_colors),
        &histogram,
        |vbox| vbox.count,
    );

    let coverage = |vbox: &VBox| vbox.count * vbox.volume();
    let mut queue: BinaryHeap<Prioritized> = queue
        .drain()
        .map(|entry| Prioritized {
            priority: coverage(&entry.vbox),
            vbox: entry.vbox,
        })
        .collect();
    split_until(&mut queue, number_of_colors, &histogram, coverage);

    // Ascending coverage order, matching the color-map ordering of the
    // original quantizer
    let mut boxes: Vec<VBox> = queue.drain().map(|entry| entry.vbox).collect();
    boxes.sort_by_key(|vbox| vbox.count * vbox.volume());

    // Stalled splits (single-bin populations) can leave the palette short;
    // pad with red-channel nudges off the seed box midpoint so the entry
    // count is exact and no entry repeats
    let mut colors: Vec<Rgba> = boxes.iter().map(|vbox| vbox.average(&histogram)).collect();
    let base = seed.midpoint();
    let mut nudge = 0u8;
    while colors.len() < number_of_colors {
        let mut candidate = Rgba::opaque(base.red.wrapping_add(nudge), base.green, base.blue);
        while colors.contains(&candidate) {
            nudge = nudge.wrapping_add(1);
            candidate = Rgba::opaque(base.red.wrapping_add(nudge), base.green, base.blue);
        }
        colors.push(candidate);
        nudge = nudge.wrapping_add(1);
    }
    colors.truncate(number_of_colors);
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::{VBox, bin_channels, bin_index, median_cut};

    #[test]
    fn test_bin_index_round_trips() {
        let index = bin_index(31, 7, 15);
        assert_eq!(bin_channels(index), [31, 7, 15]);
    }

    #[test]
    fn test_median_cut_splits_longest_axis() {
        let mut histogram = vec![0u64; 1 << 15];
        // Two populations far apart on the red axis
        histogram[bin_index(2, 16, 16)] = 50;
        histogram[bin_index(28, 16, 16)] = 50;
        let vbox = VBox::from_histogram(&histogram).unwrap();
        assert_eq!(vbox.count, 100);
        let (first, second) = median_cut(&vbox, &histogram).unwrap();
        let second = second.unwrap();
        assert_eq!(first.count + second.count, 100);
        assert!(first.r2 < second.r1);
    }

    #[test]
    fn test_single_bin_box_does_not_split() {
        let mut histogram = vec![0u64; 1 << 15];
        histogram[bin_index(10, 10, 10)] = 9;
        let vbox = VBox::from_histogram(&histogram).unwrap();
        let (first, second) = median_cut(&vbox, &histogram).unwrap();
        assert!(second.is_none());
        assert_eq!(first.count, 9);
    }
}

//! Shared-axis alignment for independently-scraped metric series.
//!
//! Collectors scrape on their own schedules, so samples describing the
//! same instant rarely carry identical timestamps. Chart renderers need
//! every plotted series to supply a value for every tick of one shared
//! x-axis. This module merges series onto such an axis, marking ticks a
//! series has no sample for with NaN instead of interpolating, so a
//! renderer can show a gap rather than invented data.
//!
//! Only the leading edges of the timestamp lists are reconciled: once
//! two series start within [`TIMESTAMP_TOLERANCE_MS`] of each other,
//! the remainders are taken as congruent. Series that drift apart after
//! a matching start will land under shared ticks anyway.

use std::cmp::Ordering;

use super::series::Series;

/// Timestamps closer than this (in milliseconds) are treated as the
/// same instant, absorbing independent-collector sampling jitter.
pub const TIMESTAMP_TOLERANCE_MS: i64 = 1000;

/// Order two millisecond timestamps, treating values within
/// [`TIMESTAMP_TOLERANCE_MS`] of each other as equal.
pub fn compare_timestamps(a: i64, b: i64) -> Ordering {
    if (a - b).abs() < TIMESTAMP_TOLERANCE_MS {
        Ordering::Equal
    } else {
        a.cmp(&b)
    }
}

/// One series aligned to a shared axis: `values[i]` belongs to tick
/// `timestamps[i]` of the owning frame, with NaN marking "no sample".
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// The aligner's output: one shared timestamp axis plus one value row
/// per input series, every row as long as the axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedFrame {
    /// Shared axis in epoch milliseconds, ascending.
    pub timestamps: Vec<i64>,
    pub series: Vec<AlignedSeries>,
}

impl AlignedFrame {
    /// Merge series onto one shared timestamp axis.
    ///
    /// Each series must carry its samples sorted ascending by
    /// timestamp; that precondition is not checked, and unsorted input
    /// yields meaningless (not erroneous) output. The fold is total:
    /// empty input produces an empty frame, and a series without
    /// samples becomes an all-NaN row.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwatch::data::{AlignedFrame, Sample, Series};
    ///
    /// let reqs = Series::new("requests", vec![Sample::new(15_000, 5.0), Sample::new(20_000, 6.0)]);
    /// let errs = Series::new("errors", vec![Sample::new(20_001, 1.0)]);
    ///
    /// let frame = AlignedFrame::from_series(&[reqs, errs]);
    /// assert_eq!(frame.timestamps, vec![15_000, 20_000]);
    /// assert!(frame.series[1].values[0].is_nan());
    /// assert_eq!(frame.series[1].values[1], 1.0);
    /// ```
    pub fn from_series(series: &[Series]) -> Self {
        let mut timestamps: Vec<i64> = Vec::new();
        let mut aligned: Vec<AlignedSeries> = Vec::new();

        for s in series {
            let new_ts: Vec<i64> = s.samples.iter().map(|p| p.at).collect();
            let mut values: Vec<f64> = s.samples.iter().map(|p| p.value).collect();

            if timestamps.is_empty() {
                timestamps = new_ts;
                // Series accumulated while the axis was empty had no
                // samples of their own; grow them to the adopted axis.
                for prior in &mut aligned {
                    prior.values = vec![f64::NAN; timestamps.len()];
                }
                aligned.push(AlignedSeries {
                    name: s.name.clone(),
                    values,
                });
                continue;
            }

            if new_ts.is_empty() {
                aligned.push(AlignedSeries {
                    name: s.name.clone(),
                    values: vec![f64::NAN; timestamps.len()],
                });
                continue;
            }

            match compare_timestamps(timestamps[0], new_ts[0]) {
                Ordering::Less => {
                    // The axis starts earlier: one gap per leading axis
                    // tick that precedes the new series' first sample.
                    let lead = timestamps
                        .iter()
                        .take_while(|&&t| compare_timestamps(t, new_ts[0]) == Ordering::Less)
                        .count();
                    let mut padded = vec![f64::NAN; lead];
                    padded.append(&mut values);
                    values = padded;
                }
                Ordering::Greater => {
                    // The new series starts earlier: graft its leading
                    // timestamps onto the axis and give every already
                    // accumulated series a gap for each of them.
                    let lead = new_ts
                        .iter()
                        .take_while(|&&t| compare_timestamps(t, timestamps[0]) == Ordering::Less)
                        .count();
                    let mut grafted = new_ts[..lead].to_vec();
                    grafted.append(&mut timestamps);
                    timestamps = grafted;
                    for prior in &mut aligned {
                        let mut padded = vec![f64::NAN; lead];
                        padded.append(&mut prior.values);
                        prior.values = padded;
                    }
                }
                Ordering::Equal => {
                    // Heads coincide within tolerance; the remainders
                    // are taken as congruent and merged as-is.
                }
            }

            aligned.push(AlignedSeries {
                name: s.name.clone(),
                values,
            });
        }

        Self {
            timestamps,
            series: aligned,
        }
    }

    /// Number of ticks on the shared axis.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sample;

    fn series(name: &str, points: &[(i64, f64)]) -> Series {
        Series::new(name, points.iter().map(|&(at, v)| Sample::new(at, v)).collect())
    }

    /// NaN != NaN, so gap positions need explicit comparison.
    fn assert_values(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "length mismatch: {actual:?} vs {expected:?}");
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a.is_nan() && e.is_nan()) || a == e,
                "value {i} differs: {actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn test_compare_timestamps_tolerance() {
        assert_eq!(compare_timestamps(15_000, 15_000), Ordering::Equal);
        assert_eq!(compare_timestamps(15_000, 15_999), Ordering::Equal);
        assert_eq!(compare_timestamps(15_999, 15_000), Ordering::Equal);
        assert_eq!(compare_timestamps(15_000, 16_000), Ordering::Less);
        assert_eq!(compare_timestamps(16_000, 15_000), Ordering::Greater);
    }

    #[test]
    fn empty_input_yields_empty_frame() {
        let frame = AlignedFrame::from_series(&[]);
        assert!(frame.timestamps.is_empty());
        assert!(frame.series.is_empty());
    }

    #[test]
    fn single_series_passes_through() {
        let input = series("a", &[(15_000, 5.0), (20_000, 6.0), (25_000, 5.0)]);
        let frame = AlignedFrame::from_series(&[input]);
        assert_eq!(frame.timestamps, vec![15_000, 20_000, 25_000]);
        assert_eq!(frame.series.len(), 1);
        assert_eq!(frame.series[0].name, "a");
        assert_values(&frame.series[0].values, &[5.0, 6.0, 5.0]);
    }

    #[test]
    fn earlier_starting_series_extends_axis() {
        let a = series("a", &[(15_000, 5.0), (20_000, 6.0), (25_000, 6.0), (30_000, 5.0)]);
        let c = series(
            "c",
            &[(10_001, 3.0), (15_001, 2.0), (20_001, 3.0), (25_001, 2.0), (30_001, 3.0)],
        );

        let frame = AlignedFrame::from_series(&[a, c]);
        assert_eq!(frame.timestamps, vec![10_001, 15_000, 20_000, 25_000, 30_000]);
        assert_values(&frame.series[0].values, &[f64::NAN, 5.0, 6.0, 6.0, 5.0]);
        assert_values(&frame.series[1].values, &[3.0, 2.0, 3.0, 2.0, 3.0]);
    }

    #[test]
    fn later_starting_series_gets_leading_gaps() {
        let a = series("a", &[(15_000, 5.0), (20_000, 6.0), (25_000, 6.0), (30_000, 5.0)]);
        let b = series("b", &[(20_001, 3.0), (25_001, 2.0), (30_001, 3.0)]);

        let frame = AlignedFrame::from_series(&[a, b]);
        assert_eq!(frame.timestamps, vec![15_000, 20_000, 25_000, 30_000]);
        assert_values(&frame.series[1].values, &[f64::NAN, 3.0, 2.0, 3.0]);
    }

    #[test]
    fn several_leading_timestamps_graft_together() {
        let a = series("a", &[(30_000, 1.0), (35_000, 2.0)]);
        let b = series("b", &[(20_000, 7.0), (25_000, 8.0), (30_500, 9.0), (35_500, 7.0)]);

        let frame = AlignedFrame::from_series(&[a, b]);
        assert_eq!(frame.timestamps, vec![20_000, 25_000, 30_000, 35_000]);
        assert_values(&frame.series[0].values, &[f64::NAN, f64::NAN, 1.0, 2.0]);
        assert_values(&frame.series[1].values, &[7.0, 8.0, 9.0, 7.0]);
    }

    #[test]
    fn tolerant_heads_need_no_padding() {
        let a = series("a", &[(15_000, 5.0), (20_000, 6.0)]);
        let b = series("b", &[(15_400, 1.0), (20_400, 2.0)]);

        let frame = AlignedFrame::from_series(&[a, b]);
        assert_eq!(frame.timestamps, vec![15_000, 20_000]);
        assert_values(&frame.series[1].values, &[1.0, 2.0]);
    }

    #[test]
    fn empty_series_becomes_all_gap_row() {
        let a = series("a", &[(15_000, 5.0), (20_000, 6.0)]);
        let empty = series("empty", &[]);

        let frame = AlignedFrame::from_series(&[a, empty]);
        assert_eq!(frame.timestamps, vec![15_000, 20_000]);
        assert_values(&frame.series[1].values, &[f64::NAN, f64::NAN]);
    }

    #[test]
    fn empty_series_first_still_matches_axis_length() {
        let empty = series("empty", &[]);
        let a = series("a", &[(15_000, 5.0), (20_000, 6.0)]);

        let frame = AlignedFrame::from_series(&[empty, a]);
        assert_eq!(frame.timestamps, vec![15_000, 20_000]);
        assert_values(&frame.series[0].values, &[f64::NAN, f64::NAN]);
        assert_values(&frame.series[1].values, &[5.0, 6.0]);
    }

    #[test]
    fn all_rows_share_the_axis_length() {
        let input = vec![
            series("a", &[(15_000, 5.0), (20_000, 6.0), (25_000, 6.0), (30_000, 5.0)]),
            series("b", &[(20_001, 3.0), (25_001, 2.0), (30_001, 3.0)]),
            series("none", &[]),
            series(
                "c",
                &[(10_001, 3.0), (15_001, 2.0), (20_001, 3.0), (25_001, 2.0), (30_001, 3.0)],
            ),
        ];

        let frame = AlignedFrame::from_series(&input);
        assert_eq!(frame.series.len(), input.len());
        for row in &frame.series {
            assert_eq!(row.values.len(), frame.len(), "row {} drifted", row.name);
        }
        for pair in frame.timestamps.windows(2) {
            assert!(pair[0] <= pair[1], "axis not sorted: {:?}", frame.timestamps);
        }
    }
}

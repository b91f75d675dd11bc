//! Column-oriented chart payloads.
//!
//! Chart libraries in the c3/billboard family take their data as an
//! array of columns: the first column is the x axis prefixed with the
//! label `"x"`, each following column is one series prefixed with its
//! name. This module reshapes an [`AlignedFrame`] into that layout.
//! Gap sentinels (NaN) become JSON `null`, which those libraries render
//! as a break in the line.

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::align::AlignedFrame;
use super::series::{Histogram, Series};

/// Label of the shared x-axis column.
pub const X_LABEL: &str = "x";

/// One value column: the series name followed by its aligned values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// A chart-ready column set built from one aligned frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartColumns {
    /// Shared axis ticks in epoch milliseconds.
    pub x: Vec<i64>,
    pub series: Vec<ValueColumn>,
}

impl ChartColumns {
    /// Reshape an aligned frame into columns.
    pub fn from_frame(frame: AlignedFrame) -> Self {
        Self {
            x: frame.timestamps,
            series: frame
                .series
                .into_iter()
                .map(|s| ValueColumn {
                    name: s.name,
                    values: s.values,
                })
                .collect(),
        }
    }

    /// Align a set of series and reshape the result into columns.
    pub fn from_series(series: &[Series]) -> Self {
        Self::from_frame(AlignedFrame::from_series(series))
    }

    /// Build columns for a histogram, one column per stat family.
    ///
    /// Stat labels become the column names; `BTreeMap` iteration keeps
    /// their order stable across calls.
    pub fn from_histogram(histogram: &Histogram) -> Self {
        let series: Vec<Series> = histogram
            .stats
            .iter()
            .map(|(stat, samples)| Series::new(stat.clone(), samples.clone()))
            .collect();
        Self::from_series(&series)
    }

    /// The JSON document a chart consumer loads directly.
    ///
    /// Non-finite values map to `null`.
    pub fn to_json(&self) -> Value {
        let mut columns = Vec::with_capacity(self.series.len() + 1);

        let mut x: Vec<Value> = Vec::with_capacity(self.x.len() + 1);
        x.push(Value::from(X_LABEL));
        x.extend(self.x.iter().map(|&t| Value::from(t)));
        columns.push(Value::Array(x));

        for column in &self.series {
            let mut row: Vec<Value> = Vec::with_capacity(column.values.len() + 1);
            row.push(Value::from(column.name.as_str()));
            row.extend(column.values.iter().map(|&v| Value::from(v)));
            columns.push(Value::Array(row));
        }

        Value::Array(columns)
    }
}

impl Serialize for ChartColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

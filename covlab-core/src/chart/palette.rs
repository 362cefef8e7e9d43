//! Series colors.

use super::ChartError;
use serde::{Deserialize, Serialize};

/// The 20-color categorical palette.
pub const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// One plotted key and the color its line is drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub key: String,
    pub color: String,
}

/// Pair keys with palette colors in iteration order.
///
/// Key `i` gets color `i % palette.len()`: with more keys than colors the
/// palette wraps around instead of dropping keys.
pub fn assign_colors<K, C>(keys: &[K], palette: &[C]) -> Result<Vec<SeriesSpec>, ChartError>
where
    K: AsRef<str>,
    C: AsRef<str>,
{
    if palette.is_empty() {
        return Err(ChartError::EmptyPalette);
    }
    Ok(keys
        .iter()
        .enumerate()
        .map(|(i, key)| SeriesSpec {
            key: key.as_ref().to_string(),
            color: palette[i % palette.len()].as_ref().to_string(),
        })
        .collect())
}

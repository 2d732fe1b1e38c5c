/// Pearson correlation over the cleaned numeric columns.
use crate::clean::{ACTUAL_PRICE, DISCOUNTED_PRICE, DISCOUNT_PERCENTAGE, RATING, RATING_COUNT};
use crate::column::Column;
use crate::table::Table;
use serde::Serialize;

/// Columns included in the matrix when present, in display order.
pub const CORRELATION_COLUMNS: [&str; 5] = [
    ACTUAL_PRICE,
    DISCOUNTED_PRICE,
    DISCOUNT_PERCENTAGE,
    RATING,
    RATING_COUNT,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major coefficients; None where the coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlation of two columns over the rows where both are present.
/// Undefined with fewer than two such rows or zero variance on either side.
pub fn pearson(x: &Column, y: &Column) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = (0..x.len().min(y.len()))
        .filter_map(|i| Some((x.get_f64(i)?, y.get_f64(i)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise correlation matrix over the named columns that exist in `table`.
pub fn correlation_matrix(table: &Table, columns: &[&str]) -> CorrelationMatrix {
    let present: Vec<&Column> = columns.iter().filter_map(|c| table.column(c)).collect();
    let n = present.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        // the diagonal is exactly 1 whenever the column varies at all
        values[i][i] = pearson(present[i], present[i]).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(present[i], present[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: present.iter().map(|c| c.name().to_string()).collect(),
        values,
    }
}

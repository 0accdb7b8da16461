//! Summary statistics over the historical values of one resolution run.

/// Collects non-null values and reports count, mean and population variance.
///
/// Values are kept so both moments come from an exact two-pass computation.
/// Missing values are skipped, never treated as zero.
#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    values: Vec<f64>,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value when present.
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.values.push(v);
        }
    }

    /// Number of values collected so far.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(sorted_sum(self.values.iter().copied()) / self.values.len() as f64)
    }

    /// Variance with divisor `n`: the values are the whole population of
    /// that weekday's past occurrences, not a sample.
    pub fn population_variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let n = self.values.len() as f64;
        Some(sorted_sum(self.values.iter().map(|v| (v - mean) * (v - mean))) / n)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }
}

/// Summed in ascending order so the result does not depend on push order.
fn sorted_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

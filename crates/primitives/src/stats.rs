use crate::{format_avail, format_bytes, AVAIL_SYMBOL};

/// Aggregate submission statistics, either for a single rollup or for a whole network.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    /// The number of distinct data submissions.
    pub total_submissions: u64,
    /// The summed blob size, human readable.
    pub total_size: String,
    /// The summed fees, human readable.
    pub total_cost: String,
    /// The summed blob size in bytes.
    pub total_bytes: u128,
    /// The summed fees in the native token.
    pub total_fees: f64,
}

impl AggregateStats {
    /// Returns the stats shown when the upstream aggregate is unavailable.
    pub fn zero() -> Self {
        Self {
            total_submissions: 0,
            total_size: format_bytes(0),
            total_cost: format!("0 {AVAIL_SYMBOL}"),
            total_bytes: 0,
            total_fees: 0.0,
        }
    }

    /// Returns stats built from raw totals.
    pub fn from_totals(total_submissions: u64, total_bytes: u128, total_fees: f64) -> Self {
        Self {
            total_submissions,
            total_size: format_bytes(total_bytes),
            total_cost: format_avail(total_fees),
            total_bytes,
            total_fees,
        }
    }

    /// Returns the USD value of the total cost, if a positive price is known.
    pub fn usd_cost(&self, price: f64) -> Option<f64> {
        (price > 0.0).then(|| self.total_fees * price)
    }

    /// Sums the provided stats into a single aggregate.
    pub fn sum<'a>(stats: impl IntoIterator<Item = &'a Self>) -> Self {
        let (submissions, bytes, fees) = stats.into_iter().fold((0u64, 0u128, 0f64), |acc, s| {
            (
                acc.0.saturating_add(s.total_submissions),
                acc.1.saturating_add(s.total_bytes),
                acc.2 + s.total_fees,
            )
        });
        Self::from_totals(submissions, bytes, fees)
    }
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stats() {
        let zero = AggregateStats::zero();
        assert_eq!(zero.total_submissions, 0);
        assert_eq!(zero.total_size, "0 B");
        assert_eq!(zero.total_cost, "0 AVAIL");
    }

    #[test]
    fn test_usd_cost_requires_positive_price() {
        let stats = AggregateStats::from_totals(3, 2048, 10.0);
        assert_eq!(stats.usd_cost(0.5), Some(5.0));
        assert_eq!(stats.usd_cost(0.0), None);
    }

    #[test]
    fn test_sum() {
        let a = AggregateStats::from_totals(2, 1024, 1.25);
        let b = AggregateStats::from_totals(3, 512, 2.0);
        let total = AggregateStats::sum([&a, &b]);

        assert_eq!(total.total_submissions, 5);
        assert_eq!(total.total_bytes, 1536);
        assert_eq!(total.total_size, "1.50 KB");
        assert_eq!(total.total_cost, "3.25 AVAIL");
    }
}

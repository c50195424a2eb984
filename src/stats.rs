// src/stats.rs

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::table::RateRecord;

/// Fractional digits kept in price sums and means.
pub const PRICE_SCALE: u32 = 4;

/// Figures reduced from one run's collected quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSummary {
    pub samples: usize,
    pub mean_buying: Decimal,
    pub mean_selling: Decimal,
    /// Population standard deviation around `mean_selling`.
    pub selling_std_dev: f64,
}

/// Sum truncated to [`PRICE_SCALE`] digits, then divided by `count` with the
/// quotient truncated to the same scale. Done on the scaled integer mantissa so
/// no intermediate rounding can push the result across a digit.
pub fn truncated_mean(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0i128), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        return None;
    }
    let mut sum = sum.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::ToZero);
    sum.rescale(PRICE_SCALE);
    // i128 division truncates toward zero.
    Some(Decimal::from_i128_with_scale(
        sum.mantissa() / count,
        PRICE_SCALE,
    ))
}

/// Population standard deviation of `values` around a given `mean`.
pub fn population_std_dev(values: impl IntoIterator<Item = Decimal>, mean: Decimal) -> Option<f64> {
    let mean = mean.to_f64()?;
    let (squares, count) = values.into_iter().fold((0.0f64, 0usize), |(acc, n), v| {
        let d = v.to_f64().unwrap_or(f64::NAN) - mean;
        (acc + d * d, n + 1)
    });
    if count == 0 {
        return None;
    }
    Some((squares / count as f64).sqrt())
}

/// Mean buying and selling price plus the spread of the selling price.
/// `None` for an empty slice.
pub fn summarize(records: &[RateRecord]) -> Option<RateSummary> {
    let mean_buying = truncated_mean(records.iter().map(RateRecord::buying_price))?;
    let mean_selling = truncated_mean(records.iter().map(RateRecord::selling_price))?;
    let selling_std_dev =
        population_std_dev(records.iter().map(RateRecord::selling_price), mean_selling)?;
    Some(RateSummary {
        samples: records.len(),
        mean_buying,
        mean_selling,
        selling_std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn record(buy: Decimal, sell: Decimal) -> RateRecord {
        RateRecord::new("euro", "EUR", 1, buy, sell)
    }

    #[test]
    fn test_mean_truncates_division() {
        let mean = truncated_mean([dec!(3.9112), dec!(3.9050)]).unwrap();
        assert_eq!(mean, dec!(3.9081));
        assert_eq!(mean.to_string(), "3.9081");
    }

    #[test]
    fn test_mean_rounds_down_not_half_up() {
        // 10.0000 / 3 = 3.33333..., 2.0003 / 2 = 1.00015
        assert_eq!(
            truncated_mean([dec!(3), dec!(3), dec!(4)]).unwrap().to_string(),
            "3.3333"
        );
        assert_eq!(
            truncated_mean([dec!(1.0001), dec!(1.0002)]).unwrap(),
            dec!(1.0001)
        );
        // Digits beyond the fourth are cut from the sum first.
        assert_eq!(
            truncated_mean([dec!(1.00009), dec!(1.00009)]).unwrap(),
            dec!(1.0000)
        );
        assert_eq!(
            truncated_mean([dec!(0.99999)]).unwrap().to_string(),
            "0.9999"
        );
    }

    #[test]
    fn test_mean_keeps_four_digit_rendering() {
        assert_eq!(truncated_mean([dec!(4.5)]).unwrap().to_string(), "4.5000");
    }

    #[test]
    fn test_std_dev_around_truncated_mean() {
        let sells = [dec!(4.00), dec!(4.50), dec!(4.20)];
        let mean = truncated_mean(sells).unwrap();
        assert_eq!(mean, dec!(4.2333));
        let sd = population_std_dev(sells, mean).unwrap();
        assert_eq!(format!("{sd:.4}"), "0.2055");
        let expected = ((0.2333f64.powi(2) + 0.2667f64.powi(2) + 0.0333f64.powi(2)) / 3.0).sqrt();
        assert_relative_eq!(sd, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record(dec!(3.9112), dec!(4.00)),
            record(dec!(3.9050), dec!(4.50)),
            record(dec!(3.9000), dec!(4.20)),
        ];
        let s = summarize(&records).unwrap();
        assert_eq!(s.samples, 3);
        assert_eq!(s.mean_buying, dec!(3.9054));
        assert_eq!(s.mean_selling, dec!(4.2333));
        assert_eq!(format!("{:.4}", s.selling_std_dev), "0.2055");
    }

    #[test]
    fn test_single_sample_has_zero_spread() {
        let s = summarize(&[record(dec!(4.1), dec!(4.2))]).unwrap();
        assert_eq!(s.selling_std_dev, 0.0);
    }

    #[test]
    fn test_empty_has_no_summary() {
        assert!(summarize(&[]).is_none());
        assert!(truncated_mean(Vec::new()).is_none());
        assert!(population_std_dev(Vec::new(), Decimal::ZERO).is_none());
    }
}

//! Display formatting for animated statistics.
//!
//! Formatting is a pure projection of a raw counter value; it never feeds
//! back into animation state.

use lumen_types::StatFormat;

/// Project `value` into its display string.
///
/// ```text
/// Millions { decimals: 1 }   10_000_000  -> "10.0M+"
/// Millions { decimals: 0 }  500_000_000  -> "500M+"
/// Count                             50   -> "50+"
/// Percent { decimals: 1 }         99.9   -> "99.9%"
/// ```
pub fn format_stat(format: StatFormat, value: f64) -> String {
    match format {
        StatFormat::Millions { decimals } => {
            format!("{:.*}M+", usize::from(decimals), value / 1_000_000.0)
        }
        StatFormat::Count => format!("{value}+"),
        StatFormat::Percent { decimals } => format!("{:.*}%", usize::from(decimals), value),
        StatFormat::Plain => format!("{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millions_with_one_decimal() {
        let format = StatFormat::Millions { decimals: 1 };
        assert_eq!(format_stat(format, 10_000_000.0), "10.0M+");
        assert_eq!(format_stat(format, 0.0), "0.0M+");
        assert_eq!(format_stat(format, 7_345_000.0), "7.3M+");
    }

    #[test]
    fn millions_without_decimals() {
        let format = StatFormat::Millions { decimals: 0 };
        assert_eq!(format_stat(format, 500_000_000.0), "500M+");
    }

    #[test]
    fn count_drops_trailing_zero_fraction() {
        assert_eq!(format_stat(StatFormat::Count, 50.0), "50+");
        assert_eq!(format_stat(StatFormat::Count, 0.0), "0+");
    }

    #[test]
    fn percent_keeps_fixed_decimals() {
        let format = StatFormat::Percent { decimals: 1 };
        assert_eq!(format_stat(format, 99.9), "99.9%");
        assert_eq!(format_stat(format, 99.0), "99.0%");
    }

    #[test]
    fn plain_is_the_raw_number() {
        assert_eq!(format_stat(StatFormat::Plain, 12.5), "12.5");
    }
}

//! Destination names derived from series metadata.
//!
//! Names are recomputed on every sync; the same metadata always yields the
//! same table.

use crate::domain::{SeriesMetadata, TableSpec};

/// Lower-case the title and replace every character outside `[a-z_]` with `_`.
///
/// The substitution is one character for one character, so the result has as
/// many characters as the lower-cased title.
pub fn derive_table_name(metadata: &SeriesMetadata) -> String {
    metadata
        .title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c == '_' { c } else { '_' })
        .collect()
}

/// The series short code, lower-cased.
pub fn derive_value_column(metadata: &SeriesMetadata) -> String {
    metadata.id.trim().to_lowercase()
}

pub fn derive_table_spec(metadata: &SeriesMetadata) -> TableSpec {
    TableSpec {
        name: derive_table_name(metadata),
        value_column: derive_value_column(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, title: &str) -> SeriesMetadata {
        SeriesMetadata::new(id, title)
    }

    #[test]
    fn punctuation_and_spaces_become_underscores() {
        let name = derive_table_name(&meta("CPIAUCSL", "Consumer Price Index, U.S. City Average"));
        assert_eq!(name, "consumer_price_index__u_s__city_average");
    }

    #[test]
    fn output_is_lowercase_letters_and_underscores_with_preserved_length() {
        let titles = [
            "Real Gross Domestic Product",
            "Federal Debt: Total Public Debt",
            "Real-time Sahm Rule Recession Indicator",
            "S&P/Case-Shiller U.S. National Home Price Index",
            "Wilshire US Real Estate Investment Trust Total Market Index (Wilshire US REIT)",
            "10-Year Treasury Constant Maturity Rate",
            "Total Reserves excluding Gold for United States",
            "Taux de chômage (France)",
            "already_snake_case",
            "",
        ];
        for title in titles {
            let name = derive_table_name(&meta("X", title));
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "unexpected character in {name:?}"
            );
            assert_eq!(name.chars().count(), title.to_lowercase().chars().count(), "length changed for {title:?}");
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let m = meta("GFDEBTN", "Federal Debt: Total Public Debt");
        assert_eq!(derive_table_spec(&m), derive_table_spec(&m));
    }

    #[test]
    fn value_column_is_lowercased_short_code() {
        let spec = derive_table_spec(&meta("A191RL1Q225SBEA", "Real Gross Domestic Product"));
        assert_eq!(spec.value_column, "a191rl1q225sbea");
        assert_eq!(spec.name, "real_gross_domestic_product");
    }
}

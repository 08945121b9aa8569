//! SQL statement builders.

use crate::domain::{DATE_COLUMN, PRIMARY_KEY_COLUMN, TableSpec};

/// PostgreSQL silently truncates identifiers longer than this (NAMEDATALEN - 1).
pub const PG_IDENTIFIER_MAX: usize = 63;

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(table: &TableSpec) -> String {
    format!(
        "CREATE TABLE {} ({PRIMARY_KEY_COLUMN} SERIAL PRIMARY KEY, {DATE_COLUMN} DATE, {} NUMERIC)",
        quote_ident(&table.name),
        quote_ident(&table.value_column),
    )
}

/// Rows per multi-row insert. Two parameters per row stays well under the
/// protocol's 65535 bind parameter limit.
pub const INSERT_CHUNK_ROWS: usize = 1000;

/// Parameterized single-row insert.
pub fn insert_sql(table: &TableSpec) -> String {
    insert_values_sql(table, 1)
}

/// Parameterized insert of `rows` rows, bound as `($1, $2), ($3, $4), ...`.
///
/// Values are bound as `float8` and assignment-cast to the NUMERIC column.
pub fn insert_values_sql(table: &TableSpec, rows: usize) -> String {
    let values: Vec<String> = (0..rows)
        .map(|i| format!("(${}, ${}::DOUBLE PRECISION)", 2 * i + 1, 2 * i + 2))
        .collect();
    format!(
        "INSERT INTO {} ({DATE_COLUMN}, {}) VALUES {}",
        quote_ident(&table.name),
        quote_ident(&table.value_column),
        values.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TableSpec {
        TableSpec {
            name: "real_gross_domestic_product".to_string(),
            value_column: "a191rl1q225sbea".to_string(),
        }
    }

    #[test]
    fn create_table_has_key_date_and_value_columns() {
        assert_eq!(
            create_table_sql(&spec()),
            "CREATE TABLE \"real_gross_domestic_product\" (timepoint_id SERIAL PRIMARY KEY, \
             date_of_obs DATE, \"a191rl1q225sbea\" NUMERIC)"
        );
    }

    #[test]
    fn insert_targets_date_and_value_columns() {
        assert_eq!(
            insert_sql(&spec()),
            "INSERT INTO \"real_gross_domestic_product\" (date_of_obs, \"a191rl1q225sbea\") \
             VALUES ($1, $2::DOUBLE PRECISION)"
        );
    }

    #[test]
    fn multi_row_insert_numbers_parameters_in_pairs() {
        let sql = insert_values_sql(&spec(), 3);
        assert!(sql.ends_with(
            "VALUES ($1, $2::DOUBLE PRECISION), ($3, $4::DOUBLE PRECISION), ($5, $6::DOUBLE PRECISION)"
        ));
        assert_eq!(
            insert_values_sql(&spec(), INSERT_CHUNK_ROWS).matches("::DOUBLE PRECISION").count(),
            INSERT_CHUNK_ROWS
        );
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}

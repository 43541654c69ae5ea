//! Shorthands for the column types migrations use most often.
//!
//! ```
//! use strata_core::{types, TableSpec};
//!
//! let sql = TableSpec::new("persons")
//!     .column("id", types::primary())
//!     .column("name", types::string(255).not_null())
//!     .column("active", types::boolean())
//!     .render()
//!     .unwrap();
//! assert!(sql.contains("`active` TINYINT(1) NULL DEFAULT 0"));
//! ```
use super::{escape_string, ColumnSpec};

fn with_length(column: ColumnSpec, length: Option<u32>) -> ColumnSpec {
    match length {
        Some(length) => column.length(length),
        None => column,
    }
}

fn with_precision(column: ColumnSpec, precision: Option<u32>, scale: Option<u32>) -> ColumnSpec {
    let column = match precision {
        Some(precision) => column.precision(precision),
        None => column,
    };
    match scale {
        Some(scale) => column.scale(scale),
        None => column,
    }
}

/// `INT NOT NULL PRIMARY KEY AUTO_INCREMENT`
pub fn primary() -> ColumnSpec {
    ColumnSpec::new("INT").not_null().primary_key()
}

/// `VARCHAR(length)`
pub fn string(length: u32) -> ColumnSpec {
    ColumnSpec::new("VARCHAR").length(length)
}

pub fn integer(length: Option<u32>) -> ColumnSpec {
    with_length(ColumnSpec::new("INT"), length)
}

pub fn big_integer(length: Option<u32>) -> ColumnSpec {
    with_length(ColumnSpec::new("BIGINT"), length)
}

/// `TINYINT(1)` defaulting to `0`
pub fn boolean() -> ColumnSpec {
    ColumnSpec::new("TINYINT").length(1).default_value(0)
}

pub fn decimal(precision: Option<u32>, scale: Option<u32>) -> ColumnSpec {
    with_precision(ColumnSpec::new("DECIMAL"), precision, scale)
}

pub fn float(precision: Option<u32>, scale: Option<u32>) -> ColumnSpec {
    with_precision(ColumnSpec::new("FLOAT"), precision, scale)
}

pub fn datetime() -> ColumnSpec {
    ColumnSpec::new("DATETIME")
}

pub fn date() -> ColumnSpec {
    ColumnSpec::new("DATE")
}

pub fn text() -> ColumnSpec {
    ColumnSpec::new("TEXT")
}

pub fn json() -> ColumnSpec {
    ColumnSpec::new("JSON")
}

/// `ENUM('a', 'b', ...)` with every value quoted and escaped
pub fn enumeration<T: AsRef<str>>(values: &[T]) -> ColumnSpec {
    let values = values
        .iter()
        .map(|value| format!("'{}'", escape_string(value.as_ref())))
        .collect::<Vec<String>>()
        .join(", ");
    ColumnSpec::new(format!("ENUM({})", values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_is_not_null() {
        assert_eq!(
            "INT NOT NULL PRIMARY KEY AUTO_INCREMENT",
            primary().render()
        );
    }

    #[test]
    fn integer_without_length_has_no_size_group() {
        assert_eq!("INT NULL", integer(None).render());
        assert_eq!("BIGINT(20) NULL", big_integer(Some(20)).render());
    }

    #[test]
    fn boolean_defaults_to_zero() {
        assert_eq!("TINYINT(1) NULL DEFAULT 0", boolean().render());
    }

    #[test]
    fn decimal_renders_precision_and_scale() {
        assert_eq!(
            "DECIMAL(10, 2) NOT NULL",
            decimal(Some(10), Some(2)).not_null().render()
        );
        assert_eq!("DECIMAL NULL", decimal(None, None).render());
        assert_eq!("FLOAT(7, ) NULL", float(Some(7), None).render());
    }

    #[test]
    fn enumeration_quotes_values() {
        assert_eq!(
            "ENUM('draft', 'it\\'s live') NOT NULL DEFAULT 'draft'",
            enumeration(&["draft", "it's live"])
                .not_null()
                .default_value("draft")
                .render()
        );
    }
}

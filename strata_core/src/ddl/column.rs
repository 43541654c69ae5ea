use std::fmt;

use crate::Error;

/// The `DEFAULT` a column is declared with.
///
/// `Absent` and `Null` are different things: the first emits no `DEFAULT` clause at all,
/// the second emits `DEFAULT NULL`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DefaultValue {
    #[default]
    Absent,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl DefaultValue {
    /// Returns the SQL literal for this default, `None` when no default is set.
    pub fn literal(&self) -> Option<String> {
        match self {
            DefaultValue::Absent => None,
            DefaultValue::Null => Some("NULL".into()),
            DefaultValue::Bool(value) => Some(if *value { "1" } else { "0" }.into()),
            DefaultValue::Int(value) => Some(value.to_string()),
            DefaultValue::Float(value) => Some(value.to_string()),
            DefaultValue::Text(value) => Some(format!("'{}'", escape_string(value))),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        DefaultValue::Int(value.into())
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Int(value)
    }
}

impl From<u32> for DefaultValue {
    fn from(value: u32) -> Self {
        DefaultValue::Int(value.into())
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.into())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

impl<T: Into<DefaultValue>> From<Option<T>> for DefaultValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DefaultValue::Null, Into::into)
    }
}

/// Backslash-escapes quotes, backslashes and NUL bytes so the value can sit between single quotes.
pub(crate) fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Description of a single column, built with chained setters and rendered with
/// [`ColumnSpec::render`].
///
/// ```
/// use strata_core::ColumnSpec;
///
/// let column = ColumnSpec::new("VARCHAR").length(50).not_null().unique();
/// assert_eq!("VARCHAR(50) NOT NULL UNIQUE", column.render());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    sql_type: String,
    nullable: bool,
    unique: bool,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
    primary_key: bool,
    auto_increment: bool,
    default: DefaultValue,
}

impl ColumnSpec {
    /// Creates a nullable column of the given type, e.g. `INT`, `VARCHAR` or `ENUM('a', 'b')`.
    pub fn new(sql_type: impl Into<String>) -> ColumnSpec {
        ColumnSpec {
            sql_type: sql_type.into(),
            nullable: true,
            unique: false,
            length: None,
            precision: None,
            scale: None,
            primary_key: false,
            auto_increment: false,
            default: DefaultValue::Absent,
        }
    }

    pub fn not_null(self) -> ColumnSpec {
        ColumnSpec {
            nullable: false,
            ..self
        }
    }

    pub fn nullable(self, nullable: bool) -> ColumnSpec {
        ColumnSpec { nullable, ..self }
    }

    pub fn unique(self) -> ColumnSpec {
        ColumnSpec {
            unique: true,
            ..self
        }
    }

    pub fn length(self, length: u32) -> ColumnSpec {
        ColumnSpec {
            length: Some(length),
            ..self
        }
    }

    pub fn precision(self, precision: u32) -> ColumnSpec {
        ColumnSpec {
            precision: Some(precision),
            ..self
        }
    }

    pub fn scale(self, scale: u32) -> ColumnSpec {
        ColumnSpec {
            scale: Some(scale),
            ..self
        }
    }

    /// Marks the column as primary key, which also turns on `AUTO_INCREMENT`.
    /// Nullability is left untouched.
    pub fn primary_key(self) -> ColumnSpec {
        ColumnSpec {
            primary_key: true,
            auto_increment: true,
            ..self
        }
    }

    pub fn auto_increment(self) -> ColumnSpec {
        ColumnSpec {
            auto_increment: true,
            ..self
        }
    }

    /// Sets the column default. `None` and [`DefaultValue::Null`] both render `DEFAULT NULL`.
    pub fn default_value(self, default: impl Into<DefaultValue>) -> ColumnSpec {
        ColumnSpec {
            default: default.into(),
            ..self
        }
    }

    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn get_length(&self) -> Option<u32> {
        self.length
    }

    pub fn get_precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn get_scale(&self) -> Option<u32> {
        self.scale
    }

    pub fn get_default(&self) -> &DefaultValue {
        &self.default
    }

    // NaN and infinities have no SQL literal
    pub(crate) fn check(&self, column: &str) -> Result<(), Error> {
        match self.default {
            DefaultValue::Float(value) if !value.is_finite() => Err(Error::invalid_spec(format!(
                "default of column {} must be a finite number, got {}",
                column, value
            ))),
            _ => Ok(()),
        }
    }

    /// Renders the column definition, without the column name.
    pub fn render(&self) -> String {
        let mut sql = self.sql_type.clone();

        if let Some(length) = self.length {
            sql.push_str(&format!("({})", length));
        }

        // the precision group renders independently of length, an unset member stays empty
        if self.precision.is_some() || self.scale.is_some() {
            sql.push_str(&format!(
                "({}, {})",
                self.precision.map(|p| p.to_string()).unwrap_or_default(),
                self.scale.map(|s| s.to_string()).unwrap_or_default()
            ));
        }

        sql.push_str(if self.nullable { " NULL" } else { " NOT NULL" });

        if self.unique {
            sql.push_str(" UNIQUE");
        }

        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if self.auto_increment {
            sql.push_str(" AUTO_INCREMENT");
        }

        if let Some(literal) = self.default.literal() {
            sql.push_str(" DEFAULT ");
            sql.push_str(&literal);
        }

        sql
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnSpec, DefaultValue};
    use crate::error::Kind;

    #[test]
    fn rejects_non_finite_float_default() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = ColumnSpec::new("FLOAT")
                .default_value(value)
                .check("ratio")
                .unwrap_err();
            assert!(matches!(err.kind(), Kind::InvalidSpec(_)));
        }
        assert!(ColumnSpec::new("FLOAT")
            .default_value(0.5)
            .check("ratio")
            .is_ok());
    }

    #[test]
    fn renders_nullable_by_default() {
        assert_eq!("INT NULL", ColumnSpec::new("INT").render());
    }

    #[test]
    fn renders_length_not_null_and_unique() {
        let column = ColumnSpec::new("VARCHAR").length(50).not_null().unique();
        assert_eq!("VARCHAR(50) NOT NULL UNIQUE", column.render());
    }

    #[test]
    fn primary_key_forces_auto_increment_but_not_not_null() {
        let column = ColumnSpec::new("INT").primary_key();
        assert!(column.is_auto_increment());
        assert!(column.is_nullable());
        assert_eq!("INT NULL PRIMARY KEY AUTO_INCREMENT", column.render());
    }

    #[test]
    fn renders_precision_group_with_missing_scale() {
        let column = ColumnSpec::new("DECIMAL").precision(10);
        assert_eq!("DECIMAL(10, ) NULL", column.render());

        let column = ColumnSpec::new("DECIMAL").scale(2);
        assert_eq!("DECIMAL(, 2) NULL", column.render());
    }

    #[test]
    fn renders_length_and_precision_groups_together() {
        let column = ColumnSpec::new("FLOAT").length(8).precision(6).scale(2);
        assert_eq!("FLOAT(8)(6, 2) NULL", column.render());
    }

    #[test]
    fn escapes_string_default() {
        let column = ColumnSpec::new("VARCHAR").default_value("O'Brien");
        assert_eq!("VARCHAR NULL DEFAULT 'O\\'Brien'", column.render());

        let column = ColumnSpec::new("VARCHAR").default_value(r#"C:\temp "x""#);
        assert_eq!(
            r#"VARCHAR NULL DEFAULT 'C:\\temp \"x\"'"#,
            column.render()
        );
    }

    #[test]
    fn renders_bool_defaults_as_digits() {
        let column = ColumnSpec::new("TINYINT").default_value(false);
        assert!(column.render().ends_with(" DEFAULT 0"));

        let column = ColumnSpec::new("TINYINT").default_value(true);
        assert!(column.render().ends_with(" DEFAULT 1"));
    }

    #[test]
    fn distinguishes_null_default_from_absent_default() {
        let column = ColumnSpec::new("DATETIME").default_value(DefaultValue::Null);
        assert_eq!("DATETIME NULL DEFAULT NULL", column.render());

        let column = ColumnSpec::new("DATETIME").default_value(None::<i64>);
        assert_eq!("DATETIME NULL DEFAULT NULL", column.render());

        let column = ColumnSpec::new("DATETIME");
        assert!(!column.render().contains("DEFAULT"));
    }

    #[test]
    fn renders_numeric_defaults_bare() {
        assert_eq!(
            "INT NOT NULL DEFAULT 42",
            ColumnSpec::new("INT").not_null().default_value(42).render()
        );
        assert_eq!(
            "FLOAT NULL DEFAULT 0.5",
            ColumnSpec::new("FLOAT").default_value(0.5).render()
        );
    }

    #[test]
    fn renders_clauses_in_fixed_order() {
        let column = ColumnSpec::new("BIGINT")
            .default_value(7)
            .auto_increment()
            .unique()
            .not_null()
            .length(20);
        assert_eq!(
            "BIGINT(20) NOT NULL UNIQUE AUTO_INCREMENT DEFAULT 7",
            column.render()
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let column = ColumnSpec::new("VARCHAR")
            .length(255)
            .unique()
            .default_value("x");
        assert_eq!(column.render(), column.clone().render());
        assert_eq!(column.render(), column.to_string());
    }
}

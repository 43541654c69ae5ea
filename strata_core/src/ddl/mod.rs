//! Builders that render schema changes into MySQL flavoured statement text.
//!
//! Nothing here validates reserved words, type compatibility or that referenced
//! tables exist; statements are rendered as described and the database is left
//! to reject them.

mod column;
mod table;
pub mod types;

pub use column::{ColumnSpec, DefaultValue};
pub use table::{TableSpec, DEFAULT_TABLE_OPTIONS};

pub(crate) use column::escape_string;

use crate::Error;

/// Backtick-delimits an identifier, doubling any embedded backtick.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// A column list argument: a single name or an ordered sequence of names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Columns(Vec<String>);

impl Columns {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Renders every name delimited and joined by `, `.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|name| quote_ident(name))
            .collect::<Vec<String>>()
            .join(", ")
    }
}

impl From<&str> for Columns {
    fn from(name: &str) -> Self {
        Columns(vec![name.to_string()])
    }
}

impl From<String> for Columns {
    fn from(name: String) -> Self {
        Columns(vec![name])
    }
}

impl<T: Into<String>> From<Vec<T>> for Columns {
    fn from(names: Vec<T>) -> Self {
        Columns(names.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for Columns {
    fn from(names: [T; N]) -> Self {
        Columns(names.into_iter().map(Into::into).collect())
    }
}

impl<T: AsRef<str>> From<&[T]> for Columns {
    fn from(names: &[T]) -> Self {
        Columns(names.iter().map(|n| n.as_ref().to_string()).collect())
    }
}

/// A `FOREIGN KEY` constraint added through `ALTER TABLE`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForeignKey {
    name: String,
    table: String,
    columns: Columns,
    ref_table: String,
    ref_columns: Columns,
    on_delete: Option<String>,
    on_update: Option<String>,
}

impl ForeignKey {
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: impl Into<Columns>,
        ref_table: impl Into<String>,
        ref_columns: impl Into<Columns>,
    ) -> ForeignKey {
        ForeignKey {
            name: name.into(),
            table: table.into(),
            columns: columns.into(),
            ref_table: ref_table.into(),
            ref_columns: ref_columns.into(),
            on_delete: None,
            on_update: None,
        }
    }

    /// `ON DELETE` action, e.g. `CASCADE` or `SET NULL`
    pub fn on_delete(self, action: impl Into<String>) -> ForeignKey {
        ForeignKey {
            on_delete: Some(action.into()),
            ..self
        }
    }

    /// `ON UPDATE` action
    pub fn on_update(self, action: impl Into<String>) -> ForeignKey {
        ForeignKey {
            on_update: Some(action.into()),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn render(&self) -> Result<String, Error> {
        if self.name.is_empty() {
            return Err(Error::invalid_spec("foreign key name must not be empty"));
        }
        check_table(&self.table)?;
        check_table(&self.ref_table)?;
        if self.columns.is_empty() || self.ref_columns.is_empty() {
            return Err(Error::invalid_spec(format!(
                "foreign key {} must name at least one column on each side",
                self.name
            )));
        }

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_ident(&self.table),
            quote_ident(&self.name),
            self.columns.render(),
            quote_ident(&self.ref_table),
            self.ref_columns.render()
        );

        if let Some(action) = self.on_delete.as_deref().filter(|a| !a.is_empty()) {
            sql.push_str(" ON DELETE ");
            sql.push_str(action);
        }

        if let Some(action) = self.on_update.as_deref().filter(|a| !a.is_empty()) {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action);
        }

        Ok(sql)
    }
}

fn check_table(table: &str) -> Result<(), Error> {
    if table.is_empty() {
        Err(Error::invalid_spec("table name must not be empty"))
    } else {
        Ok(())
    }
}

pub fn drop_table(table: &str) -> Result<String, Error> {
    check_table(table)?;
    Ok(format!("DROP TABLE {}", quote_ident(table)))
}

pub fn add_column(table: &str, column: &str, spec: &ColumnSpec) -> Result<String, Error> {
    check_table(table)?;
    if column.is_empty() {
        return Err(Error::invalid_spec("column name must not be empty"));
    }
    spec.check(column)?;
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        quote_ident(table),
        quote_ident(column),
        spec.render()
    ))
}

pub fn drop_column(table: &str, column: &str) -> Result<String, Error> {
    check_table(table)?;
    if column.is_empty() {
        return Err(Error::invalid_spec("column name must not be empty"));
    }
    Ok(format!(
        "ALTER TABLE {} DROP COLUMN {}",
        quote_ident(table),
        quote_ident(column)
    ))
}

pub fn drop_foreign_key(name: &str, table: &str) -> Result<String, Error> {
    check_table(table)?;
    if name.is_empty() {
        return Err(Error::invalid_spec("foreign key name must not be empty"));
    }
    Ok(format!(
        "ALTER TABLE {} DROP FOREIGN KEY {}",
        quote_ident(table),
        quote_ident(name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn renders_drop_table() {
        assert_eq!("DROP TABLE `cars`", drop_table("cars").unwrap());
    }

    #[test]
    fn renders_add_and_drop_column() {
        let spec = types::string(255).default_value("unknown");
        assert_eq!(
            "ALTER TABLE `cars` ADD COLUMN `brand` VARCHAR(255) NULL DEFAULT 'unknown'",
            add_column("cars", "brand", &spec).unwrap()
        );
        assert_eq!(
            "ALTER TABLE `cars` DROP COLUMN `brand`",
            drop_column("cars", "brand").unwrap()
        );
    }

    #[test]
    fn renders_foreign_key_with_single_column() {
        let fk = ForeignKey::new("fk_cars_owner", "cars", "owner_id", "persons", "id")
            .on_delete("CASCADE");
        assert_eq!(
            "ALTER TABLE `cars` ADD CONSTRAINT `fk_cars_owner` FOREIGN KEY (`owner_id`) \
             REFERENCES `persons` (`id`) ON DELETE CASCADE",
            fk.render().unwrap()
        );
    }

    #[test]
    fn renders_foreign_key_with_column_lists() {
        let fk = ForeignKey::new(
            "fk_line_order",
            "order_lines",
            vec!["order_id", "shop_id"],
            "orders",
            ["id", "shop_id"],
        )
        .on_delete("SET NULL")
        .on_update("CASCADE");
        assert_eq!(
            "ALTER TABLE `order_lines` ADD CONSTRAINT `fk_line_order` \
             FOREIGN KEY (`order_id`, `shop_id`) REFERENCES `orders` (`id`, `shop_id`) \
             ON DELETE SET NULL ON UPDATE CASCADE",
            fk.render().unwrap()
        );
    }

    #[test]
    fn foreign_key_without_columns_is_invalid() {
        let fk = ForeignKey::new("fk", "a", Vec::<String>::new(), "b", "id");
        let err = fk.render().unwrap_err();
        assert!(matches!(err.kind(), Kind::InvalidSpec(_)));
    }

    #[test]
    fn renders_drop_foreign_key() {
        assert_eq!(
            "ALTER TABLE `cars` DROP FOREIGN KEY `fk_cars_owner`",
            drop_foreign_key("fk_cars_owner", "cars").unwrap()
        );
    }

    #[test]
    fn add_column_rejects_nan_default() {
        let spec = types::float(None, None).default_value(f64::NAN);
        let err = add_column("measurements", "ratio", &spec).unwrap_err();
        assert!(matches!(err.kind(), Kind::InvalidSpec(_)));
    }

    #[test]
    fn column_lists_keep_their_order() {
        let columns = Columns::from(vec!["shop_id", "order_id"]);
        assert_eq!(["shop_id", "order_id"], columns.names());
        assert_eq!("`shop_id`, `order_id`", columns.render());
        assert_eq!(vec!["user_id".to_string()], Columns::from("user_id").into_vec());
    }

    #[test]
    fn doubles_backticks_in_identifiers() {
        assert_eq!("`we``ird`", quote_ident("we`ird"));
    }
}

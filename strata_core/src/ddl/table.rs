use super::{quote_ident, Columns, ColumnSpec};
use crate::Error;

/// Table options used by [`Schema::create_table`](crate::Schema::create_table)
pub const DEFAULT_TABLE_OPTIONS: &str = "CHARACTER SET utf8 COLLATE utf8_unicode_ci ENGINE=InnoDB";

/// An ordered set of named columns that renders into a `CREATE TABLE` statement.
///
/// Columns render in insertion order, duplicates included.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    name: String,
    columns: Vec<(String, ColumnSpec)>,
    primary_key: Option<Vec<String>>,
    options: String,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> TableSpec {
        TableSpec {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            options: String::new(),
        }
    }

    /// Appends a column, keeping insertion order.
    pub fn column(mut self, name: impl Into<String>, spec: ColumnSpec) -> TableSpec {
        self.columns.push((name.into(), spec));
        self
    }

    /// Declares a table level (possibly composite) primary key.
    pub fn primary_key(self, columns: impl Into<Columns>) -> TableSpec {
        TableSpec {
            primary_key: Some(columns.into().into_vec()),
            ..self
        }
    }

    /// Trailing table options such as charset, collation or engine, copied verbatim.
    pub fn options(self, options: impl Into<String>) -> TableSpec {
        TableSpec {
            options: options.into(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[(String, ColumnSpec)] {
        &self.columns
    }

    pub fn get_options(&self) -> &str {
        &self.options
    }

    /// Renders the `CREATE TABLE` statement.
    ///
    /// Fails with [`Kind::InvalidSpec`](crate::error::Kind::InvalidSpec) when the table has no
    /// name, no columns, or an empty composite primary key.
    pub fn render(&self) -> Result<String, Error> {
        if self.name.is_empty() {
            return Err(Error::invalid_spec("table name must not be empty"));
        }
        if self.columns.is_empty() {
            return Err(Error::invalid_spec(format!(
                "table {} must have at least one column",
                self.name
            )));
        }

        let mut lines = Vec::with_capacity(self.columns.len() + 1);
        for (name, spec) in &self.columns {
            spec.check(name)?;
            lines.push(format!("    {} {}", quote_ident(name), spec.render()));
        }

        if let Some(primary_key) = &self.primary_key {
            if primary_key.is_empty() {
                return Err(Error::invalid_spec(format!(
                    "primary key of table {} must name at least one column",
                    self.name
                )));
            }
            lines.push(format!(
                "    PRIMARY KEY ({})",
                Columns::from(primary_key.clone()).render()
            ));
        }

        Ok(format!(
            "CREATE TABLE {}(\n{}\n) {};\n",
            quote_ident(&self.name),
            lines.join(",\n"),
            self.options
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::TableSpec;
    use crate::error::Kind;
    use crate::types;
    use crate::ColumnSpec;

    #[test]
    fn renders_columns_in_insertion_order() {
        let table = TableSpec::new("persons")
            .column("id", types::primary())
            .column("name", types::string(255).not_null())
            .column("city", types::string(100))
            .options("ENGINE=InnoDB");

        assert_eq!(
            "CREATE TABLE `persons`(\n    \
             `id` INT NOT NULL PRIMARY KEY AUTO_INCREMENT,\n    \
             `name` VARCHAR(255) NOT NULL,\n    \
             `city` VARCHAR(100) NULL\n\
             ) ENGINE=InnoDB;\n",
            table.render().unwrap()
        );
    }

    #[test]
    fn infinite_default_is_invalid() {
        let table = TableSpec::new("measurements")
            .column("id", types::primary())
            .column("ratio", ColumnSpec::new("DOUBLE").default_value(f64::INFINITY));
        let err = table.render().unwrap_err();
        assert!(matches!(err.kind(), Kind::InvalidSpec(_)));
    }

    #[test]
    fn keeps_duplicate_columns() {
        let table = TableSpec::new("t")
            .column("a", ColumnSpec::new("INT"))
            .column("a", ColumnSpec::new("INT"));
        assert_eq!(
            "CREATE TABLE `t`(\n    `a` INT NULL,\n    `a` INT NULL\n) ;\n",
            table.render().unwrap()
        );
    }

    #[test]
    fn renders_composite_primary_key() {
        let table = TableSpec::new("memberships")
            .column("user_id", types::integer(None).not_null())
            .column("group_id", types::integer(None).not_null())
            .primary_key(["user_id", "group_id"]);
        assert!(table
            .render()
            .unwrap()
            .contains("    PRIMARY KEY (`user_id`, `group_id`)\n) ;"));
    }

    #[test]
    fn fails_on_empty_composite_primary_key() {
        let table = TableSpec::new("t")
            .column("a", ColumnSpec::new("INT"))
            .primary_key(Vec::<String>::new());
        let err = table.render().unwrap_err();
        assert!(matches!(err.kind(), Kind::InvalidSpec(_)));
    }

    #[test]
    fn fails_on_table_without_columns() {
        let err = TableSpec::new("t").render().unwrap_err();
        match err.kind() {
            Kind::InvalidSpec(msg) => assert!(msg.contains("at least one column")),
            _ => panic!("test failed"),
        }
    }
}

use strata::{types, Error, Schema};

pub fn up(schema: &mut Schema) -> Result<(), Error> {
    schema.create_table_with_options(
        "persons",
        [
            ("id", types::integer(None)),
            ("name", types::string(255)),
            ("city", types::string(255)),
        ],
        "",
    )
}

pub fn down(schema: &mut Schema) -> Result<(), Error> {
    schema.drop_table("persons")
}

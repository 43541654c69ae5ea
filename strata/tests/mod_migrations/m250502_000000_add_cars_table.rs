use strata::{types, Error, Schema};

pub fn up(schema: &mut Schema) -> Result<(), Error> {
    schema.create_table_with_options(
        "cars",
        [("id", types::integer(None)), ("name", types::string(255))],
        "",
    )?;
    schema.insert("cars", &[("id", 1.into()), ("name", "Beetle".into())])?;
    Ok(())
}

pub fn down(schema: &mut Schema) -> Result<(), Error> {
    schema.drop_table("cars")
}

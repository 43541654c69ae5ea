use strata::{types, Error, Schema};

pub fn up(schema: &mut Schema) -> Result<(), Error> {
    schema.add_column("cars", "brand", types::string(255))
}

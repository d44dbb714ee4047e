use crate::{
    driver::{Connection, Dialect},
    Error, Result,
};

use storm_core::mapping::ClassMapping;

/// Checks that the mapped table and each mapped column exist and that every
/// column type suits its property.
pub(super) fn table(mapping: &ClassMapping, connection: &mut dyn Connection) -> Result<()> {
    let Some(table_name) = mapping.table_name() else {
        return Ok(());
    };

    let Some(info) = connection.describe_table(table_name)? else {
        return Err(Error::configuration(format!(
            "the table named [{table_name}] does not exist; mapped by type [{}]",
            mapping.bound_type
        )));
    };

    let dialect = connection.dialect();

    for (_, column) in mapping.columns() {
        let Some(stored) = info.column(&column.column_name) else {
            return Err(Error::configuration(format!(
                "the table [{table_name}] does not contain a column named [{}]; mapped by type [{}]",
                column.column_name, mapping.bound_type
            )));
        };

        match dialect.accepts(&stored.data_type, column.ty) {
            Some(true) => {}
            Some(false) => {
                return Err(Error::configuration(format!(
                    "the column [{}] in table [{table_name}] is of type [{}] but is mapped to a property with type [{}]",
                    column.column_name, stored.data_type, column.ty
                )));
            }
            None => {
                return Err(unknown_type(
                    dialect,
                    &stored.data_type,
                    format!("column [{}] in table [{table_name}]", column.column_name),
                ));
            }
        }
    }

    Ok(())
}

/// Checks that the mapped procedure exists and that each mapped parameter
/// exists with the same direction and a suitable type.
pub(super) fn procedure(mapping: &ClassMapping, connection: &mut dyn Connection) -> Result<()> {
    let Some(procedure_name) = mapping.procedure_name() else {
        return Ok(());
    };

    let Some(info) = connection.describe_procedure(procedure_name)? else {
        return Err(Error::configuration(format!(
            "the procedure named [{procedure_name}] does not exist; mapped by type [{}]",
            mapping.bound_type
        )));
    };

    let dialect = connection.dialect();

    for (_, parameter) in mapping.parameters() {
        let Some(stored) = info.parameter(&parameter.parameter_name) else {
            return Err(Error::configuration(format!(
                "the procedure [{procedure_name}] does not have a parameter named [{}]; mapped by type [{}]",
                parameter.parameter_name, mapping.bound_type
            )));
        };

        if stored.direction != parameter.direction {
            return Err(Error::configuration(format!(
                "the parameter [{}] of procedure [{procedure_name}] has direction [{:?}] but is mapped with direction [{:?}]",
                parameter.parameter_name, stored.direction, parameter.direction
            )));
        }

        match dialect.accepts(&stored.data_type, parameter.ty) {
            Some(true) => {}
            Some(false) => {
                return Err(Error::configuration(format!(
                    "the parameter [{}] of procedure [{procedure_name}] is of type [{}] but is mapped to a property with type [{}]",
                    parameter.parameter_name, stored.data_type, parameter.ty
                )));
            }
            None => {
                return Err(unknown_type(
                    dialect,
                    &stored.data_type,
                    format!("parameter [{}] of procedure [{procedure_name}]", parameter.parameter_name),
                ));
            }
        }
    }

    Ok(())
}

fn unknown_type(dialect: &Dialect, data_type: &str, location: String) -> Error {
    Error::configuration(format!(
        "the {location} has type [{data_type}], which the {} dialect cannot map to a property type",
        dialect.name
    ))
}

use super::{Formatter, ToSql};

use storm_core::{
    driver::{Direction, Parameter, Placeholder},
    stmt::{Type, Value},
};

/// A bound parameter. Writes its placeholder and records the parameter on
/// the command being built.
pub(super) struct Bind<'a> {
    pub(super) name: &'a str,
    pub(super) ty: Type,
    pub(super) value: Value,
}

/// `column = <placeholder>`
pub(super) struct Assign<'a>(pub(super) Bind<'a>);

impl ToSql for Bind<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let dialect = f.serializer.dialect;
        let placeholder = match dialect.placeholder {
            Placeholder::Colon => format!(":{}", param_name(self.name)),
            Placeholder::At => format!("@{}", param_name(self.name)),
            Placeholder::Numbered => format!("${}", f.params.len() + 1),
            Placeholder::Positional => "?".to_string(),
        };

        f.dst.push_str(&placeholder);
        f.params.push(Parameter {
            name: self.name.to_string(),
            placeholder,
            direction: Direction::In,
            ty: self.ty,
            size: dialect.parameter_size(self.ty),
            value: self.value,
        });
    }
}

impl ToSql for Assign<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, super::Ident(self.0.name), " = ", self.0);
    }
}

/// Placeholder-safe form of a column name.
fn param_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

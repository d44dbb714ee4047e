use super::{Formatter, ToSql};

use storm_core::driver::Placeholder;

/// A table or column name. Plain identifiers are written as-is so the
/// database applies its usual case rules; anything else is quoted.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = self.0.as_ref();

        if is_plain(name) {
            f.dst.push_str(name);
            return;
        }

        let quote = match f.serializer.dialect.placeholder {
            // MySQL is the only supported dialect using `?` placeholders.
            Placeholder::Positional => '`',
            _ => '"',
        };

        f.dst.push(quote);
        for c in name.chars() {
            if c == quote {
                f.dst.push(quote);
            }
            f.dst.push(c);
        }
        f.dst.push(quote);
    }
}

fn is_plain(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

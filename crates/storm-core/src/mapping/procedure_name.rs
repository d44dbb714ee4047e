use crate::{Error, Result};

/// A stored-procedure name of the form `[schema.][package.]name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcedureName {
    pub schema: Option<String>,
    pub package: Option<String>,
    pub name: String,
}

impl ProcedureName {
    pub fn parse(src: &str) -> Result<ProcedureName> {
        let parts: Vec<&str> = src.trim().split('.').map(str::trim).collect();

        if parts.iter().any(|part| part.is_empty()) {
            return Err(Error::configuration(format!(
                "invalid procedure name [{src}]"
            )));
        }

        match parts[..] {
            [name] => Ok(ProcedureName {
                schema: None,
                package: None,
                name: name.to_string(),
            }),
            [package, name] => Ok(ProcedureName {
                schema: None,
                package: Some(package.to_string()),
                name: name.to_string(),
            }),
            [schema, package, name] => Ok(ProcedureName {
                schema: Some(schema.to_string()),
                package: Some(package.to_string()),
                name: name.to_string(),
            }),
            _ => Err(Error::configuration(format!(
                "invalid procedure name [{src}]; expected [schema.][package.]name"
            ))),
        }
    }
}

impl core::fmt::Display for ProcedureName {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        if let Some(package) = &self.package {
            write!(f, "{package}.")?;
        }
        f.write_str(&self.name)
    }
}

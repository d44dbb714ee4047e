use crate::{stmt::Type, stmt::Value, Error, Result};

/// A prepared database command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,

    /// SQL text, or the procedure name for [`CommandKind::Procedure`].
    pub text: String,

    /// Parameters in placeholder order.
    pub params: Vec<Parameter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Text,
    Procedure,
}

/// Direction of a command or stored-procedure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Column or procedure parameter name.
    pub name: String,

    /// The marker referencing the parameter in the SQL text, such as `:NAME`,
    /// `$1` or `?`.
    pub placeholder: String,

    pub direction: Direction,
    pub ty: Type,

    /// Declared size, taken from the dialect's size table.
    pub size: usize,

    pub value: Value,
}

impl Command {
    pub fn text(text: impl Into<String>) -> Command {
        Command {
            kind: CommandKind::Text,
            text: text.into(),
            params: vec![],
        }
    }

    pub fn procedure(name: impl Into<String>) -> Command {
        Command {
            kind: CommandKind::Procedure,
            text: name.into(),
            params: vec![],
        }
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params
            .iter_mut()
            .find(|param| param.name.eq_ignore_ascii_case(name))
    }

    /// Sets the value of the named parameter.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<()> {
        let text = self.text.clone();
        let param = self.param_mut(name).ok_or_else(|| {
            Error::persistence(format!(
                "command has no parameter named [{name}]; command={text}"
            ))
        })?;
        param.value = value;
        Ok(())
    }

    /// Resets every parameter value to null.
    pub fn clear(&mut self) {
        for param in &mut self.params {
            param.value = Value::Null;
        }
    }

    /// Returns `true` when no parameter holds a value.
    pub fn is_clear(&self) -> bool {
        self.params.iter().all(|param| param.value.is_null())
    }
}

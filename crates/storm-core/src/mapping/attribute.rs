use super::PersistenceEvents;
use crate::driver::Direction;

/// A property-level mapping attribute as declared on a type, before
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Column(Column),
    Parameter(Parameter),
    Relation(Relation),
}

impl Attribute {
    /// True when a stored value can be looked up through the property: a
    /// column, or an input parameter, that does not suppress `LOAD`.
    pub fn is_lookup(&self) -> bool {
        match self {
            Attribute::Column(column) => {
                !column.suppressed_events.suppresses(PersistenceEvents::LOAD)
            }
            Attribute::Parameter(parameter) => {
                matches!(parameter.direction, Direction::In | Direction::InOut)
                    && !parameter.suppressed_events.suppresses(PersistenceEvents::LOAD)
            }
            Attribute::Relation(_) => false,
        }
    }
}

/// Maps a property to a table column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    /// Column name; defaults to the property name.
    pub column_name: Option<String>,

    /// True when the column is part of the primary key.
    pub primary_key: bool,

    pub suppressed_events: PersistenceEvents,
}

impl Column {
    /// A column named after its property.
    pub fn new() -> Column {
        Column::default()
    }

    pub fn named(column_name: impl Into<String>) -> Column {
        Column {
            column_name: Some(column_name.into()),
            ..Column::default()
        }
    }

    pub fn primary_key(mut self) -> Column {
        self.primary_key = true;
        self
    }

    pub fn suppress(mut self, events: PersistenceEvents) -> Column {
        self.suppressed_events |= events;
        self
    }
}

/// Maps a property to a stored-procedure parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name; defaults to the property name.
    pub parameter_name: Option<String>,

    pub direction: Direction,

    pub suppressed_events: PersistenceEvents,
}

impl Parameter {
    pub fn new(direction: Direction) -> Parameter {
        Parameter {
            parameter_name: None,
            direction,
            suppressed_events: PersistenceEvents::empty(),
        }
    }

    pub fn input(parameter_name: impl Into<String>) -> Parameter {
        Parameter::new(Direction::In).named(parameter_name)
    }

    pub fn output(parameter_name: impl Into<String>) -> Parameter {
        Parameter::new(Direction::Out).named(parameter_name)
    }

    pub fn input_output(parameter_name: impl Into<String>) -> Parameter {
        Parameter::new(Direction::InOut).named(parameter_name)
    }

    pub fn named(mut self, parameter_name: impl Into<String>) -> Parameter {
        self.parameter_name = Some(parameter_name.into());
        self
    }

    pub fn suppress(mut self, events: PersistenceEvents) -> Parameter {
        self.suppressed_events |= events;
        self
    }
}

/// Links a property holding a related instance, or a list of them, to
/// another mapped type.
///
/// The related instance is located by copying the value of `local_property`
/// on the declaring instance into `related_property` on a fresh related
/// instance and loading it.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub local_property: String,
    pub related_property: String,
}

impl Relation {
    pub fn new(local_property: impl Into<String>, related_property: impl Into<String>) -> Relation {
        Relation {
            local_property: local_property.into(),
            related_property: related_property.into(),
        }
    }
}

impl From<Column> for Attribute {
    fn from(value: Column) -> Self {
        Attribute::Column(value)
    }
}

impl From<Parameter> for Attribute {
    fn from(value: Parameter) -> Self {
        Attribute::Parameter(value)
    }
}

impl From<Relation> for Attribute {
    fn from(value: Relation) -> Self {
        Attribute::Relation(value)
    }
}

use super::*;
use crate::{Error, Result};

use indexmap::IndexMap;

impl ClassDeclaration {
    /// Validates the declaration and builds its [`ClassMapping`].
    ///
    /// Validation is all-or-nothing: on failure no partial mapping is
    /// produced and the declaration can be validated again later.
    pub fn validate(&self) -> Result<ClassMapping> {
        let ty = self.bound_type;

        if self.binder_name.trim().is_empty() {
            return Err(Error::configuration(format!(
                "invalid mapping on type [{ty}]: a data binder must be specified"
            )));
        }

        let kind = match &self.kind {
            DeclarationKind::Table { table_name } => {
                if table_name.trim().is_empty() {
                    return Err(Error::configuration(format!(
                        "invalid mapping on type [{ty}]: the table name must not be empty"
                    )));
                }
                MappingKind::Table(TableMapping {
                    table_name: table_name.clone(),
                })
            }
            DeclarationKind::Procedure { procedure_name } => {
                let procedure_name = ProcedureName::parse(procedure_name).map_err(|err| {
                    err.context(Error::configuration(format!(
                        "invalid mapping on type [{ty}]"
                    )))
                })?;
                MappingKind::Procedure(ProcedureMapping { procedure_name })
            }
        };

        let mut properties = vec![];

        for (index, property) in self.properties.iter().enumerate() {
            for attribute in &property.attributes {
                properties.push(PropertyMapping {
                    property_name: property.name,
                    property_index: index,
                    kind: self.validate_attribute(property, attribute)?,
                });
            }
        }

        for property in &properties {
            let allowed = match (&kind, &property.kind) {
                (MappingKind::Table(_), PropertyMappingKind::Column(_)) => true,
                (MappingKind::Procedure(_), PropertyMappingKind::Parameter(_)) => true,
                (MappingKind::Procedure(_), PropertyMappingKind::Relation(_)) => true,
                _ => false,
            };

            if !allowed {
                return Err(Error::configuration(format!(
                    "invalid mapping on type [{ty}]: property [{}] has a {} mapping, which is not allowed inside a {} mapping",
                    property.property_name,
                    describe(&property.kind),
                    match kind {
                        MappingKind::Table(_) => "table",
                        MappingKind::Procedure(_) => "procedure",
                    },
                )));
            }
        }

        // Storage names compare case-insensitively, as database identifiers do.
        let mut seen = IndexMap::new();
        for property in &properties {
            let Some(name) = property.storage_name() else {
                continue;
            };
            if let Some(other) = seen.insert(name.to_ascii_uppercase(), property.property_name) {
                return Err(Error::configuration(format!(
                    "invalid mapping on type [{ty}]: properties [{other}] and [{}] are both mapped to [{name}]",
                    property.property_name,
                )));
            }
        }

        if matches!(kind, MappingKind::Table(_))
            && !properties
                .iter()
                .any(|property| property.as_column().is_some_and(|column| column.primary_key))
        {
            return Err(Error::configuration(format!(
                "invalid mapping on type [{ty}]: a table mapping needs at least one primary key column"
            )));
        }

        let supports_cascade = properties.iter().any(PropertyMapping::is_relation);

        Ok(ClassMapping {
            kind,
            binder_name: self.binder_name.clone(),
            suppressed_events: self.suppressed_events,
            bound_type: ty,
            properties,
            supports_cascade,
            validated: true,
        })
    }

    fn validate_attribute(
        &self,
        property: &DeclaredProperty,
        attribute: &Attribute,
    ) -> Result<PropertyMappingKind> {
        let ty = self.bound_type;

        match attribute {
            Attribute::Column(column) => {
                let Some(property_ty) = property.ty.as_scalar() else {
                    return Err(Error::configuration(format!(
                        "invalid mapping on type [{ty}]: property [{}] holds related instances and cannot be mapped to a column",
                        property.name
                    )));
                };

                Ok(PropertyMappingKind::Column(ColumnMapping {
                    column_name: storage_name(&column.column_name, property.name),
                    primary_key: column.primary_key,
                    suppressed_events: column.suppressed_events,
                    ty: property_ty,
                }))
            }
            Attribute::Parameter(parameter) => {
                let Some(property_ty) = property.ty.as_scalar() else {
                    return Err(Error::configuration(format!(
                        "invalid mapping on type [{ty}]: property [{}] holds related instances and cannot be mapped to a parameter",
                        property.name
                    )));
                };

                Ok(PropertyMappingKind::Parameter(ParameterMapping {
                    parameter_name: storage_name(&parameter.parameter_name, property.name),
                    direction: parameter.direction,
                    suppressed_events: parameter.suppressed_events,
                    ty: property_ty,
                }))
            }
            Attribute::Relation(relation) => self.validate_relation(property, relation),
        }
    }

    fn validate_relation(
        &self,
        property: &DeclaredProperty,
        relation: &Relation,
    ) -> Result<PropertyMappingKind> {
        let ty = self.bound_type;

        let PropertyTy::Relation(target) = &property.ty else {
            return Err(Error::configuration(format!(
                "invalid mapping on type [{ty}]: property [{}] is mapped as a relation but does not hold a mapped type",
                property.name
            )));
        };

        if relation.local_property.is_empty() || relation.related_property.is_empty() {
            return Err(Error::configuration(format!(
                "invalid relation on property [{}] of type [{ty}]: both the local and the related property must be set",
                property.name
            )));
        }

        let resolved_local = self
            .property(&relation.local_property)
            .and_then(|(index, local)| {
                Some(ResolvedProperty {
                    name: local.name,
                    index,
                    ty: local.ty.as_scalar()?,
                })
            })
            .ok_or_else(|| {
                Error::configuration(format!(
                    "invalid relation on property [{}] of type [{ty}]: local property [{}] does not exist on [{ty}] or is not a scalar property",
                    property.name, relation.local_property
                ))
            })?;

        let related = (target.properties)()
            .into_iter()
            .enumerate()
            .find(|(_, related)| related.name == relation.related_property);

        let resolved_related = related
            .as_ref()
            .and_then(|(index, related)| {
                Some(ResolvedProperty {
                    name: related.name,
                    index: *index,
                    ty: related.ty.as_scalar()?,
                })
            })
            .ok_or_else(|| {
                Error::configuration(format!(
                    "invalid relation on property [{}] of type [{ty}]: related property [{}] does not exist on [{}] or is not a scalar property",
                    property.name, relation.related_property, target.bound_type
                ))
            })?;

        if !related.is_some_and(|(_, related)| related.lookup) {
            return Err(Error::configuration(format!(
                "invalid relation on property [{}] of type [{ty}]: related property [{}] of [{}] is not mapped to a loadable column or input parameter",
                property.name, relation.related_property, target.bound_type
            )));
        }

        Ok(PropertyMappingKind::Relation(RelationMapping {
            local_property: relation.local_property.clone(),
            related_property: relation.related_property.clone(),
            resolved_local,
            resolved_related,
            target: target.bound_type,
            cardinality: target.cardinality,
        }))
    }
}

fn storage_name(declared: &Option<String>, property_name: &str) -> String {
    match declared {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => property_name.to_string(),
    }
}

fn describe(kind: &PropertyMappingKind) -> &'static str {
    match kind {
        PropertyMappingKind::Column(_) => "column",
        PropertyMappingKind::Parameter(_) => "parameter",
        PropertyMappingKind::Relation(_) => "relation",
    }
}

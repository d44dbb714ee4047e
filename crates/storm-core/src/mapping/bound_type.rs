use std::any::TypeId;

/// Identifies the Rust type a mapping is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundType {
    pub id: TypeId,
    pub name: &'static str,
}

impl BoundType {
    pub fn of<T: 'static>() -> BoundType {
        BoundType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl core::fmt::Display for BoundType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.short_name())
    }
}

use bitflags::bitflags;

bitflags! {
    /// Persistence operations that can be suppressed for a whole class or a
    /// single property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PersistenceEvents: u8 {
        const LOAD = 1 << 0;
        const INSERT = 1 << 1;
        const UPDATE = 1 << 2;
        const DELETE = 1 << 3;
    }
}

impl PersistenceEvents {
    /// Returns `true` if `event` is suppressed.
    pub fn suppresses(self, event: PersistenceEvents) -> bool {
        self.contains(event)
    }
}

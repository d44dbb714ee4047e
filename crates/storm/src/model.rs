use crate::{schema::Declaration, tracker::Snapshot};

/// A type that can be loaded from and persisted to a database.
///
/// The declaration says where instances are stored and how each property
/// maps to storage. Properties are reached through accessor functions
/// captured by the declaration, so the type's fields stay private to it.
///
/// ```ignore
/// #[derive(Default)]
/// struct Bicycle {
///     name: Option<String>,
///     frame: Option<String>,
/// }
///
/// impl Model for Bicycle {
///     fn declare() -> Declaration<Self> {
///         Declaration::<Self>::table("BICYCLES", "sql")
///             .column("name", |b| &b.name, |b| &mut b.name, Column::named("NAME").primary_key())
///             .column("frame", |b| &b.frame, |b| &mut b.frame, Column::named("FRAME"))
///     }
/// }
/// ```
pub trait Model: Default + Send + Sync + Sized + 'static {
    /// Declares how the type is mapped.
    ///
    /// Called once per mapper when the type is first used; the result is
    /// validated and cached.
    fn declare() -> Declaration<Self>;

    /// The instance's change-tracking snapshot, if the type keeps one.
    fn snapshot(&self) -> Option<&Snapshot> {
        None
    }

    fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        None
    }
}

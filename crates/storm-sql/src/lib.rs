pub mod serializer;
pub use serializer::Serializer;

mod cache;
pub use cache::{
    BoundCommand, CachedCommand, CommandCache, Commands, ProcedureCommands, TableCommands,
};

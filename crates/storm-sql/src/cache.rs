use crate::Serializer;

use std::{
    any::TypeId,
    collections::HashMap,
    ops::{Deref, DerefMut},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use storm_core::{
    driver::{Command, Dialect},
    mapping::{ClassMapping, MappingKind},
    Result,
};

/// Command templates built for one mapped type, keyed by type and dialect.
#[derive(Debug, Default)]
pub struct CommandCache {
    entries: Mutex<HashMap<(TypeId, &'static str), Arc<Commands>>>,
}

/// The commands of one mapped type.
#[derive(Debug)]
pub enum Commands {
    Table(TableCommands),
    Procedure(ProcedureCommands),
}

#[derive(Debug)]
pub struct TableCommands {
    pub select: Option<CachedCommand>,
    pub exists: CachedCommand,
    pub insert: Option<CachedCommand>,
    pub update: Option<CachedCommand>,
    pub delete: Option<CachedCommand>,
}

#[derive(Debug)]
pub struct ProcedureCommands {
    pub call: CachedCommand,
}

/// A command shared between callers. Each use locks it, binds parameter
/// values and executes; the values are cleared when the lock is released.
#[derive(Debug)]
pub struct CachedCommand {
    command: Mutex<Command>,
}

/// Exclusive access to a [`CachedCommand`].
///
/// Dropping the guard resets every parameter value to null, whether or not
/// the command succeeded.
#[derive(Debug)]
pub struct BoundCommand<'a> {
    guard: MutexGuard<'a, Command>,
}

impl CommandCache {
    pub fn new() -> CommandCache {
        CommandCache::default()
    }

    /// Returns the commands for `mapping`, building them on first use.
    pub fn get_or_build(&self, mapping: &ClassMapping, dialect: &'static Dialect) -> Result<Arc<Commands>> {
        let key = (mapping.bound_type.id, dialect.name);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(commands) = entries.get(&key) {
            return Ok(commands.clone());
        }

        let commands = Arc::new(Commands::build(Serializer::new(dialect), mapping)?);
        tracing::debug!(
            ty = %mapping.bound_type,
            dialect = dialect.name,
            "built command templates"
        );
        entries.insert(key, commands.clone());
        Ok(commands)
    }

    /// Drops the commands built for a type.
    pub fn remove(&self, ty: TypeId) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _), _| *id != ty);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Commands {
    pub fn build(serializer: Serializer, mapping: &ClassMapping) -> Result<Commands> {
        Ok(match mapping.kind {
            MappingKind::Table(_) => Commands::Table(TableCommands {
                select: serializer.select_by_key(mapping)?.map(CachedCommand::new),
                exists: CachedCommand::new(serializer.exists(mapping)?),
                insert: serializer.insert(mapping)?.map(CachedCommand::new),
                update: serializer.update(mapping)?.map(CachedCommand::new),
                delete: serializer.delete(mapping)?.map(CachedCommand::new),
            }),
            MappingKind::Procedure(_) => Commands::Procedure(ProcedureCommands {
                call: CachedCommand::new(serializer.call(mapping)?),
            }),
        })
    }
}

impl CachedCommand {
    pub fn new(command: Command) -> CachedCommand {
        CachedCommand {
            command: Mutex::new(command),
        }
    }

    /// Locks the command for binding and execution.
    pub fn lock(&self) -> BoundCommand<'_> {
        BoundCommand {
            guard: self.command.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// A copy of the command in its current state.
    pub fn snapshot(&self) -> Command {
        self.command
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Deref for BoundCommand<'_> {
    type Target = Command;

    fn deref(&self) -> &Command {
        &self.guard
    }
}

impl DerefMut for BoundCommand<'_> {
    fn deref_mut(&mut self) -> &mut Command {
        &mut self.guard
    }
}

impl Drop for BoundCommand<'_> {
    fn drop(&mut self) {
        self.guard.clear();
    }
}

pub mod binder;
pub use binder::{DataBinder, ProcedureBinder, SqlBinder};

pub mod driver;

pub mod mapper;
pub use mapper::Mapper;

mod model;
pub use model::Model;

pub mod schema;
pub use schema::Declaration;

pub mod stmt;

pub mod tracker;
pub use tracker::Snapshot;

pub use storm_core::{
    bail, err,
    mapping::{self, Column, Direction, Parameter, PersistenceEvents, Relation},
    Error, Result,
};

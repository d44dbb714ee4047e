pub mod driver;
pub use driver::Connection;

mod error;
pub use error::{Error, IntoError};

pub mod mapping;
pub use mapping::ClassMapping;

pub mod stmt;

/// A Result type alias that uses Storm's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

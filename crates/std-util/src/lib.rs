pub mod result;

pub mod prelude {
    pub use crate::{assert_configuration_err, assert_err, assert_ok, assert_persistence_err};
}

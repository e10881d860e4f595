pub mod access;
pub mod model;
pub mod validate;

pub use access::Action;
pub use model::*;
pub use validate::ValidationError;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

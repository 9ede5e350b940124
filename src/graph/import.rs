mod error;
mod instance;

pub use error::ImportError;
pub use instance::{import_instance, parse_instance, Instance};

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::RosterLoader;
pub use models::RosterFormat;
pub use validation::{RosterValidator, ValidationReport};

pub mod credentials;
pub mod settings;

pub use credentials::*;
pub use settings::*;

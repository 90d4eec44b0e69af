pub mod config;
pub mod session;

pub use config::{ConfigError, GlobeConfig};
pub use session::{GlobeSession, SearchMode, SessionError};

pub mod error;
pub mod filesystem;
pub mod logging;

pub use error::{Error, Result};
pub use filesystem::{find_media_files, is_media_file};
pub use logging::setup_logging;

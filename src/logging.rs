use std::env;
use std::fs::File;

use env_logger::{Builder, Target};

pub const LOG_FILE_NAME: &str = "procmon.log";

/// Enables logging when `RUST_LOG` is set.
///
/// The screen belongs to the UI, so records go to a file in the temp directory.
pub fn init() {
    if env::var_os("RUST_LOG").is_none() {
        return;
    }

    let path = env::temp_dir().join(LOG_FILE_NAME);
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(_) => return,
    };

    Builder::from_default_env()
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();

    log::info!("logging to {}", path.display());
}

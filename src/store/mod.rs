mod file;
mod record;

pub use file::{DEFAULT_STORE_FILENAME, create, load, save, update, write_replacing};
pub use record::{EpisodeRecord, StoreDocument};

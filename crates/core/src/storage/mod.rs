//! Storage module
//!
//! Key-value persistence and local attachment file handling.

mod kv;
mod local_file;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use local_file::{
    delete_local_file, file_uri, is_local_file, local_file_exists, local_file_path,
    LOCAL_FILE_SCHEME,
};

//! Core library for Taskpad
//!
//! This crate contains the core logic of the task manager, including:
//! - Task model and the task store
//! - Key-value persistence of the task collection
//! - Media attachment import and cleanup

pub mod config;
pub mod error;
pub mod grouping;
pub mod media;
pub mod storage;
pub mod task;

pub use config::StoreConfig;
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

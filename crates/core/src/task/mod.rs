//! Task module
//!
//! This module contains the task model, its persistence and the store
//! that keeps the two in sync.

mod model;
mod persistence;
mod store;

pub use model::*;
pub use persistence::{KvTaskPersistence, TaskPersistence};
pub use store::TaskStore;

//! Media module
//!
//! Permission-gated picking and capture of attachments, and their import
//! into app-private storage.

mod importer;
mod source;

pub use importer::MediaImporter;
pub use source::{
    MediaSource, Notice, Notifier, PermissionGate, PermissionKind, PermissionStatus, PickedAsset,
};

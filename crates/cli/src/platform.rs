//! Terminal implementations of the media seams
//!
//! A file named on the command line stands in for the library picker and
//! the camera. Naming it is consent, so permission is always granted.

use async_trait::async_trait;
use std::path::PathBuf;

use taskpad_core::media::{
    MediaSource, Notice, Notifier, PermissionGate, PermissionKind, PermissionStatus, PickedAsset,
};
use taskpad_core::task::MediaKind;

pub struct CommandLineGate;

#[async_trait]
impl PermissionGate for CommandLineGate {
    async fn request(&self, _kind: PermissionKind) -> PermissionStatus {
        PermissionStatus::Granted
    }
}

/// Serves the file given on the command line; no file means cancelled
pub struct CommandLineSource {
    path: Option<PathBuf>,
}

impl CommandLineSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn asset(&self) -> Option<PickedAsset> {
        self.path.as_ref().map(PickedAsset::new)
    }
}

#[async_trait]
impl MediaSource for CommandLineSource {
    async fn pick_from_library(&self, _kind: MediaKind) -> taskpad_core::Result<Option<PickedAsset>> {
        Ok(self.asset())
    }

    async fn capture_photo(&self) -> taskpad_core::Result<Option<PickedAsset>> {
        Ok(self.asset())
    }
}

/// Prints notices to stderr
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}: {}", notice.title(), notice);
    }
}

//! Platform seams for media selection
//!
//! The host environment provides permission prompts, the library picker,
//! the camera and a way to show notices to the user.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::task::MediaKind;
use crate::Result;

/// Permission a media operation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    MediaLibrary,
    Camera,
}

/// Result of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A file handed over by the picker or camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAsset {
    /// Where the file currently lives; may be a transient staging location
    pub source: PathBuf,
    /// Original file name, when the platform reports one
    pub file_name: Option<String>,
    /// Size reported by the platform
    pub size_bytes: Option<u64>,
}

impl PickedAsset {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            file_name: None,
            size_bytes: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }
}

/// Permission prompts
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request(&self, kind: PermissionKind) -> PermissionStatus;
}

/// Library picker and camera. `Ok(None)` means the user cancelled.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn pick_from_library(&self, kind: MediaKind) -> Result<Option<PickedAsset>>;

    async fn capture_photo(&self) -> Result<Option<PickedAsset>>;
}

/// User-facing notice raised while selecting media
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PermissionRequired(PermissionKind),
    FileTooLarge { limit_bytes: u64 },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Self::PermissionRequired(_) => "Permission required",
            Self::FileTooLarge { .. } => "File too large",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionRequired(PermissionKind::MediaLibrary) => {
                f.write_str("We need access to your media library to attach files")
            }
            Self::PermissionRequired(PermissionKind::Camera) => {
                f.write_str("We need access to your camera to take photos")
            }
            Self::FileTooLarge { limit_bytes } => write!(
                f,
                "Please select a file smaller than {}MB",
                limit_bytes / (1024 * 1024)
            ),
        }
    }
}

/// Shows notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

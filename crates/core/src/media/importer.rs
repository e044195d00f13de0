//! Media import
//!
//! Copies picked or captured files into the media directory so the stored
//! reference outlives the platform's staging location.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::source::{
    MediaSource, Notice, Notifier, PermissionGate, PermissionKind, PickedAsset,
};
use crate::config::StoreConfig;
use crate::storage::file_uri;
use crate::task::{Attachment, MediaKind};
use crate::{Error, Result};

const DEFAULT_MEDIA_NAME: &str = "media";
const DEFAULT_PHOTO_NAME: &str = "photo.jpg";

/// Picks, captures and imports attachments
pub struct MediaImporter {
    permissions: Arc<dyn PermissionGate>,
    source: Arc<dyn MediaSource>,
    notifier: Arc<dyn Notifier>,
    media_dir: PathBuf,
    max_media_bytes: u64,
}

impl MediaImporter {
    pub fn new(
        config: &StoreConfig,
        permissions: Arc<dyn PermissionGate>,
        source: Arc<dyn MediaSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            permissions,
            source,
            notifier,
            media_dir: config.media_dir(),
            max_media_bytes: config.max_media_bytes,
        }
    }

    /// Let the user pick an image or video from the library.
    ///
    /// Returns `Ok(None)` when permission is denied, the picker is
    /// cancelled or the file exceeds the size cap.
    pub async fn request_and_pick_from_library(
        &self,
        kind: MediaKind,
    ) -> Result<Option<Attachment>> {
        if !self.granted(PermissionKind::MediaLibrary).await {
            return Ok(None);
        }

        let Some(asset) = self.source.pick_from_library(kind).await? else {
            debug!("Library picker cancelled");
            return Ok(None);
        };

        if let Some(size) = asset_size(&asset).await {
            if size > self.max_media_bytes {
                debug!(
                    "Rejected {} ({} bytes, limit {})",
                    asset.source.display(),
                    size,
                    self.max_media_bytes
                );
                self.notifier.notify(Notice::FileTooLarge {
                    limit_bytes: self.max_media_bytes,
                });
                return Ok(None);
            }
        }

        self.import(&asset, kind, DEFAULT_MEDIA_NAME).await.map(Some)
    }

    /// Let the user take a photo with the camera.
    ///
    /// Same "no selection" outcomes as the library picker, without a size cap.
    pub async fn request_and_capture(&self) -> Result<Option<Attachment>> {
        if !self.granted(PermissionKind::Camera).await {
            return Ok(None);
        }

        let Some(asset) = self.source.capture_photo().await? else {
            debug!("Camera cancelled");
            return Ok(None);
        };

        self.import(&asset, MediaKind::Image, DEFAULT_PHOTO_NAME)
            .await
            .map(Some)
    }

    async fn granted(&self, kind: PermissionKind) -> bool {
        if self.permissions.request(kind).await.is_granted() {
            return true;
        }
        debug!("Permission {:?} denied", kind);
        self.notifier.notify(Notice::PermissionRequired(kind));
        false
    }

    async fn import(
        &self,
        asset: &PickedAsset,
        kind: MediaKind,
        fallback_name: &str,
    ) -> Result<Attachment> {
        tokio::fs::create_dir_all(&self.media_dir)
            .await
            .map_err(|e| Error::media_io(&self.media_dir, e))?;
        let media_dir = tokio::fs::canonicalize(&self.media_dir)
            .await
            .map_err(|e| Error::media_io(&self.media_dir, e))?;

        let name = stored_name(asset, fallback_name);
        let mut stamp = Utc::now().timestamp_millis();
        let mut dest = media_dir.join(format!("{}_{}", stamp, name));
        while tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            stamp += 1;
            dest = media_dir.join(format!("{}_{}", stamp, name));
        }

        tokio::fs::copy(&asset.source, &dest)
            .await
            .map_err(|e| Error::media_io(&dest, e))?;

        info!("Imported {} {} as {}", kind, asset.source.display(), dest.display());
        Ok(Attachment::new(kind, file_uri(&dest)?))
    }
}

/// Platform-reported size, falling back to the file's metadata
async fn asset_size(asset: &PickedAsset) -> Option<u64> {
    match asset.size_bytes {
        Some(size) => Some(size),
        None => tokio::fs::metadata(&asset.source).await.ok().map(|m| m.len()),
    }
}

/// Final path component of the original name, or the fallback
fn stored_name(asset: &PickedAsset, fallback: &str) -> String {
    asset
        .file_name
        .as_deref()
        .and_then(last_component)
        .or_else(|| asset.source.to_str().and_then(last_component))
        .unwrap_or(fallback)
        .to_string()
}

fn last_component(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()?
        .to_str()
        .filter(|n| !n.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::PermissionStatus;
    use crate::storage::{local_file_exists, local_file_path};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedPermissions(PermissionStatus);

    #[async_trait]
    impl PermissionGate for FixedPermissions {
        async fn request(&self, _kind: PermissionKind) -> PermissionStatus {
            self.0
        }
    }

    /// Hands out the same asset for every request, or cancels when empty
    struct FixedSource {
        asset: Option<PickedAsset>,
        requested: Mutex<Vec<Option<MediaKind>>>,
    }

    impl FixedSource {
        fn new(asset: Option<PickedAsset>) -> Self {
            Self {
                asset,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaSource for FixedSource {
        async fn pick_from_library(&self, kind: MediaKind) -> Result<Option<PickedAsset>> {
            self.requested.lock().unwrap().push(Some(kind));
            Ok(self.asset.clone())
        }

        async fn capture_photo(&self) -> Result<Option<PickedAsset>> {
            self.requested.lock().unwrap().push(None);
            Ok(self.asset.clone())
        }
    }

    #[derive(Default)]
    struct CollectingNotifier(Mutex<Vec<Notice>>);

    impl Notifier for CollectingNotifier {
        fn notify(&self, notice: Notice) {
            self.0.lock().unwrap().push(notice);
        }
    }

    struct Fixture {
        _temp: TempDir,
        staging: PathBuf,
        config: StoreConfig,
        notifier: Arc<CollectingNotifier>,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let staging = temp.path().join("staging");
            std::fs::create_dir_all(&staging).unwrap();
            let config = StoreConfig::with_data_dir(temp.path().join("data"));
            Self {
                _temp: temp,
                staging,
                config,
                notifier: Arc::new(CollectingNotifier::default()),
            }
        }

        fn staged_file(&self, name: &str, len: usize) -> PathBuf {
            let path = self.staging.join(name);
            std::fs::write(&path, vec![7u8; len]).unwrap();
            path
        }

        fn importer(
            &self,
            status: PermissionStatus,
            source: Arc<FixedSource>,
        ) -> MediaImporter {
            MediaImporter::new(
                &self.config,
                Arc::new(FixedPermissions(status)),
                source,
                self.notifier.clone(),
            )
        }

        fn notices(&self) -> Vec<Notice> {
            self.notifier.0.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_pick_copies_into_media_dir() {
        let fx = Fixture::new();
        let staged = fx.staged_file("IMG_0001.jpg", 16);
        let source = Arc::new(FixedSource::new(Some(
            PickedAsset::new(&staged).with_file_name("IMG_0001.jpg").with_size(16),
        )));
        let importer = fx.importer(PermissionStatus::Granted, source.clone());

        let attachment = importer
            .request_and_pick_from_library(MediaKind::Image)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(attachment.kind, MediaKind::Image);
        assert!(local_file_exists(&attachment.uri).await);
        let stored = local_file_path(&attachment.uri).unwrap();
        let stored_name = stored.file_name().unwrap().to_str().unwrap();
        assert!(stored_name.ends_with("_IMG_0001.jpg"));
        assert!(stored.starts_with(fx.config.media_dir().canonicalize().unwrap()));

        // Survives removal of the staging copy
        std::fs::remove_file(&staged).unwrap();
        assert!(local_file_exists(&attachment.uri).await);
        assert_eq!(*source.requested.lock().unwrap(), vec![Some(MediaKind::Image)]);
        assert!(fx.notices().is_empty());
    }

    #[tokio::test]
    async fn test_two_picks_of_same_file_get_distinct_paths() {
        let fx = Fixture::new();
        let staged = fx.staged_file("clip.mp4", 8);
        let source = Arc::new(FixedSource::new(Some(PickedAsset::new(&staged))));
        let importer = fx.importer(PermissionStatus::Granted, source);

        let a = importer
            .request_and_pick_from_library(MediaKind::Video)
            .await
            .unwrap()
            .unwrap();
        let b = importer
            .request_and_pick_from_library(MediaKind::Video)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(a.uri, b.uri);
        assert_eq!(b.kind, MediaKind::Video);
    }

    #[tokio::test]
    async fn test_permission_denied_is_no_selection() {
        let fx = Fixture::new();
        let source = Arc::new(FixedSource::new(None));
        let importer = fx.importer(PermissionStatus::Denied, source.clone());

        assert!(importer
            .request_and_pick_from_library(MediaKind::Image)
            .await
            .unwrap()
            .is_none());
        assert!(importer.request_and_capture().await.unwrap().is_none());

        assert!(source.requested.lock().unwrap().is_empty());
        assert_eq!(
            fx.notices(),
            vec![
                Notice::PermissionRequired(PermissionKind::MediaLibrary),
                Notice::PermissionRequired(PermissionKind::Camera),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_picker_is_no_selection() {
        let fx = Fixture::new();
        let importer = fx.importer(PermissionStatus::Granted, Arc::new(FixedSource::new(None)));

        assert!(importer
            .request_and_pick_from_library(MediaKind::Video)
            .await
            .unwrap()
            .is_none());
        assert!(fx.notices().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_pick_is_rejected() {
        let fx = Fixture::new();
        let staged = fx.staged_file("big.mp4", 4);
        let source = Arc::new(FixedSource::new(Some(
            PickedAsset::new(&staged).with_size(10 * 1024 * 1024 + 1),
        )));
        let importer = fx.importer(PermissionStatus::Granted, source);

        let result = importer
            .request_and_pick_from_library(MediaKind::Video)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(
            fx.notices(),
            vec![Notice::FileTooLarge {
                limit_bytes: 10 * 1024 * 1024
            }]
        );
        assert!(!fx.config.media_dir().exists());
    }

    #[tokio::test]
    async fn test_size_falls_back_to_file_metadata() {
        let mut fx = Fixture::new();
        fx.config.max_media_bytes = 10;
        let staged = fx.staged_file("notes.jpg", 11);
        let importer = fx.importer(
            PermissionStatus::Granted,
            Arc::new(FixedSource::new(Some(PickedAsset::new(&staged)))),
        );

        let result = importer
            .request_and_pick_from_library(MediaKind::Image)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(fx.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_capture_with_blank_name_uses_staged_name() {
        let fx = Fixture::new();
        let staged = fx.staged_file("capture", 32);
        let source = Arc::new(FixedSource::new(Some(
            PickedAsset::new(&staged).with_file_name(""),
        )));
        let importer = fx.importer(PermissionStatus::Granted, source);

        let attachment = importer.request_and_capture().await.unwrap().unwrap();

        assert_eq!(attachment.kind, MediaKind::Image);
        // Blank reported name falls back to the staged file's own name
        assert!(attachment.uri.ends_with("_capture"));
    }

    #[tokio::test]
    async fn test_missing_source_is_media_io_error() {
        let fx = Fixture::new();
        let source = Arc::new(FixedSource::new(Some(
            PickedAsset::new(fx.staging.join("vanished.jpg")).with_size(1),
        )));
        let importer = fx.importer(PermissionStatus::Granted, source);

        let err = importer
            .request_and_pick_from_library(MediaKind::Image)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MediaIo { .. }));
    }

    #[test]
    fn test_stored_name_strips_directories() {
        let asset = PickedAsset::new("/tmp/x").with_file_name("../../etc/passwd");
        assert_eq!(stored_name(&asset, "media"), "passwd");

        let asset = PickedAsset::new("/");
        assert_eq!(stored_name(&asset, "photo.jpg"), "photo.jpg");
    }
}

//! Data directory layout and profile photo storage.
//!
//! `{data_dir}/olivia.db` holds the database, `{data_dir}/config.toml` the
//! configuration, and `{data_dir}/profile_images/` copied profile photos.

use std::io;
use std::path::{Path, PathBuf};

use olivia_types::identity::IdentityId;

/// Resolve the data directory.
///
/// Priority: `OLIVIA_DATA_DIR`, then `~/.olivia`, then `./.olivia`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OLIVIA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".olivia");
    }

    PathBuf::from(".olivia")
}

/// SQLite URL for the database inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("olivia.db").display())
}

pub fn profile_images_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("profile_images")
}

/// Copy a photo into `{data_dir}/profile_images/{identity}.{ext}`.
///
/// The extension is taken from `source` (lowercased, `jpg` when absent).
/// Any earlier photo for `identity` under another extension is removed, so
/// at most one file per identity remains. Returns the stored path.
pub async fn store_profile_photo(
    data_dir: &Path,
    identity: &IdentityId,
    source: &Path,
) -> io::Result<PathBuf> {
    let metadata = tokio::fs::metadata(source).await?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", source.display()),
        ));
    }

    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "jpg".to_string());

    let dir = profile_images_dir(data_dir);
    tokio::fs::create_dir_all(&dir).await?;
    let target = dir.join(format!("{identity}.{ext}"));
    tokio::fs::copy(source, &target).await?;
    remove_photos_except(&dir, identity, Some(&target)).await?;

    tracing::debug!(identity = %identity, path = %target.display(), "Stored profile photo");
    Ok(target)
}

/// Delete every stored photo for `identity`. Returns how many were removed;
/// a missing images directory counts as zero.
pub async fn remove_profile_photos(data_dir: &Path, identity: &IdentityId) -> io::Result<usize> {
    remove_photos_except(&profile_images_dir(data_dir), identity, None).await
}

async fn remove_photos_except(dir: &Path, identity: &IdentityId, keep: Option<&Path>) -> io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let stem = identity.to_string();
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.file_stem().and_then(|s| s.to_str()) != Some(stem.as_str()) || keep == Some(path.as_path()) {
            continue;
        }
        tokio::fs::remove_file(&path).await?;
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/olivia-test"));
        assert_eq!(url, "sqlite:///tmp/olivia-test/olivia.db?mode=rwc");
    }

    #[tokio::test]
    async fn test_store_profile_photo_copies_with_identity_name() {
        let data = tempdir().unwrap();
        let src_dir = tempdir().unwrap();
        let source = src_dir.path().join("Me.PNG");
        tokio::fs::write(&source, b"\x89PNG fake").await.unwrap();

        let identity = IdentityId::new();
        let stored = store_profile_photo(data.path(), &identity, &source)
            .await
            .unwrap();

        assert_eq!(
            stored,
            data.path().join("profile_images").join(format!("{identity}.png"))
        );
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_store_profile_photo_defaults_to_jpg() {
        let data = tempdir().unwrap();
        let source = data.path().join("photo");
        tokio::fs::write(&source, b"jpeg bytes").await.unwrap();

        let identity = IdentityId::new();
        let stored = store_profile_photo(data.path(), &identity, &source)
            .await
            .unwrap();
        assert_eq!(stored.extension().unwrap(), "jpg");
    }

    #[tokio::test]
    async fn test_replacing_photo_with_other_type_removes_old_file() {
        let data = tempdir().unwrap();
        let src_dir = tempdir().unwrap();
        let jpg = src_dir.path().join("old.jpg");
        let png = src_dir.path().join("new.png");
        tokio::fs::write(&jpg, b"jpeg").await.unwrap();
        tokio::fs::write(&png, b"png").await.unwrap();

        let identity = IdentityId::new();
        let other = IdentityId::new();
        let first = store_profile_photo(data.path(), &identity, &jpg).await.unwrap();
        let theirs = store_profile_photo(data.path(), &other, &jpg).await.unwrap();
        let second = store_profile_photo(data.path(), &identity, &png).await.unwrap();

        assert!(!first.exists());
        assert_eq!(tokio::fs::read(&second).await.unwrap(), b"png");
        assert!(theirs.exists());
    }

    #[tokio::test]
    async fn test_remove_profile_photos_only_touches_identity() {
        let data = tempdir().unwrap();
        let source = data.path().join("me.jpg");
        tokio::fs::write(&source, b"jpeg").await.unwrap();

        let identity = IdentityId::new();
        let other = IdentityId::new();
        let mine = store_profile_photo(data.path(), &identity, &source).await.unwrap();
        let theirs = store_profile_photo(data.path(), &other, &source).await.unwrap();

        assert_eq!(remove_profile_photos(data.path(), &identity).await.unwrap(), 1);
        assert!(!mine.exists());
        assert!(theirs.exists());
        assert_eq!(remove_profile_photos(data.path(), &identity).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_profile_photos_without_images_dir() {
        let data = tempdir().unwrap();
        assert_eq!(remove_profile_photos(data.path(), &IdentityId::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_profile_photo_missing_source_fails() {
        let data = tempdir().unwrap();
        let err = store_profile_photo(data.path(), &IdentityId::new(), &data.path().join("nope.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_store_profile_photo_rejects_directory() {
        let data = tempdir().unwrap();
        let err = store_profile_photo(data.path(), &IdentityId::new(), data.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}

//! Photo Gallery Widget
//!
//! Photo metadata records, newest first. File contents are not stored; a
//! record carries a session-only `download_url` that is stripped before every
//! write and is therefore `None` after re-hydration.

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, required, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PHOTOS_KEY: &str = "list";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Metadata supplied by the uploader
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoUpload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub file_name: String,
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
}

pub struct PhotoGallery {
    ns: Namespace,
    photos: Vec<PhotoRecord>,
}

impl Widget for PhotoGallery {
    const NAMESPACE: &'static str = "photos";

    fn reset(&mut self) {
        self.photos.clear();
    }
}

impl PhotoGallery {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let mut photos: Vec<PhotoRecord> = ns.load_or_default(PHOTOS_KEY);
        for photo in &mut photos {
            photo.download_url = None;
        }

        tracing::info!(photos = photos.len(), "Photo gallery mounted");
        Self { ns, photos }
    }

    /// Photos, newest first
    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn add(&mut self, upload: PhotoUpload) -> WidgetResult<PhotoRecord> {
        let title = required(&upload.title, "Photo title")?;
        let file_name = required(&upload.file_name, "File name")?;
        if !upload.file_type.starts_with("image/") {
            return Err(WidgetError::Validation(
                "Please select a valid image file".to_string(),
            ));
        }

        let id = new_id();
        let photo = PhotoRecord {
            download_url: Some(format!("session://photos/{}", id)),
            id,
            title,
            description: upload.description.trim().to_string(),
            file_name,
            file_type: upload.file_type,
            file_size: upload.file_size,
            uploaded_at: Utc::now(),
        };

        let mut next = Vec::with_capacity(self.photos.len() + 1);
        next.push(photo.clone());
        next.extend(self.photos.iter().cloned());
        self.commit(next)?;

        tracing::info!(id = %photo.id, file = %photo.file_name, size = photo.file_size, "Photo added");
        Ok(photo)
    }

    pub fn delete(&mut self, id: &str) -> WidgetResult<PhotoRecord> {
        let index = self
            .photos
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| WidgetError::NotFound(format!("photo {}", id)))?;

        let mut next = self.photos.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        tracing::info!(id = %removed.id, "Photo deleted");
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<PhotoRecord>) -> WidgetResult<()> {
        let persisted: Vec<PhotoRecord> = next
            .iter()
            .cloned()
            .map(|mut p| {
                p.download_url = None;
                p
            })
            .collect();

        self.ns.save(PHOTOS_KEY, &persisted)?;
        self.photos = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn gallery() -> (PhotoGallery, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (PhotoGallery::mount(Arc::clone(&store)), store)
    }

    fn upload(title: &str) -> PhotoUpload {
        PhotoUpload {
            title: title.to_string(),
            description: "at the beach".to_string(),
            file_name: "beach.jpg".to_string(),
            file_type: "image/jpeg".to_string(),
            file_size: 2048,
        }
    }

    #[test]
    fn test_add_newest_first() {
        let (mut gallery, _) = gallery();
        gallery.add(upload("first")).unwrap();
        let second = gallery.add(upload("second")).unwrap();

        assert_eq!(gallery.photos()[0], second);
        assert_eq!(
            second.download_url.as_deref(),
            Some(format!("session://photos/{}", second.id).as_str())
        );
    }

    #[test]
    fn test_validation() {
        let (mut gallery, _) = gallery();
        assert!(gallery.add(upload("  ")).is_err());

        let mut not_image = upload("doc");
        not_image.file_type = "application/pdf".to_string();
        assert!(matches!(gallery.add(not_image), Err(WidgetError::Validation(_))));

        let mut unnamed = upload("x");
        unnamed.file_name = String::new();
        assert!(gallery.add(unnamed).is_err());

        assert!(gallery.photos().is_empty());
    }

    #[test]
    fn test_download_url_is_not_persisted() {
        let (mut gallery, store) = gallery();
        gallery.add(upload("beach")).unwrap();

        let raw = store.get("photos:list").unwrap().unwrap();
        assert!(!raw.contains("session://"));

        let remounted = PhotoGallery::mount(store);
        assert_eq!(remounted.photos().len(), 1);
        assert!(remounted.photos()[0].download_url.is_none());
    }

    #[test]
    fn test_delete() {
        let (mut gallery, _) = gallery();
        let photo = gallery.add(upload("beach")).unwrap();

        gallery.delete(&photo.id).unwrap();
        assert!(gallery.photos().is_empty());
        assert!(matches!(gallery.delete(&photo.id), Err(WidgetError::NotFound(_))));
    }
}

// src/store.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::announcement::Announcement;

/// In-memory announcement storage shared by all handlers.
///
/// Only sanitized announcements are inserted; the store itself does no
/// escaping.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementStore {
    inner: Arc<RwLock<HashMap<Uuid, Announcement>>>,
}

impl AnnouncementStore {
    pub async fn insert(&self, announcement: Announcement) {
        self.inner
            .write()
            .await
            .insert(announcement.id, announcement);
    }

    pub async fn get(&self, id: Uuid) -> Option<Announcement> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Newest first, optionally restricted to one course.
    pub async fn list(&self, course: Option<&str>) -> Vec<Announcement> {
        let guard = self.inner.read().await;
        let mut items: Vec<Announcement> = guard
            .values()
            .filter(|a| course.is_none_or(|c| a.course == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub async fn remove(&self, id: Uuid) -> Option<Announcement> {
        self.inner.write().await.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn announcement(course: &str, minutes_ago: i64) -> Announcement {
        Announcement {
            id: Uuid::new_v4(),
            course: course.to_string(),
            title: "t".to_string(),
            body: "b".to_string(),
            author_id: "1".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn list_filters_by_course_newest_first() {
        let store = AnnouncementStore::default();
        let old = announcement("cs101", 30);
        let new = announcement("cs101", 1);
        let other = announcement("ma201", 5);
        store.insert(old.clone()).await;
        store.insert(new.clone()).await;
        store.insert(other).await;

        let ids: Vec<Uuid> = store.list(Some("cs101")).await.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);
        assert_eq!(store.list(None).await.len(), 3);
    }

    #[tokio::test]
    async fn remove_returns_the_item_once() {
        let store = AnnouncementStore::default();
        let a = announcement("cs101", 0);
        store.insert(a.clone()).await;
        assert!(store.remove(a.id).await.is_some());
        assert!(store.remove(a.id).await.is_none());
        assert!(store.get(a.id).await.is_none());
    }
}

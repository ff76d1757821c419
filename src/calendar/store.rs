use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{Calendar, CalendarError, Container, EventId, EventRecord};
use crate::model::Permission;

/// Calendar kept in a folder: every subfolder is a container, every event a
/// json file named by its id.
pub struct JsonCalendar {
    root: PathBuf,
    access: Permission,
}

impl JsonCalendar {
    pub fn new(root: impl Into<PathBuf>, access: Permission) -> Self {
        Self { root: root.into(), access }
    }

    pub async fn ensure_container(&self, name: &str) -> Result<Container, CalendarError> {
        tokio::fs::create_dir_all(self.root.join(name)).await?;
        Ok(Container { id: name.to_owned(), title: name.to_owned() })
    }

    fn container_path(&self, container: &Container) -> PathBuf {
        self.root.join(&container.id)
    }
}

#[async_trait]
impl Calendar for JsonCalendar {
    async fn request_permission(&self) -> Result<Permission, CalendarError> {
        Ok(self.access)
    }

    async fn list_containers(&self) -> Result<Vec<Container>, CalendarError> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut containers = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => containers.push(Container { id: name.clone(), title: name }),
                Err(name) => log::warn!("skipping calendar folder with non utf-8 name: {:?}", name),
            }
        }
        containers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(containers)
    }

    async fn create_event(&self, container: &Container, event: &EventRecord) -> Result<EventId, CalendarError> {
        let folder = self.container_path(container);
        if !is_dir(&folder).await {
            return Err(CalendarError::UnknownContainer(container.id.clone()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        let json = serde_json::to_string_pretty(event)?;
        let mut file = tokio::fs::File::create(folder.join(format!("{}.json", id))).await?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;
        log::debug!("event {} stored in {}", id, folder.display());
        Ok(EventId(id))
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;

    fn make_record() -> EventRecord {
        let start = chrono::DateTime::parse_from_rfc3339("2024-05-01T10:00:00-03:00").unwrap();
        EventRecord {
            title: "Reunião".to_owned(),
            start,
            end: start + Duration::hours(1),
            location: "Local do Evento".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_missing_root_has_no_containers() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = JsonCalendar::new(dir.path().join("nothing"), Permission::Granted);
        assert!(calendar.list_containers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_containers_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = JsonCalendar::new(dir.path(), Permission::Granted);
        calendar.ensure_container("work").await.unwrap();
        calendar.ensure_container("personal").await.unwrap();
        tokio::fs::write(dir.path().join("stray.txt"), b"x").await.unwrap();

        let ids: Vec<_> = calendar.list_containers().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["personal".to_owned(), "work".to_owned()]);
    }

    #[tokio::test]
    async fn test_create_event() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = JsonCalendar::new(dir.path(), Permission::Denied);
        assert_eq!(calendar.request_permission().await.unwrap(), Permission::Denied);

        let container = calendar.ensure_container("personal").await.unwrap();
        let record = make_record();
        let id = calendar.create_event(&container, &record).await.unwrap();

        let path = dir.path().join("personal").join(format!("{}.json", id));
        let stored = tokio::fs::read_to_string(path).await.unwrap();
        let stored: EventRecord = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_unknown_container() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = JsonCalendar::new(dir.path(), Permission::Granted);
        let container = Container { id: "gone".to_owned(), title: "gone".to_owned() };
        let err = calendar.create_event(&container, &make_record()).await.unwrap_err();
        assert!(matches!(err, CalendarError::UnknownContainer(id) if id == "gone"));
    }
}

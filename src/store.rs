use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::model::{Reminder, Todo, UserPreferences};

/// The full persisted document: every collection in one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub reminders: Vec<Reminder>,
    pub todos: Vec<Todo>,
    pub preferences: UserPreferences,
}

/// Local JSON document store. Stands in for the cloud sync backend:
/// per-collection add/update/delete, with every mutation persisted
/// before it is acknowledged.
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open the store at the platform data directory
    /// (`<data_dir>/memocal/data.json`).
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| eyre!("no platform data directory available"))?
            .join("memocal");
        Ok(Self::at(dir.join("data.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file is an empty document; a file
    /// that exists but does not parse is an error, never silently
    /// treated as empty.
    pub fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let raw = fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("reading {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .wrap_err_with(|| format!("parsing {}", self.path.display()))
    }

    /// Write the document via a temp file and rename so a crash
    /// mid-write never truncates existing data.
    fn persist(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("creating {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(doc)?;
        fs::write(&tmp, raw).wrap_err_with(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .wrap_err_with(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    // --- Reminders ---

    pub fn add_reminder(&self, doc: &mut Document, reminder: Reminder) -> Result<()> {
        doc.reminders.push(reminder);
        self.persist(doc)
    }

    /// Replace a reminder by id, returning the previous version.
    pub fn update_reminder(&self, doc: &mut Document, reminder: Reminder) -> Result<Reminder> {
        let slot = doc
            .reminders
            .iter_mut()
            .find(|r| r.id == reminder.id)
            .ok_or_else(|| eyre!("no reminder with id {}", reminder.id))?;
        let previous = std::mem::replace(slot, reminder);
        self.persist(doc)?;
        Ok(previous)
    }

    /// Remove a reminder by id, returning it.
    pub fn delete_reminder(&self, doc: &mut Document, id: &str) -> Result<Reminder> {
        let idx = doc
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| eyre!("no reminder with id {id}"))?;
        let removed = doc.reminders.remove(idx);
        self.persist(doc)?;
        Ok(removed)
    }

    // --- Todos ---

    pub fn add_todo(&self, doc: &mut Document, todo: Todo) -> Result<()> {
        doc.todos.push(todo);
        self.persist(doc)
    }

    pub fn update_todo(&self, doc: &mut Document, todo: Todo) -> Result<Todo> {
        let slot = doc
            .todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or_else(|| eyre!("no todo with id {}", todo.id))?;
        let previous = std::mem::replace(slot, todo);
        self.persist(doc)?;
        Ok(previous)
    }

    pub fn delete_todo(&self, doc: &mut Document, id: &str) -> Result<Todo> {
        let idx = doc
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| eyre!("no todo with id {id}"))?;
        let removed = doc.todos.remove(idx);
        self.persist(doc)?;
        Ok(removed)
    }

    // --- Preferences ---

    pub fn update_preferences(&self, doc: &mut Document, prefs: UserPreferences) -> Result<()> {
        doc.preferences = prefs;
        self.persist(doc)
    }

    // --- Backup ---

    /// Dump the whole document as a JSON backup.
    pub fn export_to(&self, doc: &Document, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(doc)?;
        fs::write(path, raw).wrap_err_with(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Merge a backup into the document. Items with a known id replace
    /// the stored version; new ids are appended. Returns how many
    /// reminders and todos were merged.
    pub fn import_from(&self, doc: &mut Document, path: &Path) -> Result<(usize, usize)> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        let incoming: Document =
            serde_json::from_str(&raw).wrap_err_with(|| format!("parsing {}", path.display()))?;

        let n_reminders = incoming.reminders.len();
        for r in incoming.reminders {
            match doc.reminders.iter_mut().find(|have| have.id == r.id) {
                Some(slot) => *slot = r,
                None => doc.reminders.push(r),
            }
        }
        let n_todos = incoming.todos.len();
        for t in incoming.todos {
            match doc.todos.iter_mut().find(|have| have.id == t.id) {
                Some(slot) => *slot = t,
                None => doc.todos.push(t),
            }
        }

        self.persist(doc)?;
        Ok((n_reminders, n_todos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepeatFrequency;
    use chrono::NaiveDate;

    fn reminder(id: &str, title: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: "09:00".to_string(),
            color: "#3b82f6".to_string(),
            category: None,
            created_at: 1,
            repeat: RepeatFrequency::None,
            alerts: vec![15],
            is_completed: false,
        }
    }

    fn todo(id: &str, text: &str) -> Todo {
        Todo {
            id: id.to_string(),
            text: text.to_string(),
            completed: false,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            created_at: 2,
        }
    }

    #[test]
    fn missing_file_loads_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("data.json"));
        let doc = store.load().unwrap();
        assert!(doc.reminders.is_empty());
        assert!(doc.todos.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();
        let store = Store::at(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn mutations_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("nested").join("data.json"));
        let mut doc = store.load().unwrap();

        store.add_reminder(&mut doc, reminder("r1", "Dentist")).unwrap();
        store.add_todo(&mut doc, todo("t1", "pack bags")).unwrap();

        let mut updated = reminder("r1", "Dentist (moved)");
        updated.time = "14:00".to_string();
        let previous = store.update_reminder(&mut doc, updated).unwrap();
        assert_eq!(previous.title, "Dentist");

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.reminders.len(), 1);
        assert_eq!(reloaded.reminders[0].title, "Dentist (moved)");
        assert_eq!(reloaded.reminders[0].time, "14:00");
        assert_eq!(reloaded.todos.len(), 1);

        let removed = store.delete_reminder(&mut doc, "r1").unwrap();
        assert_eq!(removed.id, "r1");
        assert!(store.load().unwrap().reminders.is_empty());
    }

    #[test]
    fn update_of_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("data.json"));
        let mut doc = store.load().unwrap();
        assert!(store.update_reminder(&mut doc, reminder("ghost", "x")).is_err());
        assert!(store.delete_todo(&mut doc, "ghost").is_err());
    }

    #[test]
    fn import_merges_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("data.json"));
        let mut doc = store.load().unwrap();
        store.add_reminder(&mut doc, reminder("r1", "old title")).unwrap();

        let mut backup_doc = Document::default();
        backup_doc.reminders.push(reminder("r1", "new title"));
        backup_doc.reminders.push(reminder("r2", "brand new"));
        backup_doc.todos.push(todo("t9", "from backup"));
        store.export_to(&backup_doc, &dir.path().join("backup.json")).unwrap();

        let (nr, nt) = store
            .import_from(&mut doc, &dir.path().join("backup.json"))
            .unwrap();
        assert_eq!((nr, nt), (2, 1));
        assert_eq!(doc.reminders.len(), 2);
        assert_eq!(
            doc.reminders.iter().find(|r| r.id == "r1").unwrap().title,
            "new title"
        );
        assert_eq!(doc.todos.len(), 1);
    }

    #[test]
    fn persisted_shape_uses_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("data.json"));
        let mut doc = store.load().unwrap();
        store.add_reminder(&mut doc, reminder("r1", "Dentist")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"isCompleted\""));
    }
}

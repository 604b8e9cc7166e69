#[cfg(test)]
mod tests {
    use crate::record::{CollectionName, Fields, Record};
    use crate::storage::json::JsonStore;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::load(temp_dir.path().join("db.json"));
        assert_eq!(store.path(), temp_dir.path().join("db.json"));
        for c in CollectionName::ALL {
            assert!(store.list(c).is_empty());
        }
        assert!(!temp_dir.path().join("db.json").exists());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(&path, b"{ \"actors\": [ {\"name\": ").unwrap();
        let store = JsonStore::load(&path);
        assert!(store.list(CollectionName::Actors).is_empty());
    }

    #[test]
    fn absent_collections_default_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(&path, r#"{"actors":[{"id":"1","name":"Alice"}]}"#).unwrap();
        let store = JsonStore::load(&path);
        assert_eq!(store.list(CollectionName::Actors).len(), 1);
        assert!(store.list(CollectionName::AcceptanceCriteria).is_empty());
    }

    #[test]
    fn insert_assigns_unique_ids_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        let mut store = JsonStore::load(&path);

        let a = store
            .insert(CollectionName::Actors, fields(json!({"name": "Alice", "type": "Hero"})))
            .unwrap();
        let b = store
            .insert(CollectionName::Actors, fields(json!({"name": "Bob", "type": "Villain"})))
            .unwrap();
        assert!(a.id().is_some());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.display_value("name"), "Alice");

        let reloaded = JsonStore::load(&path);
        let actors = reloaded.list(CollectionName::Actors);
        assert_eq!(actors, &[a, b]);
        assert!(reloaded.list(CollectionName::Requirements).is_empty());

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw["acceptanceCriteria"].is_array());
    }

    #[test]
    fn replace_keeps_id_and_swaps_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        let mut store = JsonStore::load(&path);
        let created = store
            .insert(CollectionName::Requirements, fields(json!({"name": "Login", "type": "Functional"})))
            .unwrap();
        let id = created.id().unwrap().to_string();

        let updated = store
            .replace(
                CollectionName::Requirements,
                &id,
                fields(json!({"id": "hijack", "name": "Logout"})),
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.id(), Some(id.as_str()));
        assert_eq!(updated.display_value("name"), "Logout");
        assert!(updated.get("type").is_none());

        let reloaded = JsonStore::load(&path);
        assert_eq!(reloaded.get(CollectionName::Requirements, &id), Some(&updated));
        assert!(reloaded.get(CollectionName::Requirements, "hijack").is_none());
    }

    #[test]
    fn remove_deletes_only_the_matching_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        let mut store = JsonStore::load(&path);
        let keep = store
            .insert(CollectionName::Actors, fields(json!({"name": "Keep"})))
            .unwrap();
        let gone = store
            .insert(CollectionName::Actors, fields(json!({"name": "Gone"})))
            .unwrap();

        let removed = store
            .remove(CollectionName::Actors, gone.id().unwrap())
            .unwrap();
        assert_eq!(removed, Some(gone));
        assert_eq!(JsonStore::load(&path).list(CollectionName::Actors), &[keep]);
    }

    #[test]
    fn missing_id_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        let mut store = JsonStore::load(&path);
        store
            .insert(CollectionName::Actors, fields(json!({"name": "Alice"})))
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        assert!(store.remove(CollectionName::Actors, "42").unwrap().is_none());
        assert!(store
            .replace(CollectionName::Actors, "42", fields(json!({"name": "x"})))
            .unwrap()
            .is_none());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn legacy_records_without_id_are_kept_but_unaddressable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(&path, r#"{"actors":[{"name":"Alice","type":"Hero"}]}"#).unwrap();
        let store = JsonStore::load(&path);
        let actors = store.list(CollectionName::Actors);
        let expected: Record = serde_json::from_value(json!({"name": "Alice", "type": "Hero"})).unwrap();
        assert_eq!(actors, &[expected]);
        assert_eq!(actors[0].id(), None);
    }

    #[test]
    fn failed_write_rolls_back_memory() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be written as a file.
        let mut store = JsonStore::load(temp_dir.path());
        let result = store.insert(CollectionName::Actors, fields(json!({"name": "Alice"})));
        assert!(result.is_err());
        assert!(store.list(CollectionName::Actors).is_empty());
    }
}

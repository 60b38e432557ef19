use super::*;
use crate::persist::clock::FixedClock;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn snapshot() -> SessionSnapshot {
    SessionSnapshot {
        original_image: Some("data:image/png;base64,AAAA".to_string()),
        mask_image: None,
        result_image: None,
        settings: GenerationSettings::default().with_prompt("sky"),
        brush_size: 20.0,
        selection_mode: Tool::Lasso,
        canvas_data: None,
        timestamp: 0,
    }
}

#[test]
fn save_then_load_within_window() {
    let storage = MemoryStorage::new();
    let clock = FixedClock::at(1_000);
    let p = SessionPersistence::new(&storage, &clock, DAY);

    p.save(&snapshot()).unwrap();
    clock.advance(DAY - Duration::from_secs(1));
    let loaded = p.load().unwrap().unwrap();
    assert_eq!(loaded.timestamp, 1_000);
    assert_eq!(loaded.selection_mode, Tool::Lasso);
    assert_eq!(loaded.settings.prompt, "sky");
}

#[test]
fn expired_snapshot_is_removed() {
    let storage = MemoryStorage::new();
    let clock = FixedClock::at(0);
    let p = SessionPersistence::new(&storage, &clock, DAY);

    p.save(&snapshot()).unwrap();
    clock.advance(DAY);
    assert_eq!(p.load().unwrap(), None);
    assert!(!storage.contains(SNAPSHOT_KEY));
}

#[test]
fn corrupt_snapshot_is_removed() {
    let storage = MemoryStorage::new();
    storage.set(SNAPSHOT_KEY, "{not json").unwrap();
    let p = SessionPersistence::new(&storage, FixedClock::at(0), DAY);
    assert_eq!(p.load().unwrap(), None);
    assert!(!storage.contains(SNAPSHOT_KEY));
}

#[test]
fn snapshot_uses_camel_case_keys() {
    let json = serde_json::to_value(snapshot()).unwrap();
    assert!(json.get("originalImage").is_some());
    assert!(json.get("brushSize").is_some());
    assert_eq!(json["selectionMode"], "lasso");
    assert!(snapshot().has_content());
}

#[test]
fn file_storage_round_trip() {
    let dir = std::env::temp_dir().join(format!("wildmind-store-{}", std::process::id()));
    let storage = FileStorage::new(&dir);
    assert_eq!(storage.get("k").unwrap(), None);
    storage.set("k", "v1").unwrap();
    storage.set("k", "v2").unwrap();
    assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
    storage.remove("k").unwrap();
    storage.remove("k").unwrap();
    assert_eq!(storage.get("k").unwrap(), None);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn from_opts_persists_under_configured_dir() {
    let dir = std::env::temp_dir().join(format!("wildmind-opts-{}", std::process::id()));
    let opts = SessionOpts {
        dir: dir.clone(),
        max_age_secs: 60,
    };
    let p = SessionPersistence::from_opts(&opts);
    p.save(&snapshot()).unwrap();
    assert!(dir.join(format!("{SNAPSHOT_KEY}.json")).exists());
    assert!(p.load().unwrap().is_some());
    p.clear().unwrap();
    assert!(p.load().unwrap().is_none());
    std::fs::remove_dir_all(&dir).unwrap();
}

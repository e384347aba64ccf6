use std::path::PathBuf;

use uuid::Uuid;
use volunteer_access::storage::{DurableStorage, FileStorage, MemoryStorage};

/// A fresh, not-yet-created directory under the system temp dir.
fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("volunteer-access-test-{}", Uuid::new_v4()))
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("volunteer-user").unwrap(), None);

        storage.write("volunteer-user", "{\"a\":1}").unwrap();
        assert_eq!(storage.read("volunteer-user").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.remove("volunteer-user").unwrap();
        assert_eq!(storage.read("volunteer-user").unwrap(), None);
    }

    #[test]
    fn test_memory_failure() {
        let storage = MemoryStorage::new_failing();
        assert!(storage.write("volunteer-user", "x").is_err());
        assert!(storage.remove("volunteer-user").is_err());
        // Reads still work on a failing store.
        assert!(storage.read("volunteer-user").is_ok());
    }

    #[test]
    fn test_memory_seeded_record() {
        let storage = MemoryStorage::with_record("volunteer-user", "{not-json");
        assert_eq!(storage.read("volunteer-user").unwrap().as_deref(), Some("{not-json"));
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[test]
    fn test_file_round_trip() {
        let dir = scratch_dir();
        let storage = FileStorage::new(&dir);

        // Nothing on disk until the first write.
        assert!(!dir.exists());
        assert_eq!(storage.read("volunteer-user").unwrap(), None);

        storage.write("volunteer-user", "first").unwrap();
        storage.write("volunteer-user", "second").unwrap();
        assert_eq!(storage.read("volunteer-user").unwrap().as_deref(), Some("second"));
        assert!(dir.join("volunteer-user.json").exists());

        storage.remove("volunteer-user").unwrap();
        assert_eq!(storage.read("volunteer-user").unwrap(), None);
        // Removing twice is fine.
        storage.remove("volunteer-user").unwrap();

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_survives_new_handle() {
        let dir = scratch_dir();
        FileStorage::new(&dir).write("volunteer-user", "kept").unwrap();

        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.read("volunteer-user").unwrap().as_deref(), Some("kept"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_key_sanitization() {
        let dir = scratch_dir();
        let storage = FileStorage::new(&dir);

        storage.write("../../etc/passwd", "contained").unwrap();

        // The record lands inside the storage directory, never outside it.
        assert!(dir.join("etc_passwd.json").exists());
        assert_eq!(storage.read("../../etc/passwd").unwrap().as_deref(), Some("contained"));

        assert!(storage.write("../..", "nope").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}

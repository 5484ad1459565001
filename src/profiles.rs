// Profile manager - create, list, apply and delete named device pairs

use anyhow::Result;
use log::{info, warn};

use crate::devices::{AudioDevice, DeviceDirectory, DeviceKind};
use crate::store::{Profile, ProfileStore};

/// What `create` did with the submitted profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// Same-named entry removed, new one appended
    Replaced,
    /// Name taken and overwrite not allowed; nothing was saved
    Exists,
}

/// Result of applying one role of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleResult {
    pub device_name: String,
    pub succeeded: bool,
    /// Failure reason when `succeeded` is false
    pub detail: Option<String>,
}

/// Aggregated classification of an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    Full,
    Partial,
    Failed,
}

/// Per-role results of applying a profile. The roles are attempted
/// independently; one failing never aborts the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub playback: RoleResult,
    pub recording: RoleResult,
}

impl ApplyOutcome {
    pub fn status(&self) -> ApplyStatus {
        match (self.playback.succeeded, self.recording.succeeded) {
            (true, true) => ApplyStatus::Full,
            (false, false) => ApplyStatus::Failed,
            _ => ApplyStatus::Partial,
        }
    }
}

/// Orchestrates profile operations over the store and the live directory.
/// Holds no state of its own; the store file is re-read on every call.
pub struct ProfileManager<'a> {
    store: ProfileStore,
    directory: &'a dyn DeviceDirectory,
}

impl<'a> ProfileManager<'a> {
    pub fn new(store: ProfileStore, directory: &'a dyn DeviceDirectory) -> Self {
        Self { store, directory }
    }

    /// The stored sequence, verbatim. Does not consult the directory.
    pub fn list(&self) -> Vec<Profile> {
        self.store.load()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store.load().iter().any(|p| p.name == name)
    }

    /// Save a profile. When the name is already taken, `overwrite`
    /// decides between replacing (remove old entry, append new) and a
    /// no-op `Exists` answer. A failed save leaves the file untouched.
    pub fn create(&self, profile: Profile, overwrite: bool) -> Result<CreateOutcome> {
        let mut profiles = self.store.load();
        let taken = profiles.iter().any(|p| p.name == profile.name);

        if taken && !overwrite {
            return Ok(CreateOutcome::Exists);
        }

        profiles.retain(|p| p.name != profile.name);
        let name = profile.name.clone();
        profiles.push(profile);
        self.store.save(&profiles)?;

        if taken {
            info!("Replaced profile '{}'", name);
            Ok(CreateOutcome::Replaced)
        } else {
            info!("Created profile '{}'", name);
            Ok(CreateOutcome::Created)
        }
    }

    /// Remove every entry with this name (hand-edited stores may hold
    /// duplicates). Returns how many were removed; confirmation is the
    /// caller's job.
    pub fn delete(&self, name: &str) -> Result<usize> {
        let mut profiles = self.store.load();
        let before = profiles.len();
        profiles.retain(|p| p.name != name);
        let removed = before - profiles.len();

        if removed > 0 {
            self.store.save(&profiles)?;
            info!("Deleted {} stored entries named '{}'", removed, name);
        }
        Ok(removed)
    }

    /// Set both of the profile's devices as the current defaults,
    /// reconciling the saved ids against the live directory. Each role is
    /// scored independently; a missing id fails that role without a
    /// set-default attempt.
    pub fn apply(&self, profile: &Profile) -> ApplyOutcome {
        ApplyOutcome {
            playback: self.apply_role(
                DeviceKind::Playback,
                &profile.playback_device_id,
                &profile.playback_device_name,
            ),
            recording: self.apply_role(
                DeviceKind::Recording,
                &profile.recording_device_id,
                &profile.recording_device_name,
            ),
        }
    }

    fn apply_role(&self, kind: DeviceKind, id: &str, name: &str) -> RoleResult {
        if !self.directory.exists(id, kind) {
            warn!("Saved {} device '{}' is no longer present", kind, name);
            return RoleResult {
                device_name: name.to_string(),
                succeeded: false,
                detail: Some("device is no longer present".to_string()),
            };
        }

        let device = AudioDevice {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            is_default: false,
        };

        match self.directory.set_default(&device) {
            Ok(()) => RoleResult {
                device_name: name.to_string(),
                succeeded: true,
                detail: None,
            },
            Err(e) => {
                warn!("Could not set default {} device '{}': {:#}", kind, name, e);
                RoleResult {
                    device_name: name.to_string(),
                    succeeded: false,
                    detail: Some(format!("{:#}", e)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// In-memory directory: a fixed device list, recorded set calls, and
    /// an optional list of ids the OS refuses to switch to.
    struct MockDirectory {
        devices: Vec<AudioDevice>,
        rejected: Vec<String>,
        set_calls: RefCell<Vec<String>>,
    }

    impl MockDirectory {
        fn new(devices: Vec<AudioDevice>) -> Self {
            Self {
                devices,
                rejected: Vec::new(),
                set_calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl DeviceDirectory for MockDirectory {
        fn enumerate(&self, kind: DeviceKind) -> Result<Vec<AudioDevice>> {
            Ok(self
                .devices
                .iter()
                .filter(|d| d.kind == kind)
                .cloned()
                .collect())
        }

        fn default_device(&self, kind: DeviceKind) -> Option<AudioDevice> {
            self.devices
                .iter()
                .find(|d| d.kind == kind && d.is_default)
                .cloned()
        }

        fn set_default(&self, device: &AudioDevice) -> Result<()> {
            self.set_calls.borrow_mut().push(device.id.clone());
            if self.rejected.contains(&device.id) {
                Err(anyhow!("rejected by the OS"))
            } else {
                Ok(())
            }
        }
    }

    fn device(id: &str, kind: DeviceKind) -> AudioDevice {
        AudioDevice {
            id: id.to_string(),
            name: format!("{} device", id),
            kind,
            is_default: false,
        }
    }

    fn profile(name: &str, playback: &str, recording: &str) -> Profile {
        Profile {
            name: name.to_string(),
            playback_device_id: playback.to_string(),
            playback_device_name: format!("{} device", playback),
            recording_device_id: recording.to_string(),
            recording_device_name: format!("{} device", recording),
        }
    }

    fn manager_in<'a>(dir: &TempDir, directory: &'a MockDirectory) -> ProfileManager<'a> {
        let store = ProfileStore::new(dir.path().join("audioprofiles.json"));
        ProfileManager::new(store, directory)
    }

    #[test]
    fn test_create_appends_and_lists_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let manager = manager_in(&dir, &directory);

        assert_eq!(
            manager.create(profile("Work", "A", "B"), false).unwrap(),
            CreateOutcome::Created
        );
        assert_eq!(
            manager.create(profile("Gaming", "C", "D"), false).unwrap(),
            CreateOutcome::Created
        );

        let names: Vec<_> = manager.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Work", "Gaming"]);
    }

    #[test]
    fn test_create_existing_name_without_overwrite_is_noop() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let manager = manager_in(&dir, &directory);

        manager.create(profile("Work", "A", "B"), false).unwrap();
        assert_eq!(
            manager.create(profile("Work", "C", "D"), false).unwrap(),
            CreateOutcome::Exists
        );

        let stored = manager.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].playback_device_id, "A");
    }

    #[test]
    fn test_overwrite_replaces_fully_and_moves_to_append_position() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let manager = manager_in(&dir, &directory);

        manager.create(profile("Work", "A", "B"), false).unwrap();
        manager.create(profile("Gaming", "X", "Y"), false).unwrap();
        assert_eq!(
            manager.create(profile("Work", "C", "D"), true).unwrap(),
            CreateOutcome::Replaced
        );

        let stored = manager.list();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Gaming");
        assert_eq!(stored[1].name, "Work");
        assert_eq!(stored[1].playback_device_id, "C");
        assert_eq!(stored[1].recording_device_id, "D");
    }

    #[test]
    fn test_names_stay_unique_across_create_overwrite_delete() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let manager = manager_in(&dir, &directory);

        manager.create(profile("Work", "A", "B"), false).unwrap();
        manager.create(profile("Work", "C", "D"), true).unwrap();
        manager.create(profile("Work", "E", "F"), true).unwrap();

        let stored = manager.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].playback_device_id, "E");

        assert_eq!(manager.delete("Work").unwrap(), 1);
        assert!(manager.list().is_empty());
    }

    #[test]
    fn test_delete_removes_all_same_named_entries() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let store = ProfileStore::new(dir.path().join("audioprofiles.json"));
        // Simulate a hand-edited store holding duplicates
        store
            .save(&[
                profile("Work", "A", "B"),
                profile("Other", "X", "Y"),
                profile("Work", "C", "D"),
            ])
            .unwrap();
        let manager = ProfileManager::new(store, &directory);

        assert_eq!(manager.delete("Work").unwrap(), 2);
        let names: Vec<_> = manager.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Other"]);
    }

    #[test]
    fn test_delete_unknown_name_removes_nothing() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let manager = manager_in(&dir, &directory);

        manager.create(profile("Work", "A", "B"), false).unwrap();
        assert_eq!(manager.delete("Nope").unwrap(), 0);
        assert_eq!(manager.list().len(), 1);
    }

    #[test]
    fn test_apply_both_present_is_full_success() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(vec![
            device("A", DeviceKind::Playback),
            device("B", DeviceKind::Recording),
        ]);
        let manager = manager_in(&dir, &directory);

        let outcome = manager.apply(&profile("Work", "A", "B"));
        assert_eq!(outcome.status(), ApplyStatus::Full);
        assert!(outcome.playback.succeeded);
        assert!(outcome.recording.succeeded);
        assert_eq!(*directory.set_calls.borrow(), vec!["A", "B"]);
    }

    #[test]
    fn test_apply_missing_recording_device_is_partial() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(vec![device("A", DeviceKind::Playback)]);
        let manager = manager_in(&dir, &directory);

        let outcome = manager.apply(&profile("Work", "A", "B"));
        assert_eq!(outcome.status(), ApplyStatus::Partial);
        assert!(outcome.playback.succeeded);
        assert!(!outcome.recording.succeeded);
        // Only the present device gets a set-default attempt
        assert_eq!(*directory.set_calls.borrow(), vec!["A"]);
    }

    #[test]
    fn test_apply_neither_present_is_failure_with_no_set_attempts() {
        let dir = TempDir::new().unwrap();
        let directory = MockDirectory::new(Vec::new());
        let manager = manager_in(&dir, &directory);

        let outcome = manager.apply(&profile("Work", "A", "B"));
        assert_eq!(outcome.status(), ApplyStatus::Failed);
        assert!(directory.set_calls.borrow().is_empty());
    }

    #[test]
    fn test_apply_os_rejection_scores_like_missing_device() {
        let dir = TempDir::new().unwrap();
        let mut directory = MockDirectory::new(vec![
            device("A", DeviceKind::Playback),
            device("B", DeviceKind::Recording),
        ]);
        directory.rejected.push("B".to_string());
        let manager = manager_in(&dir, &directory);

        let outcome = manager.apply(&profile("Work", "A", "B"));
        assert_eq!(outcome.status(), ApplyStatus::Partial);
        assert!(outcome.recording.detail.is_some());
        // The rejected role was still attempted independently
        assert_eq!(*directory.set_calls.borrow(), vec!["A", "B"]);
    }

    #[test]
    fn test_kind_scoped_existence_check() {
        let dir = TempDir::new().unwrap();
        // "A" exists only as a recording device; the playback role must
        // not match it.
        let directory = MockDirectory::new(vec![device("A", DeviceKind::Recording)]);
        let manager = manager_in(&dir, &directory);

        let outcome = manager.apply(&profile("Work", "A", "A"));
        assert!(!outcome.playback.succeeded);
        assert!(outcome.recording.succeeded);
    }
}

// Audio device management module
// Device model plus the directory abstraction over the OS endpoint list

pub mod platform;
pub mod system;

pub use system::SystemDirectory;

use anyhow::Result;
use std::fmt;

/// The two device roles the OS keeps a default for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Playback,
    Recording,
}

impl DeviceKind {
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Playback => "playback",
            DeviceKind::Recording => "recording",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A live audio endpoint as reported by the directory.
///
/// Re-queried on every listing; never cached across menu actions.
/// Persistence goes through `store::Profile`, which snapshots the id and
/// name as plain strings, so this type never crosses serde.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDevice {
    /// Opaque stable identifier understood by the platform switcher
    pub id: String,
    /// Human-readable name of the device (not guaranteed unique)
    pub name: String,
    pub kind: DeviceKind,
    /// Whether this is the current system default for its kind
    pub is_default: bool,
}

/// Access to the OS view of audio endpoints: enumeration, default lookup
/// and the command that changes the current default.
pub trait DeviceDirectory {
    /// List all endpoints of the given kind, fresh from the OS.
    fn enumerate(&self, kind: DeviceKind) -> Result<Vec<AudioDevice>>;

    /// The current default endpoint of the given kind, if the OS has one.
    fn default_device(&self, kind: DeviceKind) -> Option<AudioDevice>;

    /// Make the given endpoint the system default for its kind.
    fn set_default(&self, device: &AudioDevice) -> Result<()>;

    /// Whether an endpoint with this id is currently present.
    fn exists(&self, id: &str, kind: DeviceKind) -> bool {
        self.enumerate(kind)
            .map(|devices| devices.iter().any(|d| d.id == id))
            .unwrap_or(false)
    }
}

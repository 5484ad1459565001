// audioprofiles core
// Device directory, profile persistence, selection prompts and the menus.

pub mod devices;
pub mod menu;
pub mod profiles;
pub mod selector;
pub mod store;

pub use devices::{AudioDevice, DeviceDirectory, DeviceKind, SystemDirectory};
pub use profiles::{ApplyOutcome, ApplyStatus, CreateOutcome, ProfileManager};
pub use selector::Selection;
pub use store::{Profile, ProfileStore};

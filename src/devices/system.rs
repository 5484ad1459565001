// cpal-backed device directory
// Enumeration and default lookup come from the cpal host; changing the
// default is delegated to the platform switching helper.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use log::warn;

use super::platform;
use super::{AudioDevice, DeviceDirectory, DeviceKind};

/// Directory over the live cpal host plus the platform switcher.
pub struct SystemDirectory;

impl SystemDirectory {
    pub fn new() -> Self {
        Self
    }

    fn host() -> cpal::Host {
        #[cfg(target_os = "windows")]
        {
            // Prefer WASAPI on Windows, fall back to the default host
            if let Ok(host) = cpal::host_from_id(cpal::HostId::Wasapi) {
                return host;
            }
        }
        cpal::default_host()
    }

    fn default_name(host: &cpal::Host, kind: DeviceKind) -> Option<String> {
        let device = match kind {
            DeviceKind::Playback => host.default_output_device(),
            DeviceKind::Recording => host.default_input_device(),
        };
        device.and_then(|d| d.name().ok())
    }
}

impl Default for SystemDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDirectory for SystemDirectory {
    fn enumerate(&self, kind: DeviceKind) -> Result<Vec<AudioDevice>> {
        let host = Self::host();
        let default_name = Self::default_name(&host, kind);

        let devices: Box<dyn Iterator<Item = cpal::Device>> = match kind {
            DeviceKind::Playback => Box::new(
                host.output_devices()
                    .map_err(|e| anyhow!("Failed to enumerate {} devices: {}", kind, e))?,
            ),
            DeviceKind::Recording => Box::new(
                host.input_devices()
                    .map_err(|e| anyhow!("Failed to enumerate {} devices: {}", kind, e))?,
            ),
        };

        let listed = devices
            .filter_map(|device| {
                let name = match device.name() {
                    Ok(name) => name,
                    Err(e) => {
                        warn!("Skipping a {} device with an unreadable name: {}", kind, e);
                        return None;
                    }
                };
                let is_default = default_name.as_deref() == Some(name.as_str());
                // cpal exposes the endpoint name as its only stable handle,
                // and the platform switchers address devices by that same
                // string, so it doubles as the id.
                Some(AudioDevice {
                    id: name.clone(),
                    name,
                    kind,
                    is_default,
                })
            })
            .collect();

        Ok(listed)
    }

    fn default_device(&self, kind: DeviceKind) -> Option<AudioDevice> {
        let host = Self::host();
        let name = Self::default_name(&host, kind)?;
        Some(AudioDevice {
            id: name.clone(),
            name,
            kind,
            is_default: true,
        })
    }

    fn set_default(&self, device: &AudioDevice) -> Result<()> {
        platform::set_default(device)
    }
}

// Platform switching layer
// The OS-level command that actually changes the default device, plus the
// startup probe that checks the required helper is installed.

use anyhow::{anyhow, Result};
use log::info;
use std::process::Command;

use super::{AudioDevice, DeviceKind};

/// Check that the platform's device-switching facility is available.
///
/// The error message names the install step, so callers can print it
/// verbatim as the remedy.
#[cfg(target_os = "linux")]
pub fn probe() -> Result<()> {
    which::which("pactl").map(|_| ()).map_err(|_| {
        anyhow!(
            "pactl was not found on PATH. Install the PulseAudio utilities \
             (e.g. `sudo apt install pulseaudio-utils`) and run again."
        )
    })
}

#[cfg(target_os = "macos")]
pub fn probe() -> Result<()> {
    which::which("SwitchAudioSource").map(|_| ()).map_err(|_| {
        anyhow!(
            "SwitchAudioSource was not found on PATH. Install it with \
             `brew install switchaudio-osx` and run again."
        )
    })
}

#[cfg(target_os = "windows")]
pub fn probe() -> Result<()> {
    let output = Command::new("powershell")
        .args([
            "-NoProfile",
            "-Command",
            "Get-Module -ListAvailable AudioDeviceCmdlets",
        ])
        .output()
        .map_err(|e| anyhow!("Failed to run PowerShell: {}", e))?;

    if output.status.success() && !output.stdout.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "The AudioDeviceCmdlets PowerShell module is not installed. Run \
             `Install-Module -Name AudioDeviceCmdlets` in an elevated \
             PowerShell and run again."
        ))
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub fn probe() -> Result<()> {
    Err(anyhow!(
        "Default-device switching is not supported on this platform."
    ))
}

/// Make the given endpoint the current system default for its kind.
pub fn set_default(device: &AudioDevice) -> Result<()> {
    info!(
        "Setting default {} device to '{}'",
        device.kind, device.name
    );

    #[cfg(target_os = "linux")]
    {
        let subcommand = match device.kind {
            DeviceKind::Playback => "set-default-sink",
            DeviceKind::Recording => "set-default-source",
        };
        return run_switcher(
            Command::new("pactl").args([subcommand, device.id.as_str()]),
            device,
        );
    }

    #[cfg(target_os = "macos")]
    {
        let device_type = match device.kind {
            DeviceKind::Playback => "output",
            DeviceKind::Recording => "input",
        };
        return run_switcher(
            Command::new("SwitchAudioSource").args(["-t", device_type, "-s", device.id.as_str()]),
            device,
        );
    }

    #[cfg(target_os = "windows")]
    {
        let script = format!("Set-AudioDevice -ID '{}'", device.id.replace('\'', "''"));
        return run_switcher(
            Command::new("powershell").args(["-NoProfile", "-Command", &script]),
            device,
        );
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        return Err(anyhow!(
            "Default-device switching is not supported on this platform."
        ));
    }
}


#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
fn run_switcher(command: &mut Command, device: &AudioDevice) -> Result<()> {
    let output = command
        .output()
        .map_err(|e| anyhow!("Failed to run the device switcher: {}", e))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!(
            "The OS rejected switching the default {} device to '{}': {}",
            device.kind,
            device.name,
            stderr.trim()
        ))
    }
}

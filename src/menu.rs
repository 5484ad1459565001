// Interactive menu loops
// Top-level device actions plus the advanced profile submenu. Every action
// runs to completion before the menu re-renders; interactive mistakes only
// ever re-prompt.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::warn;

use crate::devices::{DeviceDirectory, DeviceKind};
use crate::profiles::{ApplyStatus, CreateOutcome, ProfileManager, RoleResult};
use crate::selector::{self, Selection};
use crate::store::Profile;

/// Run the top-level menu until the user quits or input ends.
pub fn run<R: BufRead, W: Write>(
    manager: &ProfileManager,
    directory: &dyn DeviceDirectory,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out)?;
        writeln!(out, "=== Audio Device Switcher ===")?;
        writeln!(out, "  1. List playback devices")?;
        writeln!(out, "  2. List recording devices")?;
        writeln!(out, "  3. Switch default playback device")?;
        writeln!(out, "  4. Switch default recording device")?;
        writeln!(out, "  5. Advanced settings (profiles)")?;
        writeln!(out, "  Q. Quit")?;

        let choice = match read_line("Choice: ", input, out)? {
            Some(line) => line,
            None => break,
        };

        match choice.trim() {
            "1" => list_devices(directory, DeviceKind::Playback, out)?,
            "2" => list_devices(directory, DeviceKind::Recording, out)?,
            "3" => switch_default(directory, DeviceKind::Playback, input, out)?,
            "4" => switch_default(directory, DeviceKind::Recording, input, out)?,
            "5" => run_advanced(manager, directory, input, out)?,
            "q" | "Q" => break,
            other => writeln!(out, "Unrecognized choice '{}'. Enter 1-5 or Q.", other)?,
        }
    }
    Ok(())
}

/// The advanced settings submenu: profile management.
fn run_advanced<R: BufRead, W: Write>(
    manager: &ProfileManager,
    directory: &dyn DeviceDirectory,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out)?;
        writeln!(out, "--- Advanced settings ---")?;
        writeln!(out, "  1. Create profile")?;
        writeln!(out, "  2. List profiles")?;
        writeln!(out, "  3. Apply profile")?;
        writeln!(out, "  4. Delete profile")?;
        writeln!(out, "  R. Return to main menu")?;

        let choice = match read_line("Choice: ", input, out)? {
            Some(line) => line,
            None => break,
        };

        match choice.trim() {
            "1" => create_profile(manager, directory, input, out)?,
            "2" => list_profiles(manager, out)?,
            "3" => apply_profile(manager, input, out)?,
            "4" => delete_profile(manager, input, out)?,
            "r" | "R" => break,
            other => writeln!(out, "Unrecognized choice '{}'. Enter 1-4 or R.", other)?,
        }
    }
    Ok(())
}

fn list_devices<W: Write>(
    directory: &dyn DeviceDirectory,
    kind: DeviceKind,
    out: &mut W,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Available {} devices:", kind)?;
    let devices = match directory.enumerate(kind) {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Device enumeration failed: {:#}", e);
            writeln!(out, "Could not list {} devices: {:#}", kind, e)?;
            return Ok(());
        }
    };

    if devices.is_empty() {
        writeln!(out, "  (no {} devices found)", kind)?;
    } else {
        selector::render_device_list(&devices, out)?;
    }
    Ok(())
}

fn switch_default<R: BufRead, W: Write>(
    directory: &dyn DeviceDirectory,
    kind: DeviceKind,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let devices = match directory.enumerate(kind) {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Device enumeration failed: {:#}", e);
            writeln!(out, "Could not list {} devices: {:#}", kind, e)?;
            return Ok(());
        }
    };

    if devices.is_empty() {
        writeln!(out, "No {} devices found.", kind)?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Switch default {} device:", kind)?;
    match selector::prompt_selection(&devices, input, out)? {
        Selection::Cancelled => writeln!(out, "Cancelled.")?,
        Selection::Chosen(index) => {
            let device = &devices[index];
            match directory.set_default(device) {
                Ok(()) => writeln!(out, "Default {} device is now '{}'.", kind, device.name)?,
                Err(e) => {
                    warn!("set_default failed: {:#}", e);
                    writeln!(out, "Could not switch to '{}': {:#}", device.name, e)?;
                }
            }
        }
    }
    Ok(())
}

/// Create a profile: name, then one device per role through the selector.
/// Cancelling either selection aborts with no side effect.
fn create_profile<R: BufRead, W: Write>(
    manager: &ProfileManager,
    directory: &dyn DeviceDirectory,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let name = match prompt_profile_name(input, out)? {
        Some(name) => name,
        None => {
            writeln!(out, "Profile creation cancelled.")?;
            return Ok(());
        }
    };

    let playback = match pick_device(directory, DeviceKind::Playback, input, out)? {
        Some(device) => device,
        None => {
            writeln!(out, "Profile creation cancelled.")?;
            return Ok(());
        }
    };

    let recording = match pick_device(directory, DeviceKind::Recording, input, out)? {
        Some(device) => device,
        None => {
            writeln!(out, "Profile creation cancelled.")?;
            return Ok(());
        }
    };

    let overwrite = if manager.exists(&name) {
        let allowed = confirm(
            &format!("A profile named '{}' already exists. Overwrite it? [y/N]: ", name),
            input,
            out,
        )?;
        if !allowed {
            writeln!(out, "Keeping the existing profile '{}'.", name)?;
            return Ok(());
        }
        true
    } else {
        false
    };

    let profile = Profile {
        name: name.clone(),
        playback_device_id: playback.id,
        playback_device_name: playback.name,
        recording_device_id: recording.id,
        recording_device_name: recording.name,
    };

    match manager.create(profile, overwrite) {
        Ok(CreateOutcome::Created) => writeln!(out, "Profile '{}' saved.", name)?,
        Ok(CreateOutcome::Replaced) => writeln!(out, "Profile '{}' overwritten.", name)?,
        // The name was re-taken between the check and the save; treat it
        // as the declined case.
        Ok(CreateOutcome::Exists) => writeln!(out, "Profile '{}' already exists.", name)?,
        Err(e) => {
            warn!("Saving profile failed: {:#}", e);
            writeln!(out, "Could not save profile '{}': {:#}", name, e)?;
        }
    }
    Ok(())
}

fn list_profiles<W: Write>(manager: &ProfileManager, out: &mut W) -> Result<()> {
    let profiles = manager.list();
    writeln!(out)?;
    if profiles.is_empty() {
        writeln!(out, "No profiles saved yet.")?;
        return Ok(());
    }

    writeln!(out, "Saved profiles:")?;
    render_profile_list(&profiles, out)?;
    Ok(())
}

fn apply_profile<R: BufRead, W: Write>(
    manager: &ProfileManager,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let profiles = manager.list();
    if profiles.is_empty() {
        writeln!(out, "No profiles saved yet.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Apply a profile:")?;
    render_profile_list(&profiles, out)?;

    let profile = match prompt_profile_choice(&profiles, input, out)? {
        Some(profile) => profile,
        None => {
            writeln!(out, "Cancelled.")?;
            return Ok(());
        }
    };

    let outcome = manager.apply(profile);
    report_role(&outcome.playback, DeviceKind::Playback, out)?;
    report_role(&outcome.recording, DeviceKind::Recording, out)?;
    match outcome.status() {
        ApplyStatus::Full => writeln!(out, "Profile '{}' applied.", profile.name)?,
        ApplyStatus::Partial => writeln!(
            out,
            "Profile '{}' applied partially; see the role results above.",
            profile.name
        )?,
        ApplyStatus::Failed => writeln!(out, "Profile '{}' could not be applied.", profile.name)?,
    }
    Ok(())
}

fn delete_profile<R: BufRead, W: Write>(
    manager: &ProfileManager,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let profiles = manager.list();
    if profiles.is_empty() {
        writeln!(out, "No profiles saved yet.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Delete a profile:")?;
    render_profile_list(&profiles, out)?;

    let profile = match prompt_profile_choice(&profiles, input, out)? {
        Some(profile) => profile,
        None => {
            writeln!(out, "Cancelled.")?;
            return Ok(());
        }
    };

    let confirmed = confirm(
        &format!("Delete profile '{}'? [y/N]: ", profile.name),
        input,
        out,
    )?;
    if !confirmed {
        writeln!(out, "Keeping profile '{}'.", profile.name)?;
        return Ok(());
    }

    match manager.delete(&profile.name) {
        Ok(1) => writeln!(out, "Profile '{}' deleted.", profile.name)?,
        Ok(removed) => writeln!(out, "Removed {} entries named '{}'.", removed, profile.name)?,
        Err(e) => {
            warn!("Deleting profile failed: {:#}", e);
            writeln!(out, "Could not delete '{}': {:#}", profile.name, e)?;
        }
    }
    Ok(())
}

// -- prompt helpers ---------------------------------------------------------

/// Prompt and read one line. `None` means end of input.
fn read_line<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Non-empty profile name; whitespace-only input re-prompts. `None` only
/// on end of input.
fn prompt_profile_name<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    loop {
        let line = match read_line("Profile name: ", input, out)? {
            Some(line) => line,
            None => return Ok(None),
        };
        let name = line.trim();
        if name.is_empty() {
            writeln!(out, "The profile name cannot be empty.")?;
            continue;
        }
        return Ok(Some(name.to_string()));
    }
}

/// Enumerate the given kind fresh and run the selection prompt. `None`
/// means the user cancelled (or the list could not be produced).
fn pick_device<R: BufRead, W: Write>(
    directory: &dyn DeviceDirectory,
    kind: DeviceKind,
    input: &mut R,
    out: &mut W,
) -> Result<Option<crate::devices::AudioDevice>> {
    let devices = match directory.enumerate(kind) {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Device enumeration failed: {:#}", e);
            writeln!(out, "Could not list {} devices: {:#}", kind, e)?;
            return Ok(None);
        }
    };

    if devices.is_empty() {
        writeln!(out, "No {} devices found.", kind)?;
        return Ok(None);
    }

    writeln!(out, "Choose the {} device:", kind)?;
    match selector::prompt_selection(&devices, input, out)? {
        Selection::Cancelled => Ok(None),
        Selection::Chosen(index) => Ok(Some(devices[index].clone())),
    }
}

fn prompt_profile_choice<'p, R: BufRead, W: Write>(
    profiles: &'p [Profile],
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<&'p Profile>> {
    loop {
        let line = match read_line("Select a profile (0 to cancel): ", input, out)? {
            Some(line) => line,
            None => return Ok(None),
        };
        match selector::parse_selection(&line, profiles.len()) {
            Some(Selection::Cancelled) => return Ok(None),
            Some(Selection::Chosen(index)) => return Ok(Some(&profiles[index])),
            None => {
                writeln!(
                    out,
                    "Invalid choice. Enter a number between 0 and {}.",
                    profiles.len()
                )?;
            }
        }
    }
}

fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, out: &mut W) -> io::Result<bool> {
    let answer = match read_line(prompt, input, out)? {
        Some(line) => line,
        None => return Ok(false),
    };
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_profile_list<W: Write>(profiles: &[Profile], out: &mut W) -> io::Result<()> {
    for (index, profile) in profiles.iter().enumerate() {
        writeln!(
            out,
            "  {}. {}  (playback: {}, recording: {})",
            index + 1,
            profile.name,
            profile.playback_device_name,
            profile.recording_device_name
        )?;
    }
    Ok(())
}

fn report_role<W: Write>(result: &RoleResult, kind: DeviceKind, out: &mut W) -> io::Result<()> {
    if result.succeeded {
        writeln!(out, "  {}: '{}' set as default.", kind, result.device_name)
    } else {
        writeln!(
            out,
            "  {}: '{}' failed ({}).",
            kind,
            result.device_name,
            result.detail.as_deref().unwrap_or("unknown reason")
        )
    }
}

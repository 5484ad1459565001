// Device selection prompt
// Enumerated 1-based listing with "0 to cancel"; invalid input re-prompts.

use std::io::{self, BufRead, Write};

use crate::devices::AudioDevice;

/// Result of a selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 0-based index into the listed sequence
    Chosen(usize),
    Cancelled,
}

/// Parse one line of selection input against a list of `count` entries.
///
/// `"0"` cancels; an integer in `[1, count]` picks (returned 0-based).
/// Anything else is `None` and the caller should re-prompt.
pub fn parse_selection(input: &str, count: usize) -> Option<Selection> {
    match input.trim().parse::<usize>() {
        Ok(0) => Some(Selection::Cancelled),
        Ok(n) if n <= count => Some(Selection::Chosen(n - 1)),
        _ => None,
    }
}

/// Print devices 1-to-N in the order given, marking the current default.
pub fn render_device_list(devices: &[AudioDevice], out: &mut impl Write) -> io::Result<()> {
    for (index, device) in devices.iter().enumerate() {
        let marker = if device.is_default {
            "  [current default]"
        } else {
            ""
        };
        writeln!(out, "  {}. {}{}", index + 1, device.name, marker)?;
    }
    Ok(())
}

/// Interactive selection loop over an already-listed device sequence.
///
/// Re-prompts on non-numeric or out-of-range input and never gives up on
/// its own; end of input is treated as cancellation so piped input
/// terminates.
pub fn prompt_selection(
    devices: &[AudioDevice],
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Selection> {
    render_device_list(devices, out)?;
    loop {
        write!(out, "Select a device (0 to cancel): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Selection::Cancelled);
        }

        match parse_selection(&line, devices.len()) {
            Some(selection) => return Ok(selection),
            None => {
                writeln!(
                    out,
                    "Invalid choice. Enter a number between 0 and {}.",
                    devices.len()
                )?;
            }
        }
    }
}

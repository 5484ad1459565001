// audioprofiles - interactive default-audio-device switcher

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{info, warn};

use audioprofiles::devices::{platform, SystemDirectory};
use audioprofiles::menu;
use audioprofiles::profiles::ProfileManager;
use audioprofiles::store::ProfileStore;

const PROFILE_FILE: &str = "audioprofiles.json";

/// The profile file lives next to the executable; if that directory
/// cannot be determined, fall back to the current working directory.
fn profile_file_path() -> PathBuf {
    match std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
    {
        Some(dir) => dir.join(PROFILE_FILE),
        None => {
            warn!(
                "Could not determine the executable directory; keeping {} in the current directory",
                PROFILE_FILE
            );
            PathBuf::from(PROFILE_FILE)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    if let Err(e) = platform::probe() {
        eprintln!("Audio device control is unavailable: {:#}", e);
        return ExitCode::from(1);
    }

    let directory = SystemDirectory::new();
    let store = ProfileStore::new(profile_file_path());
    info!("Using profile file {:?}", store.path());
    let manager = ProfileManager::new(store, &directory);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    // Runtime problems are reported inside the loop and never abort the
    // process; only losing the terminal itself lands here.
    if let Err(e) = menu::run(&manager, &directory, &mut input, &mut out) {
        warn!("Terminal I/O ended the session: {:#}", e);
    }
    ExitCode::SUCCESS
}

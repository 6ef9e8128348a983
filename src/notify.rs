//! Desktop side effects run after the report is saved: a chime and opening the file.
//!
//! Both are best effort. Every platform call reports a [`CapabilityError`] instead of
//! panicking, and the callers turn those into [`SoundOutcome`] / [`OpenOutcome`] values
//! so nothing here can fail a run.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

use log::{debug, info, warn};
use thiserror::Error;

/// Frequency of the completion chime.
pub const CHIME_FREQUENCY_HZ: u32 = 800;
/// Duration of the completion chime.
pub const CHIME_DURATION_MS: u32 = 400;
/// Printed when the chime cannot be played.
pub const BELL_SYMBOL: &str = "\u{1F514}";

/// Why a platform capability did not work.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Status { program: String, status: ExitStatus },
}

/// Platform facilities used by the notification step.
pub trait Desktop {
    /// Plays a tone.
    fn beep(&self, frequency_hz: u32, duration_ms: u32) -> Result<(), CapabilityError>;

    /// Opens `path` with the default application through the primary mechanism.
    fn open(&self, path: &Path) -> Result<(), CapabilityError>;

    /// Opens `path` through the platform's shell-level open command.
    fn shell_open(&self, path: &Path) -> Result<(), CapabilityError>;
}

/// [`Desktop`] backed by the running operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn beep(&self, frequency_hz: u32, duration_ms: u32) -> Result<(), CapabilityError> {
        if cfg!(windows) {
            let script = format!("[console]::beep({frequency_hz},{duration_ms})");
            run_command("powershell", &["-NoProfile", "-Command", script.as_str()])
        } else {
            Err(CapabilityError::Unsupported("beep"))
        }
    }

    fn open(&self, path: &Path) -> Result<(), CapabilityError> {
        open::that(path).map_err(|source| CapabilityError::Spawn {
            program: "open::that".to_string(),
            source,
        })
    }

    fn shell_open(&self, path: &Path) -> Result<(), CapabilityError> {
        let target = path.to_string_lossy();
        let target: &str = &target;
        if cfg!(windows) {
            run_command("cmd", &["/C", "start", "", target])
        } else if cfg!(target_os = "macos") {
            run_command("open", &[target])
        } else {
            run_command("xdg-open", &[target])
        }
    }
}

fn run_command(program: &str, args: &[&str]) -> Result<(), CapabilityError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| CapabilityError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CapabilityError::Status {
            program: program.to_string(),
            status,
        })
    }
}

/// Result of the chime step.
#[derive(Debug)]
pub enum SoundOutcome {
    /// Sound is turned off in the config.
    Disabled,
    Played,
    /// The tone could not be played and the bell symbol was printed instead.
    Fallback(CapabilityError),
}

/// Result of the auto-open step.
#[derive(Debug)]
pub enum OpenOutcome {
    /// Auto-open is turned off in the config.
    Disabled,
    Opened,
    /// The primary mechanism failed and the shell command worked.
    OpenedWithFallback { primary: CapabilityError },
    Failed {
        primary: CapabilityError,
        fallback: CapabilityError,
    },
}

/// Plays the completion chime, printing [`BELL_SYMBOL`] to `out` when that is not possible.
pub fn chime<D, W>(desktop: &D, enabled: bool, out: &mut W) -> SoundOutcome
where
    D: Desktop + ?Sized,
    W: Write + ?Sized,
{
    if !enabled {
        return SoundOutcome::Disabled;
    }

    match desktop.beep(CHIME_FREQUENCY_HZ, CHIME_DURATION_MS) {
        Ok(()) => {
            debug!("Played completion chime");
            SoundOutcome::Played
        }
        Err(err) => {
            match &err {
                CapabilityError::Unsupported(_) => debug!("Chime unavailable: {err}"),
                _ => warn!("Chime failed: {err}"),
            }
            if let Err(write_err) = writeln!(out, "{BELL_SYMBOL}") {
                warn!("Failed to print bell symbol: {write_err}");
            }
            SoundOutcome::Fallback(err)
        }
    }
}

/// Opens `path`, trying the primary mechanism first and the shell command second.
pub fn reveal<D>(desktop: &D, enabled: bool, path: &Path) -> OpenOutcome
where
    D: Desktop + ?Sized,
{
    if !enabled {
        return OpenOutcome::Disabled;
    }

    let primary = match desktop.open(path) {
        Ok(()) => {
            info!("Opened {}", path.display());
            return OpenOutcome::Opened;
        }
        Err(err) => err,
    };
    debug!("Primary open of {} failed: {primary}", path.display());

    match desktop.shell_open(path) {
        Ok(()) => {
            info!("Opened {} with shell fallback", path.display());
            OpenOutcome::OpenedWithFallback { primary }
        }
        Err(fallback) => {
            warn!(
                "Could not open {}: {primary}; fallback: {fallback}",
                path.display()
            );
            OpenOutcome::Failed { primary, fallback }
        }
    }
}

//! Terminal presentation: countdown line rendering and alert output.

use std::io::Write;
use std::sync::Mutex;

use eggtimer_core::{AlertError, AlertSink, Snapshot, TimerState};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const BAR_WIDTH: usize = 30;
const BELL: &str = "\x07";

/// One status line, e.g. `05:59 [#-----------------------------]   0% running`.
pub fn status_line(snap: &Snapshot) -> String {
    let filled = ((snap.progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let state = match snap.state {
        TimerState::Idle => "idle",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
        TimerState::Completed => "done!",
    };
    format!(
        "{} [{}{}] {:>3}% {}",
        snap.display(),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        (snap.progress * 100.0).floor() as u32,
        state,
    )
}

/// Redraw the status line in place.
pub fn render(snap: &Snapshot) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    // Trailing spaces wipe leftovers from a longer previous state label.
    write!(out, "\r{}   ", status_line(snap))?;
    out.flush()
}

fn ring() {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "{BELL}");
    let _ = out.flush();
}

/// Alert output for a terminal: an optional external player plus the bell.
pub struct TerminalAlert {
    sound_command: Option<String>,
    /// Reaps the spawned player; resolves to whether it exited cleanly.
    player: Mutex<Option<JoinHandle<bool>>>,
}

impl TerminalAlert {
    pub fn new(sound_command: Option<String>) -> Self {
        Self {
            sound_command,
            player: Mutex::new(None),
        }
    }

    /// Wait for the external player to exit.
    ///
    /// Returns `None` when no player was started.
    pub async fn wait_for_player(&self) -> Option<bool> {
        let task = self.player.lock().unwrap_or_else(|e| e.into_inner()).take()?;
        task.await.ok()
    }
}

impl AlertSink for TerminalAlert {
    fn play_sound(&self) -> Result<(), AlertError> {
        let Some(command) = self.sound_command.as_deref() else {
            ring();
            return Ok(());
        };

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| AlertError::SoundUnavailable("sound_command is blank".into()))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| AlertError::CommandFailed {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        // Exit status only arrives after play_sound returns; a failing
        // player still gets the bell.
        let command = command.to_string();
        let task = tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    debug!(%command, "alert player finished");
                    true
                }
                Ok(status) => {
                    warn!(%command, %status, "alert player exited unsuccessfully");
                    ring();
                    false
                }
                Err(e) => {
                    warn!(%command, "alert player could not be awaited: {}", e);
                    ring();
                    false
                }
            }
        });
        *self.player.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
        Ok(())
    }

    fn fallback(&self) {
        ring();
    }

    fn pulse(&self, index: u32) {
        debug!(index, "alert pulse");
        ring();
    }
}

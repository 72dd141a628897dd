use std::sync::Arc;
use std::time::Duration;

use eggtimer_core::timer::custom_duration;
use eggtimer_core::{
    parse_mmss, schedule_alert, Config, Preset, TimerService, ValidationError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::terminal::{render, TerminalAlert};

/// What the user asked to count down from.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Preset(Preset),
    Duration(Duration),
    Picker { minutes: u32, seconds: u32 },
}

impl Target {
    /// Accepts a preset name (`soft`) or a clock value (`4:30`, `90`).
    pub fn parse(input: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if let Ok(preset) = input.parse::<Preset>() {
            return Ok(Target::Preset(preset));
        }
        let secs = parse_mmss(input)
            .map_err(|e| format!("'{input}' is neither a preset nor MM:SS ({e})"))?;
        Ok(Target::Duration(Duration::from_secs(secs)))
    }

    /// Reject unusable targets before any runtime or config is touched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            Target::Preset(_) => Ok(()),
            Target::Duration(duration) if duration.is_zero() => {
                Err(ValidationError::InvalidDuration { duration })
            }
            Target::Duration(_) => Ok(()),
            Target::Picker { minutes, seconds } => custom_duration(minutes, seconds).map(|_| ()),
        }
    }
}

pub fn run(target: Target) -> Result<(), Box<dyn std::error::Error>> {
    target.validate()?;
    let config = Config::load()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(countdown(config, target));
    // A pending stdin read would otherwise hold shutdown until the next Enter.
    runtime.shutdown_background();
    result
}

enum Outcome {
    Completed,
    Reset,
    Quit,
}

async fn countdown(config: Config, target: Target) -> Result<(), Box<dyn std::error::Error>> {
    let service = TimerService::from_config(&config)?;
    let mut snapshots = service.subscribe_snapshots();
    let mut done = service.subscribe_completion();

    match &target {
        Target::Preset(preset) => service.start_named(preset.name())?,
        Target::Duration(duration) => service.start(*duration)?,
        Target::Picker { minutes, seconds } => service.start_custom(*minutes, *seconds)?,
    }
    info!(?target, "countdown running");
    eprintln!("commands: p = pause, r = resume, x = reset, q = quit (then Enter)");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    let outcome = loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Outcome::Quit;
                }
                let snap = snapshots.borrow_and_update().clone();
                render(&snap)?;
            }
            completion = done.recv() => {
                let event = completion?;
                debug!(generation = event.generation, "completion received");
                break Outcome::Completed;
            }
            line = input.next_line(), if input_open => {
                match line? {
                    Some(cmd) => match cmd.trim() {
                        "p" => service.pause(),
                        "r" => service.resume(),
                        "x" => {
                            service.reset();
                            break Outcome::Reset;
                        }
                        "q" => break Outcome::Quit,
                        "" => {}
                        other => eprintln!("unknown command '{other}'"),
                    },
                    None => input_open = false,
                }
            }
        }
    };

    let last = service.snapshot();
    render(&last)?;
    println!();

    match outcome {
        Outcome::Completed => {
            println!("Time's up!");
            if config.alert.enabled {
                let sink = Arc::new(TerminalAlert::new(config.alert.sound_command.clone()));
                schedule_alert(&config.alert_plan(), sink.clone()).finished().await;
                sink.wait_for_player().await;
            }
        }
        Outcome::Reset => println!("timer reset"),
        Outcome::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_prefers_presets() {
        assert_eq!(Target::parse("soft").unwrap(), Target::Preset(Preset::Soft));
        assert_eq!(Target::parse("HARD").unwrap(), Target::Preset(Preset::Hard));
    }

    #[test]
    fn target_accepts_clock_values() {
        assert_eq!(
            Target::parse("4:30").unwrap(),
            Target::Duration(Duration::from_secs(270))
        );
        assert_eq!(
            Target::parse("45").unwrap(),
            Target::Duration(Duration::from_secs(45))
        );
        assert!(Target::parse("scrambled").is_err());
    }

    #[test]
    fn validate_rejects_empty_countdowns() {
        assert!(Target::parse("0:00").unwrap().validate().is_err());
        assert!(Target::Picker { minutes: 0, seconds: 0 }.validate().is_err());
        assert!(Target::Picker { minutes: 61, seconds: 0 }.validate().is_err());
        assert!(Target::Picker { minutes: 0, seconds: 5 }.validate().is_ok());
        assert!(Target::Preset(Preset::Medium).validate().is_ok());
    }
}

// src/device/lifecycle.rs

//! Lifecycle transition table.
//!
//! The device's power/activity phase is a pure function of the current phase
//! and a command. Anything not listed is illegal and yields `None`; the caller
//! decides how to report it.

use std::fmt;

/// Power/activity phase of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Off,
    On,
    Running,
    Paused,
}

/// Commands that move the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PowerOn,
    PowerOff,
    /// An executor starts a task.
    Start,
    Pause,
    Resume,
    /// The running task reached its duration.
    Finish,
    /// The executor driving the task went away before it finished.
    Abandon,
    EmergencyStop,
}

impl Lifecycle {
    /// A task is in flight (running or suspended).
    pub fn is_busy(&self) -> bool {
        matches!(self, Lifecycle::Running | Lifecycle::Paused)
    }

    pub fn is_powered(&self) -> bool {
        !matches!(self, Lifecycle::Off)
    }

    /// Process a command and return the next phase, or `None` if the command
    /// is illegal from this phase.
    pub fn transition(self, command: Command) -> Option<Self> {
        use Command::*;
        use Lifecycle::*;

        match (self, command) {
            (Off, PowerOn) => Some(On),

            (On, PowerOff) => Some(Off),
            (On, Start) => Some(Running),

            (Running, Pause) => Some(Paused),
            (Running, Finish) => Some(On),

            (Paused, Resume) => Some(Running),

            (Running | Paused, Abandon) => Some(On),

            // Emergency stop is accepted everywhere, including Off.
            (_, EmergencyStop) => Some(Off),

            _ => None,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Off => "off",
            Lifecycle::On => "on",
            Lifecycle::Running => "running",
            Lifecycle::Paused => "paused",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Lifecycle; 4] = [
        Lifecycle::Off,
        Lifecycle::On,
        Lifecycle::Running,
        Lifecycle::Paused,
    ];

    #[test]
    fn power_cycle() {
        let on = Lifecycle::Off.transition(Command::PowerOn);
        assert_eq!(on, Some(Lifecycle::On));
        assert_eq!(Lifecycle::On.transition(Command::PowerOff), Some(Lifecycle::Off));
        assert_eq!(Lifecycle::On.transition(Command::PowerOn), None);
    }

    #[test]
    fn running_flow() {
        let running = Lifecycle::On.transition(Command::Start).unwrap();
        assert_eq!(running, Lifecycle::Running);

        let paused = running.transition(Command::Pause).unwrap();
        assert_eq!(paused, Lifecycle::Paused);

        let running = paused.transition(Command::Resume).unwrap();
        assert_eq!(running.transition(Command::Finish), Some(Lifecycle::On));
    }

    #[test]
    fn abandon_only_releases_busy_states() {
        assert_eq!(Lifecycle::Running.transition(Command::Abandon), Some(Lifecycle::On));
        assert_eq!(Lifecycle::Paused.transition(Command::Abandon), Some(Lifecycle::On));
        assert_eq!(Lifecycle::On.transition(Command::Abandon), None);
        assert_eq!(Lifecycle::Off.transition(Command::Abandon), None);
    }

    #[test]
    fn power_off_rejected_while_busy() {
        assert_eq!(Lifecycle::Running.transition(Command::PowerOff), None);
        assert_eq!(Lifecycle::Paused.transition(Command::PowerOff), None);
    }

    #[test]
    fn emergency_stop_from_any_state() {
        for state in ALL {
            assert_eq!(state.transition(Command::EmergencyStop), Some(Lifecycle::Off));
        }
    }

    #[test]
    fn illegal_pause_and_resume() {
        assert_eq!(Lifecycle::On.transition(Command::Pause), None);
        assert_eq!(Lifecycle::Paused.transition(Command::Pause), None);
        assert_eq!(Lifecycle::Running.transition(Command::Resume), None);
        assert_eq!(Lifecycle::Off.transition(Command::Start), None);
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::PowerOn),
            Just(Command::PowerOff),
            Just(Command::Start),
            Just(Command::Pause),
            Just(Command::Resume),
            Just(Command::Finish),
            Just(Command::Abandon),
            Just(Command::EmergencyStop),
        ]
    }

    proptest! {
        #[test]
        fn busy_states_are_always_powered(commands in proptest::collection::vec(command(), 0..64)) {
            let mut state = Lifecycle::Off;
            for c in commands {
                if let Some(next) = state.transition(c) {
                    state = next;
                }
                prop_assert!(ALL.contains(&state));
                if state.is_busy() {
                    prop_assert!(state.is_powered());
                }
            }
        }
    }
}

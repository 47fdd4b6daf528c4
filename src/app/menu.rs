//! Coordinator command menu.
//!
//! Rebuilt every time the coordinator returns to `AwaitingInput`.  While
//! the alarm is active only the alarm entry is offered; otherwise every
//! command is listed, with the alarm and lock labels following the
//! coordinator's mirrors.

use core::fmt;

use super::commands::Command;

const MENU_CAPACITY: usize = Command::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub command: Command,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    entries: heapless::Vec<MenuEntry, MENU_CAPACITY>,
}

impl Menu {
    pub fn build(alarm_active: bool, locked: bool) -> Self {
        let mut entries = heapless::Vec::new();
        for command in Command::ALL {
            if alarm_active && command != Command::ToggleAlarm {
                continue;
            }
            let label = match command {
                Command::ToggleAlarm if alarm_active => "Deactivate the alarm",
                Command::ToggleAlarm => "Activate the alarm",
                Command::ToggleLock if locked => "Unlock the gate",
                Command::ToggleLock => "Lock the gate",
                Command::OpenEntry => "Open door and gate",
                Command::QueryTemperature => "Average outside temperature",
                Command::QueryLight => "Outside light level",
                Command::ToggleSteamRoom => "Switch the steam room on/off",
            };
            let _ = entries.push(MenuEntry { command, label });
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn offers(&self, command: Command) -> bool {
        self.entries.iter().any(|e| e.command == command)
    }

    pub fn label_of(&self, command: Command) -> Option<&'static str> {
        self.entries.iter().find(|e| e.command == command).map(|e| e.label)
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", e.command.code(), e.label)?;
        }
        Ok(())
    }
}

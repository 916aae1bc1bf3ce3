//! Interactive selection session.
//!
//! A [`Session`] owns the partition list and all UI state. The event loop
//! renders it by shared reference, then feeds it one [`InputEvent`] at a
//! time until [`Session::handle`] returns an [`Outcome`].

use std::collections::HashMap;

use tracing::debug;

use crate::disk::Record;
use crate::mount::MountPolicy;

/// Row substituted when no USB partition was found.
pub const NO_PARTITIONS: &str = "No USB partitions found";

/// Status shown when committing on an error row.
pub const NOT_A_DEVICE: &str = "Selection is not a device";

/// Input events, already decoded from raw terminal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Tab,
    Enter,
    Backspace,
    Quit,
    Character(char),
}

/// Which region receives typed characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Mountpoint,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A mount or unmount command was chosen.
    Committed(String),
    /// The operator quit without choosing.
    Cancelled,
}

impl Outcome {
    /// Returns the chosen command, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            Outcome::Committed(command) => Some(command),
            Outcome::Cancelled => None,
        }
    }
}

/// State of one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    records: Vec<Record>,
    policy: MountPolicy,
    selected: usize,
    focus: Focus,
    /// Field text for the selected row.
    mountpoint: String,
    /// Operator edits keyed by device path.
    edits: HashMap<String, String>,
    message: Option<String>,
    /// Device path the field was last loaded for.
    loaded_path: Option<String>,
}

impl Session {
    /// Starts a session on the filtered partition list.
    pub fn new(mut records: Vec<Record>, policy: MountPolicy) -> Self {
        if records.is_empty() {
            records.push(Record::error(NO_PARTITIONS));
        }

        let mut session = Self {
            records,
            policy,
            selected: 0,
            focus: Focus::List,
            mountpoint: String::new(),
            edits: HashMap::new(),
            message: None,
            loaded_path: None,
        };
        session.load_field();
        session
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns the selected row.
    pub fn current(&self) -> &Record {
        &self.records[self.selected]
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Returns the mount point field for the selected row.
    pub fn mountpoint(&self) -> &str {
        &self.mountpoint
    }

    /// Returns the status message set by the last event.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Applies one input event.
    ///
    /// The status message from the previous event is cleared first, since it
    /// has been rendered by the time the next event arrives.
    pub fn handle(&mut self, event: InputEvent) -> Option<Outcome> {
        self.message = None;

        match event {
            InputEvent::Quit => return Some(Outcome::Cancelled),
            InputEvent::Tab => {
                self.focus = match self.focus {
                    Focus::List => Focus::Mountpoint,
                    Focus::Mountpoint => Focus::List,
                };
                debug!(focus = ?self.focus, "focus toggled");
                return None;
            }
            InputEvent::Up => {
                if self.focus == Focus::List {
                    self.select(self.selected.saturating_sub(1));
                }
                return None;
            }
            InputEvent::Down => {
                if self.focus == Focus::List {
                    self.select((self.selected + 1).min(self.records.len() - 1));
                }
                return None;
            }
            InputEvent::Enter => return self.commit(),
            InputEvent::Backspace | InputEvent::Character(_) => {}
        }

        // mounted devices have nothing to edit
        if self.current().device().is_some_and(|d| d.is_mounted()) {
            return None;
        }

        match event {
            InputEvent::Backspace if self.focus == Focus::Mountpoint => {
                self.mountpoint.pop();
                self.persist();
            }
            InputEvent::Character(c) if !c.is_control() => {
                // typing while browsing starts an edit
                self.focus = Focus::Mountpoint;
                self.mountpoint.push(c);
                self.persist();
            }
            _ => {}
        }
        None
    }

    fn commit(&mut self) -> Option<Outcome> {
        let Record::Device(device) = self.current() else {
            self.message = Some(NOT_A_DEVICE.to_string());
            return None;
        };

        let path = device.device_path();
        let command = if device.is_mounted() {
            self.policy.unmount_command(&path)
        } else {
            self.policy
                .mount_command(&path, &self.mountpoint, device.filesystem())
        };
        debug!(%command, "selection committed");
        Some(Outcome::Committed(command))
    }

    fn select(&mut self, index: usize) {
        if index == self.selected {
            return;
        }
        self.selected = index;
        let path = self.current().device().map(|d| d.device_path());
        if path != self.loaded_path {
            self.load_field();
        }
    }

    /// Reloads the field for the selected row from edits or the policy default.
    fn load_field(&mut self) {
        let (path, field) = match self.current() {
            Record::Error(_) => (None, String::new()),
            Record::Device(device) => {
                let path = device.device_path();
                let field = if device.is_mounted() {
                    String::new()
                } else {
                    self.edits
                        .get(&path)
                        .cloned()
                        .unwrap_or_else(|| self.policy.default_mountpoint(device))
                };
                (Some(path), field)
            }
        };
        debug!(path = ?path, field = %field, "mountpoint field loaded");
        self.mountpoint = field;
        self.loaded_path = path;
    }

    fn persist(&mut self) {
        if let Some(path) = self.current().device().map(|d| d.device_path()) {
            self.edits.insert(path, self.mountpoint.clone());
        }
    }
}

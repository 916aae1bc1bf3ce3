//! Event loop: render, read one key, update the session.

use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event};
use snafu::ResultExt;
use tracing::debug;
use usbmount_core::{Outcome, Session};

use crate::error::{Result, TerminalSnafu};
use crate::input;
use crate::ui;

/// Session state plus the display-only lsusb summary.
pub struct App {
    usb_lines: Vec<String>,
    session: Session,
}

impl App {
    pub fn new(usb_lines: Vec<String>, session: Session) -> Self {
        Self { usb_lines, session }
    }

    /// Takes over the terminal until the session ends, then restores it.
    pub fn run(mut self) -> Result<Outcome> {
        let mut terminal = ratatui::try_init().context(TerminalSnafu)?;
        let outcome = self.event_loop(&mut terminal);
        ratatui::restore();
        outcome
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<Outcome> {
        loop {
            terminal
                .draw(|frame| ui::draw(frame, &self.usb_lines, &self.session))
                .context(TerminalSnafu)?;

            // resize and other events only trigger a redraw
            let Event::Key(key) = event::read().context(TerminalSnafu)? else {
                continue;
            };
            let Some(input) = input::map_key(key, self.session.focus()) else {
                continue;
            };
            debug!(?input, "input event");

            if let Some(outcome) = self.session.handle(input) {
                return Ok(outcome);
            }
        }
    }
}

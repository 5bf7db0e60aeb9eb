use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Either a key press or a poll timeout. Ticks drive the alert clock.
pub enum Input {
    Key(KeyEvent),
    Tick,
}

pub fn next_input(timeout: Duration) -> color_eyre::Result<Input> {
    loop {
        if !event::poll(timeout)? {
            return Ok(Input::Tick);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                return Ok(Input::Key(key));
            }
            _ => continue,
        }
    }
}

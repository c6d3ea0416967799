//! Events fed to the reducer.

use std::time::Duration;

use crossterm::event::Event;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Frame-clock tick carrying the wall time since the previous tick.
    Tick { elapsed: Duration },
    /// Current terminal size, sent before other events each loop.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),
    /// The logo clip reached its natural end.
    MediaEnded,
}

//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover device and media I/O only; the reducer never touches the
//! audio output or the clip directly.

/// Which tone burst to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCue {
    Boot,
    Keystroke,
    Warning,
}

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Open the audio output device (best effort).
    UnlockAudio,
    /// Prime the clip: play, then pause and rewind.
    UnlockMedia,
    /// Start clip playback.
    PlayMedia,
    /// Play a tone burst.
    PlayTones(ToneCue),
    /// Open a URL in the system browser.
    OpenLink { url: String },
}

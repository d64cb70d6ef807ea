//! Events delivered by a capture run.

/// A single event on the recognition stream.
///
/// One capture run produces zero or more `Interim` events followed by
/// exactly one `Final`, or zero transcripts when the run is aborted or
/// fails; `Ended` always closes the run. An engine error produces exactly
/// one `Error` followed by `Ended` - there is no automatic retry, the owner
/// decides whether to start again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Partial transcript: the engine's current segments concatenated
    /// earliest-first with no separator.
    Interim(String),

    /// The run's final transcript.
    Final(String),

    /// Engine-level error code or message.
    Error(String),

    /// The run is over (stop, terminal error, or natural end).
    Ended,
}

impl RecognitionEvent {
    /// The transcript text, for `Interim` and `Final` events.
    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::Interim(text) | Self::Final(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this event carries the run's final transcript.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }
}

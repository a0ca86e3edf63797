use mentionrelay_sprout::SproutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("sprout API error: {0}")]
    Sprout(#[from] SproutError),

    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("monitoring cycle aborted: {0}")]
    CycleAborted(String),
}

impl BotError {
    /// Fatal errors end the process with exit code 1; everything else is
    /// logged and the scheduler carries on after the retry interval.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BotError::CycleAborted(_))
    }
}

//! Status-text collaborator
//!
//! The sim reports hands played and the score as plain strings; hosts decide
//! how to present them (DOM elements on web, log lines headless). Nothing is
//! retained in scene state.

/// Sink for the two status lines the tug game produces.
pub trait StatusDisplay {
    /// "ROCK vs PAPER", or the end-of-match banner ("Player WINS!")
    fn set_hands(&mut self, text: &str);
    /// "Score: n"
    fn set_score(&mut self, text: &str);
}

/// Discards all output. For demos without a scoreboard and quiet ticking.
pub struct NullDisplay;

impl StatusDisplay for NullDisplay {
    fn set_hands(&mut self, _text: &str) {}
    fn set_score(&mut self, _text: &str) {}
}

/// Forwards status lines to the log. Used by the headless native run.
pub struct LogDisplay;

impl StatusDisplay for LogDisplay {
    fn set_hands(&mut self, text: &str) {
        log::info!("{}", text);
    }

    fn set_score(&mut self, text: &str) {
        log::info!("{}", text);
    }
}

/// Records every line, newest last. Used by tests to assert on output.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub hands: Vec<String>,
    pub scores: Vec<String>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent hands-played line, if any
    pub fn last_hands(&self) -> Option<&str> {
        self.hands.last().map(String::as_str)
    }

    /// Most recent score line, if any
    pub fn last_score(&self) -> Option<&str> {
        self.scores.last().map(String::as_str)
    }
}

impl StatusDisplay for RecordingDisplay {
    fn set_hands(&mut self, text: &str) {
        self.hands.push(text.to_string());
    }

    fn set_score(&mut self, text: &str) {
        self.scores.push(text.to_string());
    }
}

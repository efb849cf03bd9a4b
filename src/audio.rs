use crate::engine::{PlayRequest, Stage, TextSlot};

pub const PLAY_ICON: &str = "🎵";
pub const MUTE_ICON: &str = "🔇";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Stopped,
    /// play() was called, the promise has not settled yet
    Starting(PlayRequest),
    Playing,
}

/// Background music toggle
/// - the icon shows what a click will do : 🎵 to play, 🔇 to stop
#[derive(Debug)]
pub struct Music {
    state: MusicState,
    unlock_attempted: bool,
}

impl Default for Music {
    fn default() -> Self {
        Music {
            state: MusicState::Stopped,
            unlock_attempted: false,
        }
    }
}

impl Music {
    #[cfg(test)]
    pub fn state(&self) -> MusicState {
        self.state
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.state == MusicState::Playing
    }

    pub fn toggle<S: Stage>(&mut self, stage: &mut S) {
        match self.state {
            MusicState::Playing => {
                stage.pause_music();
                stage.set_text(TextSlot::MusicIcon, PLAY_ICON);
                self.state = MusicState::Stopped;
            }
            MusicState::Stopped => {
                self.state = MusicState::Starting(PlayRequest::Toggle);
                stage.play_music(PlayRequest::Toggle);
            }
            // an explicit click wins over a pending autoplay unlock
            MusicState::Starting(PlayRequest::Unlock) => {
                self.state = MusicState::Starting(PlayRequest::Toggle);
            }
            MusicState::Starting(PlayRequest::Toggle) => {}
        }
    }

    /// First click anywhere on the page, browsers only allow playback after one
    pub fn unlock<S: Stage>(&mut self, stage: &mut S) {
        if self.unlock_attempted {
            return;
        }
        self.unlock_attempted = true;
        if self.state == MusicState::Stopped {
            self.state = MusicState::Starting(PlayRequest::Unlock);
            stage.play_music(PlayRequest::Unlock);
        }
    }

    pub fn started<S: Stage>(&mut self, stage: &mut S) {
        if let MusicState::Starting(_) = self.state {
            self.state = MusicState::Playing;
            stage.set_text(TextSlot::MusicIcon, MUTE_ICON);
        }
    }

    pub fn failed<S: Stage>(&mut self, stage: &mut S, request: PlayRequest, reason: &str) {
        match request {
            PlayRequest::Toggle => error!("Audio playback error: {}", reason),
            PlayRequest::Unlock => {
                log!("Autoplay blocked - click music button to play: {}", reason)
            }
        }
        if let MusicState::Starting(_) = self.state {
            self.state = MusicState::Stopped;
            stage.set_text(TextSlot::MusicIcon, PLAY_ICON);
        }
    }
}

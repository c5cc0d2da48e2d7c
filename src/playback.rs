//! Animation-clip playback.
//!
//! Drives a single clip's playhead from host-supplied frame deltas. The
//! controller only tracks time; sampling the clip against the scene is the
//! host's concern.

/// Static description of one animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}

/// Snapshot of the playhead for UI display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Playhead position in seconds.
    pub time: f32,
    pub duration: f32,
    /// Playhead position in percent of the clip, 0 to 100.
    pub progress: f32,
}

/// Play-once playhead over a single clip. Reaching the end stops playback
/// and rewinds to the start, paused.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    clip: ClipInfo,
    time: f32,
    playing: bool,
}

impl PlaybackController {
    pub fn new(clip: ClipInfo) -> Self {
        Self {
            clip,
            time: 0.0,
            playing: false,
        }
    }

    pub fn clip(&self) -> &ClipInfo {
        &self.clip
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn play(&mut self) {
        if self.clip.duration <= 0.0 {
            log::warn!("clip {:?} has zero duration, not playing", self.clip.name);
            return;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Rewind to the start, paused.
    pub fn reset(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    /// Scrub to an absolute time, clamped to the clip. Scrubbing pauses
    /// playback.
    pub fn set_time(&mut self, seconds: f32) {
        self.playing = false;
        self.time = seconds.clamp(0.0, self.clip.duration);
    }

    /// Advance the playhead by a frame delta in seconds. Past the end the
    /// clip stops and rewinds.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.time += dt.max(0.0);
        if self.time >= self.clip.duration {
            self.playing = false;
            self.time = 0.0;
        }
    }

    pub fn state(&self) -> PlaybackState {
        let progress = if self.clip.duration > 0.0 {
            (self.time / self.clip.duration) * 100.0
        } else {
            0.0
        };
        PlaybackState {
            is_playing: self.playing,
            time: self.time,
            duration: self.clip.duration,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlaybackController {
        PlaybackController::new(ClipInfo::new("Assembly_Explode", 4.0))
    }

    #[test]
    fn advances_only_while_playing() {
        let mut playback = controller();
        playback.advance(1.0);
        assert_eq!(playback.time(), 0.0);

        playback.play();
        playback.advance(1.0);
        assert_eq!(playback.time(), 1.0);
        assert!((playback.state().progress - 25.0).abs() < 1e-5);

        playback.pause();
        playback.advance(1.0);
        assert_eq!(playback.time(), 1.0);
    }

    #[test]
    fn end_of_clip_stops_and_rewinds() {
        let mut playback = controller();
        playback.play();
        playback.advance(3.5);
        playback.advance(1.0);
        let state = playback.state();
        assert!(!state.is_playing);
        assert_eq!(state.time, 0.0);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn scrub_clamps_and_pauses() {
        let mut playback = controller();
        playback.play();
        playback.set_time(99.0);
        assert!(!playback.is_playing());
        assert_eq!(playback.time(), 4.0);

        playback.set_time(-3.0);
        assert_eq!(playback.time(), 0.0);
    }

    #[test]
    fn reset_rewinds_paused() {
        let mut playback = controller();
        playback.play();
        playback.advance(2.0);
        playback.reset();
        assert!(!playback.is_playing());
        assert_eq!(playback.time(), 0.0);
    }

    #[test]
    fn zero_duration_clip_never_plays() {
        let mut playback = PlaybackController::new(ClipInfo::new("Static", 0.0));
        playback.play();
        assert!(!playback.is_playing());
        assert_eq!(playback.state().progress, 0.0);
    }
}

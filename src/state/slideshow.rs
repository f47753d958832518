/// Slideshow session state
///
/// All slider UI state is derived here from a fixed, already-loaded image
/// sequence: current index, play/pause, per-slide duration, controls
/// visibility, and the current-image loading flag. The type is pure and
/// clock-free; timer ticks and input events arrive as method calls from the
/// application loop, and user-facing notices are returned to the caller.
///
/// The sequence itself is immutable input. Only its length matters here;
/// the records stay with the screen.
use std::time::Duration;

use super::notice::Notice;

/// Selectable slide durations, in seconds.
pub const SLIDE_DURATIONS: [u64; 4] = [3, 5, 7, 10];

/// Duration used until the user picks another one.
pub const DEFAULT_DURATION_SECS: u64 = 5;

/// Inactivity window after which controls hide during playback.
const CONTROLS_IDLE_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Slideshow {
    len: usize,
    index: usize,
    playing: bool,
    duration_secs: u64,
    loading: bool,
    controls_visible: bool,
    idle: Duration,
}

impl Slideshow {
    /// Start a paused slideshow over a sequence of `len` images.
    ///
    /// The first image is considered loading until the screen reports a
    /// load result, the same path every later navigation takes.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "a slideshow needs at least one image");

        Self {
            len,
            index: 0,
            playing: false,
            duration_secs: DEFAULT_DURATION_SECS,
            loading: true,
            controls_visible: true,
            idle: Duration::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.len
    }

    /// Manual step back. A no-op at the first slide.
    pub fn previous(&mut self) -> Option<Notice> {
        if !self.can_go_previous() {
            return None;
        }

        let notice = self.pause_for_navigation();
        self.move_to(self.index - 1);
        notice
    }

    /// Manual step forward. A no-op at the last slide.
    pub fn next(&mut self) -> Option<Notice> {
        if !self.can_go_next() {
            return None;
        }

        let notice = self.pause_for_navigation();
        self.move_to(self.index + 1);
        notice
    }

    /// Jump to a slide (thumbnail selection). Out-of-range targets are
    /// clamped. Selecting the current slide still pauses playback but does
    /// not reload the image.
    pub fn select(&mut self, target: usize) -> Option<Notice> {
        let target = target.min(self.len - 1);
        let notice = self.pause_for_navigation();

        if target != self.index {
            self.move_to(target);
        }

        notice
    }

    /// Flip play/pause.
    pub fn toggle_play(&mut self) -> Option<Notice> {
        self.playing = !self.playing;

        if self.playing {
            // Controls start visible and on the inactivity clock.
            self.controls_visible = true;
            self.idle = Duration::ZERO;
            Some(Notice::success("Slideshow started"))
        } else {
            self.controls_visible = true;
            Some(Notice::success("Slideshow paused"))
        }
    }

    /// The slide-advance timer fired. At the last slide this ends playback
    /// with a single completion notice and leaves the index alone.
    pub fn advance(&mut self) -> Option<Notice> {
        if !self.playing {
            // A tick from a timer that is being torn down.
            return None;
        }

        if !self.can_go_next() {
            self.playing = false;
            self.controls_visible = true;
            return Some(Notice::info("Slideshow completed"));
        }

        self.move_to(self.index + 1);
        None
    }

    /// Pick a new per-slide duration. Values outside the allowed set are
    /// ignored. The in-flight interval restarts; partial elapsed time is
    /// discarded.
    pub fn set_duration(&mut self, secs: u64) -> Option<Notice> {
        if !SLIDE_DURATIONS.contains(&secs) {
            return None;
        }

        self.duration_secs = secs;
        Some(Notice::success(format!("Slideshow speed set to {secs}s")))
    }

    /// Escape: force pause, silently.
    pub fn stop(&mut self) {
        self.playing = false;
        self.controls_visible = true;
    }

    /// Pointer movement or a key press: show controls and restart the
    /// inactivity window.
    pub fn activity(&mut self) {
        self.controls_visible = true;
        self.idle = Duration::ZERO;
    }

    /// Coarse UI tick accumulating inactivity while playing. Controls hide
    /// once the window elapses; while paused they are always visible.
    pub fn idle_tick(&mut self, elapsed: Duration) {
        if !self.playing {
            self.controls_visible = true;
            return;
        }

        if self.controls_visible {
            self.idle += elapsed;
            if self.idle >= CONTROLS_IDLE_WINDOW {
                self.controls_visible = false;
            }
        }
    }

    /// The current image finished loading.
    pub fn image_loaded(&mut self) {
        self.loading = false;
    }

    /// The current image failed to decode or fetch. Clears the loading
    /// flag unconditionally; the failure never blocks navigation.
    pub fn image_failed(&mut self) -> Notice {
        self.loading = false;
        Notice::error("Failed to load image")
    }

    /// Pausing that is a side effect of manual navigation.
    fn pause_for_navigation(&mut self) -> Option<Notice> {
        if !self.playing {
            return None;
        }

        self.playing = false;
        self.controls_visible = true;
        Some(Notice::info("Slideshow paused"))
    }

    fn move_to(&mut self, target: usize) {
        debug_assert!(target < self.len);
        self.index = target;
        self.loading = true;
    }
}

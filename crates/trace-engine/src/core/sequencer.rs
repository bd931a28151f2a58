//! Stroke animation sequencer.
//!
//! Owns the catalog and the animation state and advances playback one point
//! per timer callback. Stroke and point positions are plain indices in
//! [`AnimationState`], so a cancelled or stalled animation can be inspected
//! directly.
//!
//! Timing: the first point of a letter is scheduled with no delay, later
//! points `point_delay_ms` apart, and the first point of each following
//! stroke after `stroke_pause_ms`. The badge and arrowhead for a stroke are
//! drawn in the same callback as its last point.

use std::sync::Arc;

use crate::api::config::TraceConfig;
use crate::api::types::{LetterEntry, LetterKey, Status, Stroke};
use crate::assets::catalog::{load_catalog, Catalog, LetterSource, LoadError};
use crate::core::time::{Scheduler, TimerHandle};
use crate::renderer::color::{PaletteEntry, Rgba};
use crate::renderer::traits::TraceSurface;
use crate::systems::geometry::{arrowhead_for_stroke, badge_for_stroke};

/// Shown to the user while the catalog loads.
pub const LOADING_MESSAGE: &str = "Loading letters…";
/// Shown to the user when the catalog failed to load.
pub const LOAD_ERROR_MESSAGE: &str = "Could not load trace animations.";

#[derive(Debug)]
enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Failed(LoadError),
}

/// Mutable playback state for one mounted instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationState {
    /// A letter is being played back.
    pub is_drawing: bool,
    /// Next letter to play once the current one finishes (last request wins).
    pub pending_letter: Option<LetterKey>,
    /// Letter currently (or most recently) played.
    pub active_letter: Option<LetterKey>,
    /// Strokes of the active letter finished so far; `None` until the first.
    pub completed_strokes: Option<usize>,
    /// The single outstanding callback.
    pub timer: Option<TimerHandle>,
    /// Stroke being drawn.
    pub stroke_index: usize,
    /// Next point to draw within that stroke.
    pub point_index: usize,
}

/// Identifies one load started by [`Sequencer::begin_load`]. Only the most
/// recent token's result is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(pub u32);

pub struct Sequencer {
    config: TraceConfig,
    catalog: Option<Catalog>,
    phase: LoadPhase,
    load_token: LoadToken,
    state: AnimationState,
    /// Latest valid request made before the catalog was ready.
    deferred: Option<LetterKey>,
    disposed: bool,
}

impl Sequencer {
    pub fn new(config: TraceConfig) -> Self {
        Self {
            config,
            catalog: None,
            phase: LoadPhase::Idle,
            load_token: LoadToken(0),
            state: AnimationState::default(),
            deferred: None,
            disposed: false,
        }
    }

    // -- Loading --

    /// Start a (re)load: cancels any animation in flight and supersedes any
    /// load still outstanding. A request deferred before the load is kept so
    /// it can be replayed.
    pub fn begin_load<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) -> LoadToken {
        self.load_token = LoadToken(self.load_token.0.wrapping_add(1));
        if self.disposed {
            return self.load_token;
        }
        self.cancel_animation(scheduler);
        self.phase = LoadPhase::Loading;
        log::debug!("trace: loading letter catalog (load {})", self.load_token.0);
        self.load_token
    }

    /// Complete the load identified by `token`.
    ///
    /// On success the deferred request, if any, starts playing. Results for a
    /// superseded load, or arriving after disposal, are dropped.
    pub fn finish_load<S, T>(
        &mut self,
        token: LoadToken,
        result: Result<Catalog, LoadError>,
        surface: &mut S,
        scheduler: &mut T,
    ) where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if self.disposed || token != self.load_token || !matches!(self.phase, LoadPhase::Loading) {
            log::debug!("trace: dropping stale catalog load result (load {})", token.0);
            return;
        }
        match result {
            Ok(catalog) => {
                log::info!("trace: catalog ready with {} letters", catalog.len());
                self.catalog = Some(catalog);
                self.phase = LoadPhase::Ready;
                if let Some(key) = self.deferred.take() {
                    self.start_or_queue(key, surface, scheduler);
                }
            }
            Err(err) => {
                log::error!("trace: unable to load trace letters: {err}");
                self.phase = LoadPhase::Failed(err);
            }
        }
    }

    /// Load the configured letters from `source` synchronously.
    pub fn load_from<L, S, T>(&mut self, source: &L, surface: &mut S, scheduler: &mut T)
    where
        L: LetterSource + ?Sized,
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if self.disposed {
            return;
        }
        let token = self.begin_load(scheduler);
        let result = load_catalog(source, &self.config.letter_keys);
        self.finish_load(token, result, surface, scheduler);
    }

    // -- Requests --

    /// Ask for a letter to be traced.
    ///
    /// Input that is not exactly one letter is ignored, as are letters the
    /// catalog does not have. Before the catalog is ready the request is
    /// remembered (latest wins). While a letter is playing the request
    /// replaces the pending one.
    pub fn request<'a, S, T>(&mut self, input: impl Into<Option<&'a str>>, surface: &mut S, scheduler: &mut T)
    where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        let Some(key) = input.into().and_then(LetterKey::parse) else {
            log::debug!("trace: ignoring request that is not a single letter");
            return;
        };
        self.request_key(key, surface, scheduler);
    }

    /// Like [`Sequencer::request`] for an already-normalized key.
    pub fn request_key<S, T>(&mut self, key: LetterKey, surface: &mut S, scheduler: &mut T)
    where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if self.disposed {
            return;
        }
        match self.phase {
            LoadPhase::Ready => self.start_or_queue(key, surface, scheduler),
            _ => {
                log::debug!("trace: catalog not ready, deferring {key}");
                self.deferred = Some(key);
            }
        }
    }

    fn start_or_queue<S, T>(&mut self, key: LetterKey, surface: &mut S, scheduler: &mut T)
    where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if !self.catalog.as_ref().is_some_and(|c| c.contains(key)) {
            log::debug!("trace: no geometry for {key}, ignoring");
            return;
        }
        if self.state.is_drawing {
            self.state.pending_letter = Some(key);
            return;
        }
        self.start(key, surface, scheduler);
    }

    fn start<S, T>(&mut self, key: LetterKey, surface: &mut S, scheduler: &mut T)
    where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        self.cancel_timer(scheduler);
        if surface.is_attached() {
            surface.clear();
        }
        self.state.is_drawing = true;
        self.state.active_letter = Some(key);
        self.state.completed_strokes = None;
        self.state.stroke_index = 0;
        self.state.point_index = 0;
        log::debug!("trace: drawing {key}");
        self.schedule(0, scheduler);
    }

    // -- Playback --

    /// Advance playback for a fired timer. Handles other than the outstanding
    /// one are stale and ignored.
    pub fn on_timer<S, T>(&mut self, handle: TimerHandle, surface: &mut S, scheduler: &mut T)
    where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if self.disposed || self.state.timer != Some(handle) {
            return;
        }
        self.state.timer = None;
        if !self.state.is_drawing {
            return;
        }
        if !surface.is_attached() {
            log::debug!("trace: surface detached, halting playback");
            self.halt();
            return;
        }
        let Some(entry) = self.active_entry() else {
            self.halt();
            return;
        };
        let stroke_index = self.state.stroke_index;
        let Some(stroke) = entry.strokes().get(stroke_index) else {
            self.finish(surface, scheduler);
            return;
        };
        let Some(&point) = stroke.points().get(self.state.point_index) else {
            self.halt();
            return;
        };

        let color = self.config.palette.color_for(stroke_index);
        surface.fill_point(point, self.config.point_radius, color);
        self.state.point_index += 1;

        if self.state.point_index < stroke.len() {
            self.schedule(self.config.point_delay_ms, scheduler);
            return;
        }

        self.annotate(stroke, stroke_index, color, surface);
        self.state.completed_strokes = Some(stroke_index + 1);
        self.state.stroke_index += 1;
        self.state.point_index = 0;

        if self.state.stroke_index < entry.stroke_count() {
            self.schedule(self.config.stroke_pause_ms, scheduler);
        } else {
            self.finish(surface, scheduler);
        }
    }

    fn annotate<S: TraceSurface + ?Sized>(&self, stroke: &Stroke, stroke_index: usize, color: Rgba, surface: &mut S) {
        let points = stroke.points();
        let canvas = self.config.canvas_size();
        if let Some(badge) = badge_for_stroke(points, stroke_index + 1, color, &self.config.badge, canvas) {
            surface.draw_badge(&badge);
        }
        if let Some(arrow) = arrowhead_for_stroke(points, color, &self.config.arrow) {
            surface.fill_arrowhead(&arrow);
        }
    }

    fn finish<S, T>(&mut self, surface: &mut S, scheduler: &mut T)
    where
        S: TraceSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        self.state.is_drawing = false;
        self.state.timer = None;
        if let Some(letter) = self.state.active_letter {
            log::debug!("trace: finished {letter}");
        }
        if let Some(next) = self.state.pending_letter.take() {
            self.start_or_queue(next, surface, scheduler);
        }
    }

    /// Stop without drawing anything further.
    fn halt(&mut self) {
        self.state.is_drawing = false;
        self.state.pending_letter = None;
        self.state.timer = None;
    }

    fn schedule<T: Scheduler + ?Sized>(&mut self, delay_ms: u32, scheduler: &mut T) {
        self.state.timer = Some(scheduler.after(delay_ms));
    }

    fn cancel_timer<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        if let Some(handle) = self.state.timer.take() {
            scheduler.cancel(handle);
        }
    }

    /// Cancel the outstanding callback and clear the drawing flags. Whatever
    /// is already on the canvas stays there.
    pub fn cancel_animation<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        self.cancel_timer(scheduler);
        self.state.is_drawing = false;
        self.state.pending_letter = None;
    }

    /// Tear down: nothing fires or draws after this.
    pub fn dispose<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        self.cancel_animation(scheduler);
        self.deferred = None;
        self.disposed = true;
        log::debug!("trace: disposed");
    }

    fn active_entry(&self) -> Option<Arc<LetterEntry>> {
        let key = self.state.active_letter?;
        self.catalog.as_ref()?.get(key).cloned()
    }

    // -- View outputs --

    pub fn status(&self) -> Status {
        match self.phase {
            LoadPhase::Idle | LoadPhase::Loading => Status::Loading,
            LoadPhase::Ready => Status::Ready,
            LoadPhase::Failed(_) => Status::Error,
        }
    }

    pub fn active_letter(&self) -> Option<LetterKey> {
        self.state.active_letter
    }

    pub fn completed_strokes(&self) -> Option<usize> {
        self.state.completed_strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing
    }

    pub fn pending_letter(&self) -> Option<LetterKey> {
        self.state.pending_letter
    }

    /// Request waiting for the catalog to become ready.
    pub fn deferred_letter(&self) -> Option<LetterKey> {
        self.deferred
    }

    /// User-facing error text, only while the status is `Error`.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.phase {
            LoadPhase::Failed(_) => Some(LOAD_ERROR_MESSAGE),
            _ => None,
        }
    }

    /// The underlying load failure, for diagnostics.
    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.phase {
            LoadPhase::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Text for the status line over the canvas, if any.
    pub fn status_message(&self) -> Option<&'static str> {
        match self.status() {
            Status::Loading => Some(LOADING_MESSAGE),
            Status::Error => Some(LOAD_ERROR_MESSAGE),
            Status::Ready => None,
        }
    }

    /// Caption such as "Trace animation · A".
    pub fn label(&self) -> String {
        match self.state.active_letter {
            Some(key) => format!("Trace animation · {key}"),
            None => "Trace animation".to_string(),
        }
    }

    /// Palette colors in stroke order, for a color legend.
    pub fn legend(&self) -> &[PaletteEntry] {
        self.config.palette.entries()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

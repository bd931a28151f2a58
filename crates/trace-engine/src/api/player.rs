use crate::api::config::TraceConfig;
use crate::api::types::{LetterKey, Status};
use crate::assets::catalog::{Catalog, LetterSource, LoadError};
use crate::core::sequencer::{LoadToken, Sequencer};
use crate::core::time::ManualScheduler;
use crate::renderer::traits::TraceSurface;

/// Frame-driven host for one trace view.
///
/// Bundles a [`Sequencer`] with a surface and a virtual clock. The host calls
/// [`TracePlayer::tick`] once per frame with the elapsed milliseconds; every
/// callback that came due in that window fires in deadline order.
pub struct TracePlayer<S: TraceSurface> {
    sequencer: Sequencer,
    surface: S,
    clock: ManualScheduler,
}

impl<S: TraceSurface> TracePlayer<S> {
    pub fn new(config: TraceConfig, surface: S) -> Self {
        Self {
            sequencer: Sequencer::new(config),
            surface,
            clock: ManualScheduler::new(),
        }
    }

    /// Request a letter; see [`Sequencer::request`].
    pub fn request<'a>(&mut self, input: impl Into<Option<&'a str>>) {
        self.sequencer.request(input, &mut self.surface, &mut self.clock);
    }

    pub fn request_key(&mut self, key: LetterKey) {
        self.sequencer.request_key(key, &mut self.surface, &mut self.clock);
    }

    /// Start an asynchronous load; pass the token back to `finish_load`.
    pub fn begin_load(&mut self) -> LoadToken {
        self.sequencer.begin_load(&mut self.clock)
    }

    pub fn finish_load(&mut self, token: LoadToken, result: Result<Catalog, LoadError>) {
        self.sequencer.finish_load(token, result, &mut self.surface, &mut self.clock);
    }

    /// Load synchronously from `source`.
    pub fn load_from<L: LetterSource + ?Sized>(&mut self, source: &L) {
        self.sequencer.load_from(source, &mut self.surface, &mut self.clock);
    }

    /// Advance the clock by `dt_ms` and fire everything that came due.
    /// Returns the number of callbacks fired.
    pub fn tick(&mut self, dt_ms: f32) -> usize {
        let until = self.clock.accumulate(dt_ms);
        let mut fired = 0;
        while let Some(handle) = self.clock.pop_due(until) {
            self.sequencer.on_timer(handle, &mut self.surface, &mut self.clock);
            fired += 1;
        }
        self.clock.advance_to(until);
        fired
    }

    /// Fire callbacks until nothing is scheduled. Returns the number fired.
    pub fn settle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.clock.next_deadline() {
            let Some(handle) = self.clock.pop_due(deadline) else { break };
            self.sequencer.on_timer(handle, &mut self.surface, &mut self.clock);
            fired += 1;
        }
        fired
    }

    pub fn dispose(&mut self) {
        self.sequencer.dispose(&mut self.clock);
    }

    pub fn status(&self) -> Status {
        self.sequencer.status()
    }

    pub fn is_idle(&self) -> bool {
        self.clock.is_idle()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &ManualScheduler {
        &self.clock
    }
}

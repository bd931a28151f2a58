pub mod api;
pub mod assets;
pub mod core;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, TraceConfig, DEFAULT_LETTER_KEYS};
pub use api::player::TracePlayer;
pub use api::types::{LetterEntry, LetterKey, Status, Stroke};
pub use assets::catalog::{
    build_catalog, load_catalog, Catalog, DirSource, LetterSource, LoadError, MemorySource, SourceError,
};
pub use assets::manifest::{LetterDocument, LetterRecord};
pub use core::sequencer::{AnimationState, LoadToken, Sequencer, LOADING_MESSAGE, LOAD_ERROR_MESSAGE};
pub use core::time::{ManualScheduler, Scheduler, TimerHandle};
pub use renderer::color::{ColorParseError, Palette, PaletteEntry, Rgba};
pub use renderer::display_list::{DisplayList, DrawCommand};
pub use renderer::traits::TraceSurface;
pub use systems::geometry::{
    arrowhead_for_stroke, badge_for_stroke, terminal_angle, ArrowStyle, Arrowhead, Badge, BadgeStyle,
};

#[cfg(feature = "vectors")]
pub use systems::vector::{BadgeLabel, VectorSurface, VectorVertex};

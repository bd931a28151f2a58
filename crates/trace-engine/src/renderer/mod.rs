pub mod color;
pub mod display_list;
pub mod traits;

// Re-export key types for convenient access
pub use color::{Palette, PaletteEntry, Rgba};
pub use display_list::{DisplayList, DrawCommand};
pub use traits::TraceSurface;

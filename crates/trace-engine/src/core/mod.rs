pub mod sequencer;
pub mod time;

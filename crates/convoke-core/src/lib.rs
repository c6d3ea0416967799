//! Core convoke library (sequencer, tones, clips, config).

pub mod config;
pub mod interrupt;
pub mod media;
pub mod script;
pub mod sequence;
pub mod synth;
pub mod telemetry;
pub mod tone;

//! Frontend module: the rendering boundary
//!
//! Drawing itself is left to whatever UI embeds the engine. This module
//! defines the [`ChartRenderer`] contract, display downsampling and two
//! small renderers used by the command line and the tests.

pub mod plot;

pub use plot::{
    downsample, ChannelStatistics, ChartRenderer, RecordingRenderer, RenderedFrame, TextRenderer,
};

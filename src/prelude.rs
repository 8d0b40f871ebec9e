//! Single import-everything-useful module. `use crate::prelude::*;` pulls in
//! the tone data model, both front-end parsers, the transform encoders, the
//! sample format codec, and the renderer's entry points.

pub use crate::code_parse::{parse_code, SymbolTable};
pub use crate::error::{Error, Result};
pub use crate::format::{format_from_path, Format};
pub use crate::pulse_parse::{parse_pulses, PulseSetup};
pub use crate::render::{render_to_buffer, render_to_sink};
pub use crate::sink::{BufferSink, Sink, WriteSink};
pub use crate::tone::{length_samples, length_us, AbortFlag, RenderSpec, RenderStats, Tone, TONE_END};
pub use crate::transform::named_transform;

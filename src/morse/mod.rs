//! Morse code tone synthesis.
//!
//! A note name becomes a frequency (`scale`), the frequency and a unit length become the five PCM
//! building blocks (`SampleSet`), and text becomes a concatenation of those blocks (`translate`).

mod samples;
mod scale;
mod tone;
mod translate;

pub use samples::{block_len, Block, SampleSet};
pub use scale::{scale, Note, SEMITONE};
pub use tone::{fill_sine, make_sample, to_pcm};
pub use translate::{encode, pattern, translate, Symbol};

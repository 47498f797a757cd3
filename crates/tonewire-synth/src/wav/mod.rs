//! 16-bit PCM encoding and WAV writing.
//!
//! Output carries no timestamps or variable metadata, so identical
//! waveforms always encode to identical bytes. The BLAKE3 hash of the PCM
//! payload identifies a rendering independently of its container.

mod format;
mod pcm;
mod result;
mod writer;


pub use format::WavFormat;
pub use pcm::pcm_hash;
pub use result::EncodedAudio;
pub use writer::{samples_to_pcm16, write_wav, write_wav_to_vec};

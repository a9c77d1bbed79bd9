//! Song embeddings
//!
//! - [`preprocessing`]: mono PCM → 96-band log-mel spectrogram
//! - [`models`]: model download and cache
//! - [`inference`]: ONNX session, patching and averaging
//! - [`store`]: persistent `name → vector` map
//! - [`service`]: parallel batch run over a songs directory

mod error;
pub mod inference;
pub mod models;
pub mod preprocessing;
pub mod service;
pub mod store;

pub use error::{EmbedError, Result};
pub use inference::{average_embeddings, extract_patches, Embedder, EmbeddingModel, PATCH_SIZE};
pub use models::ModelManager;
pub use preprocessing::{compute_mel_spectrogram, MelSpectrogram, N_BANDS};
pub use service::{list_audio_files, run_embedding, EmbedProgress, EmbedRequest, EmbedSummary};
pub use store::{check_finite, EmbeddingStore};

//! ONNX inference for song embeddings
//!
//! `EmbeddingModel` holds an `ort` session for Discogs-EffNet. A song's
//! spectrogram is cut into 128-frame patches, each patch is embedded, and the
//! patch embeddings are averaged into one vector per song.
//!
//! `run()` needs `&mut self`, so the batch service shares the model behind a
//! `Mutex` while decoding and preprocessing run in parallel.

use std::path::Path;

use ndarray::Array3;
use ort::session::Session;
use ort::value::Tensor;

use super::error::{EmbedError, Result};
use super::preprocessing::{MelSpectrogram, N_BANDS};

/// Mel frames per model input patch
pub const PATCH_SIZE: usize = 128;

const INPUT_NAME: &str = "melspectrogram";

/// Anything that turns a spectrogram into one fixed-length vector
pub trait Embedder: Send {
    fn embed(&mut self, mel: &MelSpectrogram) -> Result<Vec<f32>>;
}

/// Discogs-EffNet session
pub struct EmbeddingModel {
    session: Session,
}

impl EmbeddingModel {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(EmbedError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| EmbedError::ModelLoadFailed(e.to_string()))?;

        log::info!("EmbeddingModel::load: Loaded {:?}", model_path);
        Ok(Self { session })
    }

    /// Embed one `[PATCH_SIZE, N_BANDS]` patch
    fn run_patch(&mut self, patch: &[Vec<f32>]) -> Result<Vec<f32>> {
        let n_frames = patch.len();
        let flat: Vec<f32> = patch.iter().flatten().copied().collect();

        let input = Array3::from_shape_vec((1, n_frames, N_BANDS), flat)
            .map_err(|e| EmbedError::InferenceFailed(format!("Input shape error: {}", e)))?;
        let input_tensor = Tensor::from_array(input)
            .map_err(|e| EmbedError::InferenceFailed(format!("Tensor creation error: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![INPUT_NAME => input_tensor])
            .map_err(|e| EmbedError::InferenceFailed(e.to_string()))?;

        // Outputs are [activations, embeddings]; single-output exports carry
        // the embedding only
        let mut values = outputs.iter().map(|(_, value)| value);
        let first = values
            .next()
            .ok_or_else(|| EmbedError::InferenceFailed("Model produced no output".to_string()))?;
        let chosen = values.next().unwrap_or(first);

        let (_shape, data) = chosen
            .try_extract_tensor::<f32>()
            .map_err(|e| EmbedError::InferenceFailed(format!("Output extraction error: {}", e)))?;
        Ok(data.to_vec())
    }
}

impl Embedder for EmbeddingModel {
    fn embed(&mut self, mel: &MelSpectrogram) -> Result<Vec<f32>> {
        let patches = extract_patches(&mel.frames, PATCH_SIZE);
        if patches.is_empty() {
            return Err(EmbedError::AudioTooShort {
                samples: 0,
                needed: PATCH_SIZE,
            });
        }
        log::debug!(
            "EmbeddingModel::embed: {} patches from {} frames",
            patches.len(),
            mel.len()
        );

        let embeddings = patches
            .iter()
            .map(|patch| self.run_patch(patch))
            .collect::<Result<Vec<_>>>()?;

        Ok(average_embeddings(&embeddings))
    }
}

/// Cut frames into `patch_size` windows with 50 % overlap
///
/// The final window is aligned to the end so every frame is covered. Input
/// shorter than one patch is zero-padded into a single patch.
pub fn extract_patches(frames: &[Vec<f32>], patch_size: usize) -> Vec<Vec<Vec<f32>>> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };

    if frames.len() <= patch_size {
        let mut padded = frames.to_vec();
        padded.resize(patch_size, vec![0.0; first.len()]);
        return vec![padded];
    }

    let hop = (patch_size / 2).max(1);
    let mut patches: Vec<Vec<Vec<f32>>> = (0..=frames.len() - patch_size)
        .step_by(hop)
        .map(|start| frames[start..start + patch_size].to_vec())
        .collect();

    let covered = (patches.len() - 1) * hop + patch_size;
    if covered < frames.len() {
        patches.push(frames[frames.len() - patch_size..].to_vec());
    }

    patches
}

/// Element-wise mean of equally sized vectors
pub fn average_embeddings(embeddings: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = embeddings.first() else {
        return Vec::new();
    };

    let mut avg = vec![0.0f32; first.len()];
    for emb in embeddings {
        for (acc, v) in avg.iter_mut().zip(emb) {
            *acc += v;
        }
    }
    let n = embeddings.len() as f32;
    avg.iter_mut().for_each(|v| *v /= n);
    avg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_frames(n: usize) -> Vec<Vec<f32>> {
        (0..n).map(|i| vec![i as f32; 4]).collect()
    }

    #[test]
    fn test_short_input_padded_to_one_patch() {
        let patches = extract_patches(&numbered_frames(10), 128);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].len(), 128);
        assert_eq!(patches[0][9], vec![9.0; 4]);
        assert_eq!(patches[0][127], vec![0.0; 4]);
    }

    #[test]
    fn test_exact_multiple_has_no_duplicate_tail() {
        // 0..128, 64..192, 128..256
        let patches = extract_patches(&numbered_frames(256), 128);
        assert_eq!(patches.len(), 3);
        assert_eq!(patches[2][0][0], 128.0);
        assert_eq!(patches[2][127][0], 255.0);
    }

    #[test]
    fn test_tail_patch_aligned_to_end() {
        let patches = extract_patches(&numbered_frames(300), 128);
        // 0, 64, 128 then tail at 172
        assert_eq!(patches.len(), 4);
        assert_eq!(patches[3][0][0], 172.0);
        assert_eq!(patches[3].last().unwrap()[0], 299.0);
    }

    #[test]
    fn test_empty_input_no_patches() {
        assert!(extract_patches(&[], 128).is_empty());
    }

    #[test]
    fn test_average_embeddings() {
        let avg = average_embeddings(&[vec![1.0, 2.0], vec![3.0, 6.0]]);
        assert_eq!(avg, vec![2.0, 4.0]);
        assert!(average_embeddings(&[]).is_empty());
    }

    #[test]
    fn test_load_missing_model() {
        let err = EmbeddingModel::load(Path::new("/nonexistent/model.onnx")).err().unwrap();
        assert!(matches!(err, EmbedError::ModelNotFound(_)));
    }
}

//! ONNX Runtime encoder for sentence-transformers models.
//!
//! Produces mean-pooled embeddings from all-MiniLM-L6-v2 (384 dimensions).
//! The model directory must contain `model.onnx` and `tokenizer.json`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::encoder::{TextEncoder, normalize};

/// Sentence encoder backed by ONNX Runtime.
///
/// Loads a sentence-transformers model (e.g., all-MiniLM-L6-v2) and produces
/// normalized embeddings suitable for cosine-similarity search.
pub struct OnnxEncoder {
    // Session::run needs &mut self; the mutex keeps `encode` callable
    // through the shared TextEncoder contract.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dim: usize,
}

impl OnnxEncoder {
    /// Load an encoder from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;

        // Infer embedding dimension from model output shape.
        let dim = infer_dim(session.outputs()[0].dtype()).unwrap_or(384);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        // Configure truncation to model's max length (256 for MiniLM).
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: 256,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        // Configure padding to pad all inputs in a batch to the same length.
        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));

        info!(dim, model = %model_path.display(), "loaded embedding model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dim,
        })
    }

    fn run_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = texts.len();

        // Tokenize all texts.
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Build flat input tensors: [batch_size, seq_len].
        let mut input_ids = vec![0i64; batch_size * seq_len];
        let mut attention_mask = vec![0i64; batch_size * seq_len];
        let mut token_type_ids = vec![0i64; batch_size * seq_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + j] = id as i64;
            }
            for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + j] = mask as i64;
            }
            for (j, &tid) in encoding.get_type_ids().iter().enumerate() {
                token_type_ids[offset + j] = tid as i64;
            }
        }

        let shape = [batch_size as i64, seq_len as i64];

        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.clone().into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;

        // Run inference.
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("encoder session mutex poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        // Extract token embeddings: [batch_size, seq_len, dim].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == batch_size && dims[2] as usize == self.dim,
            "unexpected output shape: {dims:?}, expected [{batch_size}, {seq_len}, {}]",
            self.dim
        );

        let actual_seq_len = dims[1] as usize;

        // Mean pooling with attention mask.
        let mut embeddings = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            let mut pooled = vec![0.0f32; self.dim];
            let mut token_count = 0.0f32;

            for j in 0..actual_seq_len {
                let mask_val = attention_mask[i * seq_len + j] as f32;
                if mask_val > 0.0 {
                    let offset = (i * actual_seq_len + j) * self.dim;
                    for (d, p) in pooled.iter_mut().enumerate() {
                        *p += output_data[offset + d] * mask_val;
                    }
                    token_count += mask_val;
                }
            }

            // Average and normalize to unit length.
            if token_count > 0.0 {
                for p in &mut pooled {
                    *p /= token_count;
                }
            }
            normalize(&mut pooled);
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

impl TextEncoder for OnnxEncoder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let results = self.run_batch(&[text])?;
        Ok(results.into_iter().next().unwrap())
    }

    fn encode_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.run_batch(texts)
    }
}

/// Try to infer the embedding dimension from the ONNX model output type.
fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => {
            // Last dimension is the embedding dim.
            shape
                .last()
                .and_then(|&d| if d > 0 { Some(d as usize) } else { None })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::cosine_sim;
    use std::path::PathBuf;

    fn model_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("all-MiniLM-L6-v2")
    }

    fn require_model() -> PathBuf {
        let dir = model_dir();
        if !dir.join("model.onnx").exists() {
            panic!(
                "Model not found. Download from HuggingFace:\n  \
                 curl -L -o models/all-MiniLM-L6-v2/model.onnx \
                 https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx"
            );
        }
        dir
    }

    #[test]
    fn load_model() {
        let dir = require_model();
        let encoder = OnnxEncoder::load(&dir).unwrap();
        assert_eq!(encoder.dim(), 384);
    }

    #[test]
    fn encode_single_text() {
        let dir = require_model();
        let encoder = OnnxEncoder::load(&dir).unwrap();
        let vec = encoder.encode("Can I rent a camera for 10 days").unwrap();
        assert_eq!(vec.len(), 384);

        // Vector should be normalized (L2 norm ≈ 1.0).
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "expected unit norm, got {norm}");
    }

    #[test]
    fn encode_batch() {
        let dir = require_model();
        let encoder = OnnxEncoder::load(&dir).unwrap();
        let texts = &[
            "What lens should I take on a safari",
            "How long can I keep the equipment",
            "What happens if the camera breaks",
        ];
        let vecs = encoder.encode_batch(texts).unwrap();
        assert_eq!(vecs.len(), 3);
        for (i, v) in vecs.iter().enumerate() {
            assert_eq!(v.len(), 384, "text {i} has wrong dimension");
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!(
                (norm - 1.0).abs() < 1e-4,
                "text {i}: expected unit norm, got {norm}"
            );
        }
    }

    #[test]
    fn similar_texts_closer() {
        let dir = require_model();
        let encoder = OnnxEncoder::load(&dir).unwrap();

        let v_rental = encoder.encode("can I rent gear for a week").unwrap();
        let v_duration = encoder.encode("how long can I keep the camera").unwrap();
        let v_cricket = encoder.encode("tell me about the cricket league").unwrap();

        let sim_rental_duration = cosine_sim(&v_rental, &v_duration);
        let sim_rental_cricket = cosine_sim(&v_rental, &v_cricket);

        assert!(
            sim_rental_duration > sim_rental_cricket,
            "rental↔duration ({sim_rental_duration:.4}) should be more similar than rental↔cricket ({sim_rental_cricket:.4})"
        );
    }

    #[test]
    fn encode_empty_batch() {
        let dir = require_model();
        let encoder = OnnxEncoder::load(&dir).unwrap();
        let vecs = encoder.encode_batch(&[]).unwrap();
        assert!(vecs.is_empty());
    }
}

//! Sentence-transformers all-MiniLM-L6-v2 via candle.
//!
//! Produces 384-dimensional mean-pooled, L2-normalized embeddings. Model files
//! are fetched from the Hugging Face Hub on first use and cached by `hf-hub`.

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, HiddenAct, DTYPE};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::{Encoder, EncoderError};

const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
const REVISION: &str = "main";
const MAX_TOKENS: usize = 256;
const BATCH_SIZE: usize = 32;

fn backend<E: std::fmt::Display>(context: &'static str) -> impl Fn(E) -> EncoderError {
    move |e| EncoderError::Backend(format!("{context}: {e}"))
}

/// Transformer sentence encoder running on the CPU.
pub struct MiniLmEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl MiniLmEncoder {
    /// Load the model from the Hugging Face Hub (downloads on first use).
    pub fn load() -> Result<Self, EncoderError> {
        let device = Device::Cpu;

        let api = Api::new().map_err(backend("failed to create HF API"))?;
        let repo = api.repo(Repo::with_revision(
            MODEL_ID.to_string(),
            RepoType::Model,
            REVISION.to_string(),
        ));
        let config_path = repo
            .get("config.json")
            .map_err(backend("failed to download config"))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(backend("failed to download tokenizer"))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(backend("failed to download weights"))?;

        let config_str =
            std::fs::read_to_string(&config_path).map_err(backend("failed to read config"))?;
        let mut config: Config =
            serde_json::from_str(&config_str).map_err(backend("failed to parse config"))?;
        config.hidden_act = HiddenAct::Gelu;

        let mut tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(backend("failed to load tokenizer"))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(backend("failed to set truncation"))?;

        // SAFETY: the safetensors file is owned by the hf-hub cache and is not
        // modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                .map_err(backend("failed to map weights"))?
        };
        let model = BertModel::load(vb, &config).map_err(backend("failed to build model"))?;

        log::info!("Loaded sentence encoder {}", MODEL_ID);
        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(backend("tokenization failed"))?;

        let batch = encodings.len();
        let seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        let mut type_ids = Vec::with_capacity(batch * seq_len);
        for encoding in &encodings {
            ids.extend(encoding.get_ids().iter().map(|&x| x as i64));
            mask.extend(encoding.get_attention_mask().iter().map(|&x| x as i64));
            type_ids.extend(encoding.get_type_ids().iter().map(|&x| x as i64));
        }

        let input_ids = Tensor::from_vec(ids, (batch, seq_len), &self.device)
            .map_err(backend("input_ids tensor"))?;
        let attention_mask = Tensor::from_vec(mask, (batch, seq_len), &self.device)
            .map_err(backend("attention_mask tensor"))?;
        let token_type_ids = Tensor::from_vec(type_ids, (batch, seq_len), &self.device)
            .map_err(backend("token_type_ids tensor"))?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(backend("forward pass"))?;

        // Mean pooling over non-padding tokens, then L2 normalization.
        let mask = attention_mask
            .unsqueeze(2)
            .and_then(|m| m.to_dtype(DTYPE))
            .and_then(|m| m.broadcast_as(hidden.shape()))
            .map_err(backend("mask expansion"))?;
        let summed = hidden
            .mul(&mask)
            .and_then(|h| h.sum(1))
            .map_err(backend("masked sum"))?;
        let counts = mask
            .sum(1)
            .and_then(|c| c.clamp(1e-9, f64::MAX))
            .map_err(backend("mask count"))?;
        let pooled = summed.div(&counts).map_err(backend("mean pooling"))?;
        let norm = pooled
            .sqr()
            .and_then(|p| p.sum_keepdim(1))
            .and_then(|p| p.sqrt())
            .and_then(|p| p.clamp(1e-12, f64::MAX))
            .map_err(backend("norm"))?;
        let normalized = pooled
            .broadcast_div(&norm)
            .map_err(backend("normalize"))?;

        normalized
            .to_vec2::<f32>()
            .map_err(backend("tensor readback"))
    }
}

impl Encoder for MiniLmEncoder {
    fn name(&self) -> &str {
        MODEL_ID
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            vectors.extend(self.embed_batch(chunk)?);
        }
        Ok(vectors)
    }
}

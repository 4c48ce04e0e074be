//! ONNX sentence-transformer backend for corpus embeddings

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use crate::config::{EMBEDDING_DIM, MAX_SEQUENCE_LENGTH};
use crate::models::{EmbeddingModel, RawEmbeddingBatch};
use crate::runtime::{create_session, Provider};

pub struct TextModel {
    session: Session,
    tokenizer: Tokenizer,
}

impl TextModel {
    pub fn load(model_path: &Path, tokenizer_path: &Path, provider: Provider) -> Result<Self> {
        let session = create_session(model_path, provider)
            .context("Failed to load embedding model")?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        Ok(Self { session, tokenizer })
    }
}

impl EmbeddingModel for TextModel {
    fn embed_batch(&mut self, texts: &[String]) -> Result<RawEmbeddingBatch> {
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let encodings = self.tokenizer.encode_batch(inputs, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let rows = encodings.len();
        let width = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);

        let mut input_ids: Vec<i64> = Vec::with_capacity(rows * width);
        let mut attention_mask: Vec<i64> = Vec::with_capacity(rows * width);
        for encoding in &encodings {
            input_ids.extend(encoding.get_ids().iter().map(|&x| x as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&x| x as i64));
        }
        let token_type_ids = vec![0i64; rows * width];

        let shape = vec![rows, width];
        let input_ids_val = Value::from_array((shape.clone(), input_ids))?;
        let attention_mask_val = Value::from_array((shape.clone(), attention_mask.clone()))?;
        let token_type_ids_val = Value::from_array((shape, token_type_ids))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => input_ids_val,
            "attention_mask" => attention_mask_val,
            "token_type_ids" => token_type_ids_val,
        ])?;

        let output = outputs.get("last_hidden_state")
            .or_else(|| outputs.get("sentence_embedding"))
            .context("Model output not found")?;

        let (out_shape, data) = output.try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = out_shape.iter().map(|&x| x as usize).collect();

        match dims.as_slice() {
            // [batch, seq, hidden]: pool each row over its attended tokens
            [batch, seq, hidden] => {
                if *hidden != EMBEDDING_DIM {
                    crate::ui::debug(&format!(
                        "Model hidden size {} differs from expected {}",
                        hidden, EMBEDDING_DIM
                    ));
                }
                let mut pooled = Vec::with_capacity(batch * hidden);
                for row in 0..*batch {
                    let values = &data[row * seq * hidden..(row + 1) * seq * hidden];
                    let mask = &attention_mask[row * width..(row + 1) * width];
                    pooled.extend(mean_pool_row(values, *seq, *hidden, mask));
                }
                Ok(RawEmbeddingBatch { dims: vec![*batch, *hidden], data: pooled })
            }
            // [batch, hidden]: model pooled already
            [_, _] => Ok(RawEmbeddingBatch { dims, data: data.to_vec() }),
            _ => anyhow::bail!("Unexpected model output shape: {:?}", dims),
        }
    }
}

/// Mean pooling with attention mask over one row of flat data
fn mean_pool_row(data: &[f32], seq_len: usize, hidden_size: usize, attention_mask: &[i64]) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for i in 0..seq_len {
        if attention_mask.get(i).copied().unwrap_or(0) == 1 {
            let offset = i * hidden_size;
            for j in 0..hidden_size {
                sum[j] += data[offset + j];
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        sum.iter_mut().for_each(|x| *x /= count);
    }

    sum
}

//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

static CUSTOM_MODEL_DIR: OnceLock<PathBuf> = OnceLock::new();
static CUSTOM_MODEL: OnceLock<PathBuf> = OnceLock::new();
static CUSTOM_TOKENIZER: OnceLock<PathBuf> = OnceLock::new();

// === Model Files ===
pub const EMBED_MODEL: &str = "model_quantized.onnx";
pub const TOKENIZER: &str = "tokenizer.json";

// === Model Parameters ===
pub const EMBEDDING_DIM: usize = 384;
pub const MAX_SEQUENCE_LENGTH: usize = 256;

// === Storage ===
pub const CACHE_DIR: &str = ".kindred";
pub const CACHE_FILE: &str = "embeddings.msgpack";

// === File Extensions ===
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

// === Ranking Defaults ===
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_OUTPUT: &str = "related.json";
pub const DEFAULT_MIN_SCORE: f32 = -1.0;

pub fn set_models_dir(path: PathBuf) {
    let _ = CUSTOM_MODEL_DIR.set(path);
}

pub fn set_embed_model(path: PathBuf) {
    let _ = CUSTOM_MODEL.set(path);
}

pub fn set_tokenizer(path: PathBuf) {
    let _ = CUSTOM_TOKENIZER.set(path);
}

/// Get models directory (--models-dir flag, KINDRED_MODELS_DIR env var, or next to executable)
pub fn models_dir() -> Option<PathBuf> {
    if let Some(custom) = CUSTOM_MODEL_DIR.get() {
        crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
        return Some(custom.clone());
    }

    if let Ok(env_path) = std::env::var("KINDRED_MODELS_DIR") {
        let path = PathBuf::from(&env_path);
        if path.is_dir() {
            crate::ui::debug(&format!("Using KINDRED_MODELS_DIR: {}", env_path));
            return Some(path);
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let models = dir.join("models");
            if models.is_dir() {
                crate::ui::debug(&format!("Found models at: {}", models.display()));
                return Some(models);
            }
        }
    }

    None
}

pub fn get_embed_model_path() -> Option<PathBuf> {
    if let Some(custom) = CUSTOM_MODEL.get() {
        return Some(custom.clone());
    }
    models_dir().map(|d| d.join(EMBED_MODEL))
}

/// Model file name, used to tag cached embeddings with their origin
pub fn embed_model_name() -> String {
    CUSTOM_MODEL
        .get()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| EMBED_MODEL.to_string())
}

pub fn get_tokenizer_path() -> Option<PathBuf> {
    if let Some(custom) = CUSTOM_TOKENIZER.get() {
        return Some(custom.clone());
    }
    models_dir().map(|d| d.join(TOKENIZER))
}

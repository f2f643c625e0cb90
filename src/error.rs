#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed collaborator payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid resolver options: {0}")]
    Config(#[from] toml::de::Error),
    #[error("OCR payload contains no responses")]
    NoResponses,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

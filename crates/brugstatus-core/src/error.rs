use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrugError {
    #[error("portal request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("portal returned HTTP {0}")]
    PortalStatus(u16),

    #[error("portal response is not valid JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BrugError>;

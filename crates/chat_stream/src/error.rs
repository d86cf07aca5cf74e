#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("env variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
    #[error("config file error: {0}")]
    ConfigFile(#[from] config_file::ConfigFileError),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Chat(#[from] chat_stream::Error),
}

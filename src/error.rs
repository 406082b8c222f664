use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Why an uploaded file was not accepted as the session image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Formato no soportado para '{filename}': solo se aceptan JPG y PNG.")]
    UnsupportedType { filename: String },

    #[error("El archivo '{filename}' está vacío.")]
    Empty { filename: String },

    #[error("Archivo demasiado grande: {size} bytes (límite {limit}).")]
    TooLarge { size: usize, limit: usize },

    #[error("No se pudo leer '{filename}' como imagen: {detail}")]
    Decode { filename: String, detail: String },

    #[error("No se seleccionó ningún archivo.")]
    MissingFile,

    #[error("No se pudo recibir el archivo: {detail}")]
    Unreadable { detail: String },
}

/// Failure of one classification round trip. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Error de conexión con la API: {detail}")]
    Connection { detail: String },

    #[error("Error en la API (status {code}).")]
    ApiStatus { code: u16 },

    #[error("Respuesta inválida de la API: {detail}")]
    Format { detail: String },
}

impl ClassifyError {
    pub fn connection(detail: impl Into<String>) -> Self {
        Self::Connection {
            detail: detail.into(),
        }
    }

    pub fn format(detail: impl Into<String>) -> Self {
        Self::Format {
            detail: detail.into(),
        }
    }
}

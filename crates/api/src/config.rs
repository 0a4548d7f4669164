use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// ONNX leaf severity model, loaded once at startup.
    pub model_path: PathBuf,
    /// Advisory table override. `None` uses the table built into the binary.
    pub advisory_table_path: Option<PathBuf>,
    /// Upper bound on leaf images per request (default: `32`).
    pub max_images_per_request: usize,
    /// Request body limit in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `HOST`                   | `0.0.0.0`                   |
    /// | `PORT`                   | `8000`                      |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`   | `60`                        |
    /// | `MODEL_PATH`             | `models/leaf_severity.onnx` |
    /// | `ADVISORY_TABLE_PATH`    | unset (built-in table)      |
    /// | `MAX_IMAGES_PER_REQUEST` | `32`                        |
    /// | `MAX_UPLOAD_BYTES`       | `52428800`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let model_path = PathBuf::from(
            std::env::var("MODEL_PATH").unwrap_or_else(|_| "models/leaf_severity.onnx".into()),
        );

        let advisory_table_path = std::env::var("ADVISORY_TABLE_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let max_images_per_request: usize = std::env::var("MAX_IMAGES_PER_REQUEST")
            .unwrap_or_else(|_| "32".into())
            .parse()
            .expect("MAX_IMAGES_PER_REQUEST must be a valid usize");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "52428800".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            model_path,
            advisory_table_path,
            max_images_per_request,
            max_upload_bytes,
        }
    }
}

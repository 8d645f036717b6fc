use crate::core::errors::{Error, Result};
use config::{Config, ConfigError, File, FileFormat};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Credentials
-------------------------------------------------------------------------------------------------*/

const API_KEY_FIELD: &str = "default.api_key";

/// API key sent as the `api_key` query parameter on every inventory API request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
        }
    }

    /// Default credentials file path: `${HOME}/.cloudhealth`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home_dir| home_dir.join(".cloudhealth"))
    }

    /// Read the `api_key` option from the `[default]` section of an INI credentials file.
    ///
    /// ```ini
    /// [default]
    /// api_key = 0123456789abcdef
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Configuration(format!(
                "credentials file {:?} not found",
                path
            )));
        }

        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .build()?;

        match config.get_string(API_KEY_FIELD) {
            Ok(api_key) => {
                info!("Read API key from {:?}", path);
                Ok(Self { api_key })
            }
            Err(ConfigError::NotFound(_)) => Err(Error::MissingField(API_KEY_FIELD.to_string())),
            Err(error) => Err(error.into()),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_credentials(contents: &str) -> (PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cloudhealth");
        fs::write(&path, contents).unwrap();
        (path, temp_dir)
    }

    #[test]
    fn test_read_api_key() {
        let (path, _temp_dir) = write_credentials("[default]\napi_key = abc123\n");
        let credentials = Credentials::from_file(&path).unwrap();
        assert_eq!(credentials.api_key(), "abc123");
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Credentials::from_file(temp_dir.path().join("missing"));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_missing_api_key() {
        let (path, _temp_dir) = write_credentials("[default]\nregion = ap-southeast-2\n");
        let result = Credentials::from_file(&path);
        assert!(matches!(result, Err(Error::MissingField(field)) if field == "default.api_key"));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let credentials = Credentials::new("secret");
        assert!(!format!("{:?}", credentials).contains("secret"));
    }
}

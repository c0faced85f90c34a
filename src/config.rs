//! Configuração do cliente carregada a partir de `rescale.toml`.
//!
//! A struct [`RescaleConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `RESCALE_API_KEY` tem precedência sobre o arquivo.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::platform::client::API_URL;

/// Nome do arquivo procurado no diretório atual.
pub const CONFIG_FILE: &str = "rescale.toml";

/// Variável de ambiente com a chave da API.
pub const API_KEY_ENV: &str = "RESCALE_API_KEY";

/// Configuração de nível superior carregada de `rescale.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RescaleConfig {
    /// Chave da API Rescale, enviada como `Authorization: Token <chave>`.
    #[serde(default)]
    pub api_key: String,

    /// URL base da API v2 (muda por região da plataforma).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout total de cada requisição, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout de conexão, em segundos.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

// Valor padrão para a URL base: a plataforma pública.
fn default_base_url() -> String {
    API_URL.to_string()
}

// Valor padrão para o timeout de requisição: 60s.
fn default_timeout_secs() -> u64 {
    60
}

// Valor padrão para o timeout de conexão: 10s.
fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for RescaleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl RescaleConfig {
    /// Carrega a configuração de `rescale.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito, aplicando a variável
    /// de ambiente da chave da API por cima do arquivo.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<RescaleConfig>(&contents)
                .with_context(|| format!("invalid config in {}", path.display()))?
        } else {
            Self::default()
        };

        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Substitui a chave da API quando `key` não é vazia.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = RescaleConfig::default();
        assert_eq!(config.base_url, "https://platform.rescale.com/api/v2/");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(!config.has_api_key());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "tok-123"
            timeout_secs = 120
        "#;
        let config: RescaleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "tok-123");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.base_url, "https://platform.rescale.com/api/v2/");
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn env_key_overrides_file() {
        let config = RescaleConfig {
            api_key: "from-file".into(),
            ..RescaleConfig::default()
        };
        let config = config.with_api_key_override(Some("from-env".into()));
        assert_eq!(config.api_key, "from-env");

        let config = config.with_api_key_override(Some("  ".into()));
        assert_eq!(config.api_key, "from-env");

        let config = config.with_api_key_override(None);
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "base_url = \"http://localhost:9000/\"\n").unwrap();

        let config = RescaleConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();

        let err = RescaleConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RescaleConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.timeout_secs, 60);
    }
}

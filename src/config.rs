//! Configuração do blogsmith carregada a partir de `blogsmith.toml`.
//!
//! A struct [`BlogsmithConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `BLOGSMITH_API_KEY` tem precedência sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// Arquivo procurado no diretório atual.
const CONFIG_FILE: &str = "blogsmith.toml";
// Variável de ambiente que sobrescreve `api_key`.
const API_KEY_ENV: &str = "BLOGSMITH_API_KEY";

/// Configuração de nível superior carregada de `blogsmith.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogsmithConfig {
    /// Endpoint HTTP de completion. Vazio usa o backend mock offline.
    #[serde(default)]
    pub endpoint: String,

    /// Token Bearer do endpoint.
    #[serde(default)]
    pub api_key: String,

    /// Seções rascunhadas em paralelo no caminho de fallback.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout, em segundos, das requisições de geração e pesquisa.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Arquivo do store de perfis.
    #[serde(default = "default_profile_path")]
    pub profile_path: String,

    /// User agent enviado ao buscar referências.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Valor padrão de workers: 4.
fn default_workers() -> usize {
    4
}

// Valor padrão do timeout: 60s.
fn default_request_timeout_secs() -> u64 {
    60
}

// Valor padrão do arquivo de perfis: "memory_bank.json".
fn default_profile_path() -> String {
    "memory_bank.json".to_string()
}

// Valor padrão do user agent: "blogsmith/0.1".
fn default_user_agent() -> String {
    "blogsmith/0.1".to_string()
}

impl Default for BlogsmithConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            workers: default_workers(),
            request_timeout_secs: default_request_timeout_secs(),
            profile_path: default_profile_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl BlogsmithConfig {
    /// Carrega a configuração de `blogsmith.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho específico.
    /// Aplica a variável de ambiente e garante ao menos um worker.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<BlogsmithConfig>(&contents)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            config.api_key = key;
        }
        config.workers = config.workers.max(1);

        Ok(config)
    }

    /// Timeout das requisições como [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = BlogsmithConfig::default();
        assert!(config.endpoint.is_empty());
        assert!(config.api_key.is_empty());
        assert_eq!(config.workers, 4);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.profile_path, "memory_bank.json");
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            endpoint = "http://localhost:8080/generate"
            workers = 8
        "#;
        let config: BlogsmithConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/generate");
        assert_eq!(config.workers, 8);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.user_agent, "blogsmith/0.1");
    }

    #[test]
    fn load_from_file_clamps_workers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogsmith.toml");
        std::fs::write(&path, "workers = 0\nprofile_path = \"p.json\"\n").unwrap();

        let config = BlogsmithConfig::load_from(&path).unwrap();
        assert_eq!(config.workers, 1);
        assert_eq!(config.profile_path, "p.json");
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BlogsmithConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogsmith.toml");
        std::fs::write(&path, "workers = \"many\"").unwrap();
        assert!(BlogsmithConfig::load_from(&path).is_err());
    }
}

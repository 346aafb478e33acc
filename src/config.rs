//! Configuração do SALETARGET carregada a partir de `saletarget.toml`.
//!
//! A struct [`SaleTargetConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `ANTHROPIC_API_KEY` tem precedência sobre o arquivo.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SaleTargetError;
use crate::generation::client::API_URL;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "saletarget.toml";

/// Configuração de nível superior carregada de `saletarget.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleTargetConfig {
    /// Chave da API Anthropic. Vazia desativa os conselhos gerados.
    #[serde(default)]
    pub api_key: String,

    /// Modelo usado para gerar conselhos.
    #[serde(default = "default_model")]
    pub model: String,

    /// Limite de tokens da resposta.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperatura da geração.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Prazo máximo, em segundos, de um pedido de conselho.
    #[serde(default = "default_advice_timeout_secs")]
    pub advice_timeout_secs: u64,

    /// Endpoint da API de mensagens.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Diretório onde o progresso é gravado.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

// Modelo padrão: o mais rápido e barato, suficiente para 20 palavras.
fn default_model() -> String {
    "claude-haiku-4-5-20251001".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.7
}

fn default_advice_timeout_secs() -> u64 {
    15
}

fn default_base_url() -> String {
    API_URL.to_string()
}

impl Default for SaleTargetConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            advice_timeout_secs: default_advice_timeout_secs(),
            base_url: default_base_url(),
            data_dir: None,
        }
    }
}

impl SaleTargetConfig {
    /// Carrega a configuração de `saletarget.toml` no diretório atual.
    pub fn load() -> Result<Self, SaleTargetError> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// Carrega a configuração de um caminho específico.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self, SaleTargetError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SaleTargetConfig>(&contents)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SaleTargetError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(SaleTargetError::Config(format!(
                "temperature must be between 0 and 1, got {}",
                self.temperature
            )));
        }
        if self.advice_timeout_secs == 0 {
            return Err(SaleTargetError::Config(
                "advice_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(SaleTargetError::Config(
                "max_tokens must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn advice_timeout(&self) -> Duration {
        Duration::from_secs(self.advice_timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Resolve o diretório de dados: flag da CLI, depois o arquivo, depois o padrão do sistema.
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf, SaleTargetError> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("saletarget"))
            .ok_or(SaleTargetError::NoDataDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = SaleTargetConfig::default();
        assert_eq!(config.model, "claude-haiku-4-5-20251001");
        assert_eq!(config.max_tokens, 100);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.advice_timeout(), Duration::from_secs(15));
        assert_eq!(config.base_url, API_URL);
        assert!(!config.has_api_key());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "sk-test-123"
            advice_timeout_secs = 5
            data_dir = "/tmp/saletarget"
        "#;
        let config: SaleTargetConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "sk-test-123");
        assert_eq!(config.advice_timeout_secs, 5);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/saletarget")));
        assert_eq!(config.max_tokens, 100);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SaleTargetConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.max_tokens, 100);
    }

    #[test]
    fn load_rejects_out_of_range_temperature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "temperature = 3.5\n").unwrap();
        let err = SaleTargetConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SaleTargetError::Config(_)));
    }

    #[test]
    fn load_reports_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "max_tokens = \"lots\"\n").unwrap();
        let err = SaleTargetConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SaleTargetError::Toml(_)));
    }

    #[test]
    fn data_dir_precedence() {
        let mut config = SaleTargetConfig::default();
        config.data_dir = Some(PathBuf::from("/from/file"));
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.resolve_data_dir(None).unwrap(),
            PathBuf::from("/from/file")
        );
    }
}

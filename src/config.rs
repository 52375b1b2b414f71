//! Configuração do PONTO carregada a partir de `ponto.toml`.
//!
//! A struct [`PontoConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `JIRA_DOMAIN`, `JIRA_EMAIL` e `JIRA_API_TOKEN`
//! têm precedência sobre o arquivo. A configuração é construída uma vez no
//! startup e passada explicitamente a cada componente — nenhum componente
//! lê o ambiente por conta própria.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::error::PontoError;

/// Configuração de nível superior carregada de `ponto.toml` + ambiente.
#[derive(Debug, Clone, Deserialize)]
pub struct PontoConfig {
    /// URL base do site Jira (ex.: "https://mufpm.atlassian.net").
    #[serde(default = "default_domain")]
    pub domain: String,

    /// E-mail da conta usada na autenticação básica.
    #[serde(default)]
    pub email: String,

    /// Token de API do Jira. Ausência é fatal no startup (exceto nos modos
    /// puramente informativos).
    #[serde(default)]
    pub api_token: String,

    /// Deslocamento fixo do relógio de negócio em relação ao UTC, em horas.
    /// Default: +7 (WIB, Asia/Jakarta) — o relógio em que a tabela de slots
    /// é definida.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Id numérico do campo customizado "plan start date" usado para escopar
    /// a busca diária (cf[NNNNN] na JQL).
    #[serde(default = "default_plan_start_field")]
    pub plan_start_field: u32,

    /// Caminho do arquivo de log append-only.
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

// Valor padrão para o domínio Jira.
fn default_domain() -> String {
    "https://mufpm.atlassian.net".to_string()
}

// Valor padrão para o deslocamento UTC: +7 (WIB).
fn default_utc_offset_hours() -> i32 {
    7
}

// Valor padrão para o campo "plan start date": cf[10093].
fn default_plan_start_field() -> u32 {
    10093
}

// Valor padrão para o arquivo de log.
fn default_log_path() -> String {
    "ponto.log".to_string()
}

impl Default for PontoConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            email: String::new(),
            api_token: String::new(),
            utc_offset_hours: default_utc_offset_hours(),
            plan_start_field: default_plan_start_field(),
            log_path: default_log_path(),
        }
    }
}

impl PontoConfig {
    /// Carrega a configuração de `ponto.toml` no diretório atual e aplica as
    /// variáveis de ambiente do processo por cima. Usa valores padrão se o
    /// arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::from_sources(Path::new("ponto.toml"), |name| std::env::var(name).ok())
    }

    /// Variante com fontes explícitas, para testes com ambientes falsos.
    pub fn from_sources(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<PontoConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variáveis de ambiente têm precedência sobre o arquivo.
        if let Some(domain) = env("JIRA_DOMAIN").filter(|v| !v.is_empty()) {
            config.domain = domain;
        }
        if let Some(email) = env("JIRA_EMAIL").filter(|v| !v.is_empty()) {
            config.email = email;
        }
        if let Some(token) = env("JIRA_API_TOKEN").filter(|v| !v.is_empty()) {
            config.api_token = token;
        }

        Ok(config)
    }

    /// Falha se o token não estiver configurado. Chamado antes de qualquer
    /// lógica de slot; os modos `--schedule` e `--calc-duration` não passam
    /// por aqui.
    pub fn require_credentials(&self) -> Result<(), PontoError> {
        if self.api_token.is_empty() {
            return Err(PontoError::Config(
                "JIRA_API_TOKEN is not set. Export it or add api_token to ponto.toml.".into(),
            ));
        }
        Ok(())
    }
}

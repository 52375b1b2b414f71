//! Tipos de erro para o cliente da API REST do Jira.
//!
//! Define [`JiraError`] com variantes para falha de autenticação, erros da
//! API e erros de rede. Usa `thiserror` para derivar `Display` e `Error`
//! automaticamente a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com a API do Jira.
///
/// As variantes cobrem os cenários de falha relevantes para o motor:
/// - [`AuthFailed`](JiraError::AuthFailed) — HTTP 401/403 (credenciais)
/// - [`ApiError`](JiraError::ApiError) — qualquer outro erro HTTP (4xx/5xx)
/// - [`Timeout`](JiraError::Timeout) — a chamada excedeu o tempo limite
/// - [`NetworkError`](JiraError::NetworkError) — falha na camada de rede
#[derive(Debug, Error)]
pub enum JiraError {
    /// O servidor rejeitou as credenciais (HTTP 401 ou 403).
    /// Carrega apenas o código de status; o token nunca é registrado.
    #[error("authentication rejected by Jira (status {status})")]
    AuthFailed { status: u16 },

    /// Erro retornado pela API (ex.: 400 JQL inválida, 500 erro interno).
    /// Contém o código de status HTTP e o corpo da resposta.
    #[error("Jira API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// A requisição excedeu o tempo limite configurado no cliente.
    #[error("request to Jira timed out")]
    Timeout,

    /// Falha de rede subjacente (DNS, conexão recusada, resposta truncada).
    #[error("network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for JiraError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JiraError::Timeout
        } else {
            JiraError::NetworkError(err.to_string())
        }
    }
}

//! Tipos de dados para requisições e respostas da API REST v3 do Jira.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o formato dos endpoints `myself`, `search/jql` e `transitions`.

use serde::{Deserialize, Serialize};

/// Resposta do endpoint `GET /rest/api/3/myself`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Identificador estável da conta, usado para escopar a JQL por assignee.
    pub account_id: String,
    /// Nome de exibição do usuário autenticado.
    pub display_name: String,
    /// Endereço de e-mail da conta (pode estar oculto pela privacidade do site).
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Corpo da requisição para `POST /rest/api/3/search/jql`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Consulta JQL completa.
    pub jql: String,
    /// Limite de resultados por página.
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    /// Campos a retornar por issue.
    pub fields: Vec<String>,
}

/// Resposta de `POST /rest/api/3/search/jql`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Issues que satisfazem a consulta (vazio quando nada casa).
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Uma issue retornada pela busca — apenas os campos que o motor observa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Chave da issue com prefixo de projeto (ex.: "PRJ-1").
    pub key: String,
    /// Campos selecionados na busca.
    #[serde(default)]
    pub fields: IssueFields,
}

/// Campos observados de uma issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    /// Resumo curto da issue.
    #[serde(default)]
    pub summary: Option<String>,
    /// Status atual no fluxo de trabalho.
    #[serde(default)]
    pub status: Option<StatusRef>,
}

/// Referência a um status do fluxo de trabalho.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRef {
    /// Nome do status como definido no tracker (ex.: "SUPPORT INPROGRESS").
    pub name: String,
}

/// Resposta de `GET /rest/api/3/issue/{key}/transitions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<TransitionRef>,
}

/// Uma transição disponível na issue, conforme reportado pelo tracker.
///
/// A disponibilidade depende do status atual da issue; a lista muda a cada
/// mudança de estado no fluxo de trabalho.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRef {
    /// Identificador numérico (como string) usado para executar a transição.
    pub id: String,
    /// Nome de exibição da transição (ex.: "Hold Support").
    pub name: String,
    /// Status de destino, quando o tracker o informa.
    #[serde(default)]
    pub to: Option<StatusRef>,
}

/// Corpo de `POST /rest/api/3/issue/{key}/transitions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub transition: TransitionId,
}

/// Envelope do identificador de transição exigido pela API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionId {
    pub id: String,
}

impl TransitionRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            transition: TransitionId { id: id.into() },
        }
    }
}

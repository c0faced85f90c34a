//! Tipos de dados para requisições e respostas da API v2 da Rescale.
//!
//! As structs de requisição serializam em camelCase, conforme o formato
//! esperado pelo endpoint `jobs/`. As structs de resposta aceitam campos
//! extras e ignoram tudo o que o núcleo não usa.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Hardware;

/// Corpo da requisição para `POST jobs/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDocument {
    /// Nome do job exibido na plataforma.
    pub name: String,
    /// Uma entrada por análise, na ordem em que foram adicionadas ao job.
    pub jobanalyses: Vec<JobAnalysisPayload>,
}

/// Fragmento serializado de uma análise dentro do [`JobDocument`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysisPayload {
    /// Software e código interno da versão.
    pub analysis: AnalysisRef,
    /// Linha de comando executada no cluster.
    pub command: String,
    /// Hardware solicitado; a plataforma espera uma cópia por análise.
    pub hardware: Hardware,
    /// Ids remotos dos arquivos de entrada.
    pub input_files: Vec<FileRef>,
    /// Variáveis de ambiente específicas da variante (ex.: servidor de licença).
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
}

/// Par `(code, version)` que identifica o software na plataforma.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRef {
    pub code: String,
    pub version: String,
}

/// Referência a um arquivo já presente na plataforma.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRef {
    pub id: String,
}

/// Resposta de `POST jobs/` e `POST files/contents/`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Resposta de `GET jobs/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Uma entrada do catálogo de versões de um software.
///
/// `label` é o nome legível (ex.: "2024 HF4 (FlexNet Licensing)") e `code`
/// o identificador interno usado no documento do job (ex.: "2024-hf4").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionEntry {
    pub label: String,
    pub code: String,
}

//! Tipos de erro da camada de transporte para a API da Rescale.
//!
//! Define [`TransportError`] com variantes para erros HTTP, falhas de rede,
//! leitura de arquivos locais e respostas com formato inesperado. Usa
//! `thiserror` para derivar `Display` e `Error` a partir dos atributos
//! `#[error(...)]`.

use std::path::PathBuf;

use thiserror::Error;

/// Erros que podem ocorrer ao conversar com a plataforma.
///
/// O núcleo nunca retenta nenhum destes erros; eles são repassados ao
/// chamador como [`JobError::Transport`](crate::error::JobError::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// A plataforma respondeu com status fora da faixa 2xx.
    /// Contém o código HTTP e o corpo da resposta.
    #[error("platform returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Não foi possível ler um arquivo local antes do upload.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// O corpo da resposta não tem o formato esperado pelo endpoint.
    #[error("unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },
}

impl TransportError {
    pub(crate) fn unexpected(endpoint: &str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = TransportError::Api {
            status: 401,
            message: "Invalid token".into(),
        };
        assert_eq!(
            err.to_string(),
            "platform returned status 401: Invalid token"
        );
    }

    #[test]
    fn unexpected_response_display() {
        let err = TransportError::unexpected("jobs/", "missing field `id`");
        assert_eq!(
            err.to_string(),
            "unexpected response from jobs/: missing field `id`"
        );
    }

    #[test]
    fn io_error_names_the_path() {
        let err = TransportError::Io {
            path: PathBuf::from("/tmp/job1.inp"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().starts_with("failed to read /tmp/job1.inp"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransportError>();
    }
}

//! Tipos de erro para o serviço de geração de texto.
//!
//! Define [`GenerationError`] com variantes para rate limiting, erros da API,
//! erros de rede, timeout e respostas vazias. Nenhuma dessas falhas chega ao
//! usuário: o [`Advisor`](crate::advice::Advisor) as converte no texto de fallback.

use thiserror::Error;

/// Erros que podem ocorrer ao pedir texto ao serviço de geração.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// O servidor retornou HTTP 429 (rate limit).
    /// O campo `retry_after_ms` indica quantos milissegundos esperar antes de retentar.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Erro retornado pela API (ex.: 401 chave inválida, 500 erro interno).
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, corpo inválido).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A requisição não terminou dentro do prazo configurado.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A resposta não trouxe nenhum bloco de texto utilizável.
    #[error("response contained no text")]
    EmptyResponse,

    /// Nenhuma chave de API configurada.
    #[error("no API key configured")]
    NotConfigured,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = GenerationError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
    }

    #[test]
    fn api_error_display() {
        let err = GenerationError::ApiError {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "API error (status 401): Invalid API key");
    }

    #[test]
    fn timeout_display() {
        assert_eq!(
            GenerationError::Timeout(15).to_string(),
            "request timed out after 15s"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GenerationError>();
    }
}

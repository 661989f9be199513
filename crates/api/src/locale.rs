//! Minimal message catalog keyed by locale, derived from `Accept-Language`
//! (spec.md §7 "User-visible"). Falls back to English detail strings
//! already carried by [`casino_core::DomainError`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

use casino_core::ErrorKind;

/// The caller's preferred locale, extracted once per request.
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tag = parts
            .headers
            .get(axum::http::header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_lowercase())
            .unwrap_or_else(|| "en".to_string());
        Ok(Locale(tag))
    }
}

/// Translate an error kind's detail string for `locale`; unknown locales
/// and unknown kinds fall back to the English default.
pub fn translate(kind: ErrorKind, locale: &str, default_detail: &str) -> String {
    let lang = locale.split('-').next().unwrap_or(locale);
    match (lang, kind) {
        ("es", ErrorKind::InsufficientFunds) => "fondos insuficientes".to_string(),
        ("es", ErrorKind::WalletNotFound) => "billetera no encontrada".to_string(),
        ("es", ErrorKind::PlayerNotFound) => "jugador no encontrado".to_string(),
        ("es", ErrorKind::InvalidAmount) => {
            "el monto debe ser positivo con hasta dos decimales".to_string()
        }
        ("es", ErrorKind::TransactionAlreadyProcessed) => "transacción ya procesada".to_string(),
        ("es", ErrorKind::InvalidCredentials) => "credenciales inválidas".to_string(),
        ("es", ErrorKind::PlayerIdMismatch) => {
            "el jugador autenticado no coincide con la solicitud".to_string()
        }
        _ => default_detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_known_kind_in_spanish() {
        let detail = translate(ErrorKind::InsufficientFunds, "es-MX", "insufficient funds");
        assert_eq!(detail, "fondos insuficientes");
    }

    #[test]
    fn translate_falls_back_to_default_for_unknown_locale() {
        let detail = translate(ErrorKind::InsufficientFunds, "fr", "insufficient funds");
        assert_eq!(detail, "insufficient funds");
    }

    #[test]
    fn translate_falls_back_to_default_for_unmapped_kind() {
        let detail = translate(ErrorKind::InternalServerError, "es", "internal error");
        assert_eq!(detail, "internal error");
    }
}

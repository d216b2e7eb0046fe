// [libs/domain/models/src/envelope.rs]
/*!
 * =================================================================
 * APARATO: RESPONSE ENVELOPE (V1.0 - WIRE CONTRACT)
 * CLASIFICACIÓN: DOMAIN DTO (ESTRATO L2)
 * RESPONSABILIDAD: FORMA UNIFORME DE TODA RESPUESTA HTTP DEL GATEWAY
 * =================================================================
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data: None,
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

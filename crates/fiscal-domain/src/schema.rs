//! Schema module - the fixed response shape every extraction is constrained to

use crate::record::RequestType;
use serde_json::{json, Value};
use std::sync::LazyLock;

/// Field name of the client name
pub const FIELD_CLIENT: &str = "nombre_cliente";
/// Field name of the amount
pub const FIELD_AMOUNT: &str = "monto";
/// Field name of the date
pub const FIELD_DATE: &str = "fecha";
/// Field name of the request type
pub const FIELD_REQUEST_TYPE: &str = "tipo_solicitud";
/// Provenance field injected after a successful extraction
pub const FIELD_SOURCE: &str = "archivo_origen";

static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    let request_types: Vec<&str> = RequestType::ALL.iter().map(|t| t.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            FIELD_CLIENT: {
                "type": "STRING",
                "description": "El nombre del cliente o empresa."
            },
            FIELD_AMOUNT: {
                "type": "NUMBER",
                "nullable": true,
                "description": "El monto económico mencionado. Si no hay, devuelve null."
            },
            FIELD_DATE: {
                "type": "STRING",
                "description": "La fecha mencionada en formato YYYY-MM-DD."
            },
            FIELD_REQUEST_TYPE: {
                "type": "STRING",
                "enum": request_types,
                "description": "Clasifica la intención del texto en Venta, Queja o Factura."
            }
        },
        "required": [FIELD_CLIENT, FIELD_DATE, FIELD_REQUEST_TYPE]
    })
});

/// The process-wide extraction schema
///
/// Immutable for the lifetime of the process. Providers receive it with
/// every structured generation call.
///
/// # Examples
///
/// ```
/// use fiscal_domain::ExtractionSchema;
///
/// let schema = ExtractionSchema::get();
/// assert_eq!(schema.field_names().len(), 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExtractionSchema {
    value: &'static Value,
}

impl ExtractionSchema {
    /// Get the shared schema instance
    pub fn get() -> Self {
        Self {
            value: &RESPONSE_SCHEMA,
        }
    }

    /// The schema as a JSON value in the `responseSchema` dialect
    pub fn as_json(&self) -> &'static Value {
        self.value
    }

    /// Names of the fields the model must populate, in schema order
    pub fn field_names(&self) -> [&'static str; 4] {
        [FIELD_CLIENT, FIELD_AMOUNT, FIELD_DATE, FIELD_REQUEST_TYPE]
    }

    /// Names of the fields the model may not omit
    pub fn required_fields(&self) -> [&'static str; 3] {
        [FIELD_CLIENT, FIELD_DATE, FIELD_REQUEST_TYPE]
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::get()
    }
}

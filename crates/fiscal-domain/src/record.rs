//! Record module - the structured output of one document

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Classification of what a document asks for
///
/// The set is closed: the response schema constrains the model to exactly
/// these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// A sale
    Venta,

    /// A complaint
    Queja,

    /// An invoice
    Factura,
}

impl RequestType {
    /// Every variant, in schema order
    pub const ALL: [RequestType; 3] = [RequestType::Venta, RequestType::Queja, RequestType::Factura];

    /// Get the wire name of the request type
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Venta => "Venta",
            RequestType::Queja => "Queja",
            RequestType::Factura => "Factura",
        }
    }

    /// Parse a request type from its wire name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "venta" => Some(RequestType::Venta),
            "queja" => Some(RequestType::Queja),
            "factura" => Some(RequestType::Factura),
            _ => None,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid request type: {}", s))
    }
}

/// The fields the model populates for a single document
///
/// `fecha` is expected in `YYYY-MM-DD` form but is kept as the model
/// returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalRecord {
    /// Client or company name
    pub nombre_cliente: String,

    /// Amount mentioned in the document, if any
    ///
    /// Whole amounts are written without a fractional part (`150`, not `150.0`).
    #[serde(default, serialize_with = "serialize_amount")]
    pub monto: Option<f64>,

    /// Date mentioned in the document
    pub fecha: String,

    /// What the document asks for
    pub tipo_solicitud: RequestType,
}

impl FiscalRecord {
    /// Attach the provenance field, producing the record that goes into a batch
    pub fn with_source(self, archivo_origen: impl Into<String>) -> ExtractedRecord {
        ExtractedRecord {
            record: self,
            archivo_origen: archivo_origen.into(),
        }
    }
}

/// Largest magnitude below which every whole `f64` is exact in an `i64`
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

fn serialize_amount<S>(monto: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match monto {
        Some(v) if v.fract() == 0.0 && v.abs() < EXACT_INTEGER_LIMIT => {
            serializer.serialize_some(&(*v as i64))
        }
        Some(v) => serializer.serialize_some(v),
        None => serializer.serialize_none(),
    }
}

/// A fiscal record together with the name of the file it came from
///
/// Serializes flat: the four schema fields followed by `archivo_origen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// The extracted fields
    #[serde(flatten)]
    pub record: FiscalRecord,

    /// Source file name (not the full path)
    pub archivo_origen: String,
}

/// Ordered records of one run, in directory listing order
pub type ResultBatch = Vec<ExtractedRecord>;

//! LLM prompt engineering for record extraction

use fiscal_domain::ExtractionSchema;

/// Builds the prompt that asks the model to fill the extraction schema
pub struct PromptBuilder<'a> {
    text: &'a str,
    schema: ExtractionSchema,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for a document's raw text
    pub fn new(text: &'a str, schema: ExtractionSchema) -> Self {
        Self { text, schema }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and task
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Fields to populate
        prompt.push_str("Campos a completar: ");
        prompt.push_str(&self.schema.field_names().join(", "));
        prompt.push_str("\n\n");

        // 3. The text to analyze
        prompt.push_str("Texto a analizar:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n");

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "Eres un asistente administrativo experto. \
Analiza el siguiente texto extraído de un documento y extrae los datos requeridos \
respetando estrictamente el formato JSON indicado. \
Si el texto no menciona un monto, usa null. \
Escribe la fecha en formato YYYY-MM-DD.";

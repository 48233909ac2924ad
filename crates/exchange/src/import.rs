use crate::envelope::ContextEnvelope;
use crate::error::{ExchangeError, Result};
use crate::validate::{validate, validate_value, ValidationReport};
use context_protocol::CodebaseContext;
use serde_json::Value;

fn accept(report: ValidationReport) -> Result<()> {
    for warning in &report.warnings {
        log::warn!("Envelope {}: {} ({})", warning.code, warning.message, warning.path);
    }
    if report.valid {
        Ok(())
    } else {
        Err(ExchangeError::InvalidEnvelope(report.errors))
    }
}

/// Validate `envelope` and return its payload unchanged
pub fn import(envelope: &ContextEnvelope) -> Result<CodebaseContext> {
    accept(validate(envelope))?;
    Ok(envelope.payload.clone())
}

/// Validate a raw envelope document and return its typed payload
pub fn import_value(document: &Value) -> Result<CodebaseContext> {
    accept(validate_value(document))?;
    let envelope: ContextEnvelope = serde_json::from_value(document.clone())?;
    Ok(envelope.payload)
}

/// Parse and validate an envelope serialized as JSON text
pub fn parse_envelope(json: &str) -> Result<ContextEnvelope> {
    let document: Value = serde_json::from_str(json)?;
    accept(validate_value(&document))?;
    Ok(serde_json::from_value(document)?)
}

/// JSON schema of [`ContextEnvelope`], for stores that check documents independently
pub fn envelope_schema() -> Value {
    schemars::schema_for!(ContextEnvelope).to_value()
}

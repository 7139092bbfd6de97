//! Small value parsers for CLI arguments

/// Parse one field name out of a comma-separated selector
pub fn parse_field_name(value: &str) -> Result<String, String> {
    let field = value.trim();
    if field.is_empty() {
        return Err("field names must not be empty".to_string());
    }
    Ok(field.to_string())
}

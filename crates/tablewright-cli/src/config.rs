use std::path::Path;

use tablewright_generate::GenerateOptions;

use crate::CliError;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tablewright.toml";

/// Load generator options from a TOML file. A missing file yields defaults.
pub fn load_options(path: &Path) -> Result<GenerateOptions, CliError> {
    if !path.exists() {
        return Ok(GenerateOptions::default());
    }
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

pub fn parse_options(content: &str) -> Result<GenerateOptions, CliError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn parses_partial_configuration() {
        let options = parse_options(
            r#"
identifier_namespace = "https://w3id.org/marco-bolo/"
separator = ";"
input_metadata_slots = ["metadata_publication_date"]
require_content_urls = true

[content_urls]
Dataset = "https://example.org/sheets/Dataset.csv"

[[synthetic_tables]]
name = "Agent"
path = "out/validation/agents.csv"
id_title = "MBO Permanent Identifier*"
"#,
        )
        .expect("parse config");

        assert_eq!(options.identifier_namespace, "https://w3id.org/marco-bolo/");
        assert_eq!(options.separator, ";");
        assert_eq!(options.remote_dir, PathBuf::from("remote"));
        assert!(options.require_content_urls);
        assert!(options.input_metadata_slots.contains("metadata_publication_date"));
        let agent = &options.synthetic_tables[0];
        assert_eq!(agent.name, "Agent");
        assert_eq!(agent.id_title, "MBO Permanent Identifier*");
        assert_eq!(agent.id_column, "id");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("absent_{}.toml", uuid::Uuid::new_v4()));
        let options = load_options(&path).expect("defaults");
        assert_eq!(options, GenerateOptions::default());
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(matches!(
            parse_options("separator = 3"),
            Err(CliError::Config(_))
        ));
    }
}

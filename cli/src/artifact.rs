use std::fs;

use serde_json::Value;

use crate::error::Error;

/// Reads and parses a build-artifact (or ABI) file. Unreadable files and
/// invalid JSON produce distinct errors, both naming the path.
fn load(path: &str) -> Result<Value, Error> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Artifact(format!("Failed to read artifact file {path}: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Artifact(format!("Artifact file {path} is not valid JSON: {e}")))
}

/// Extracts a named top-level field and re-serializes it compactly, so the
/// request carries exactly that sub-field's JSON form, not the whole file.
pub fn extract_field(path: &str, field: &str) -> Result<String, Error> {
    let artifact = load(path)?;
    let fragment = artifact.get(field).ok_or_else(|| {
        Error::Artifact(format!("Artifact file {path} does not contain a '{field}' field"))
    })?;
    serde_json::to_string(fragment)
        .map_err(|e| Error::Artifact(format!("Failed to serialize '{field}' from {path}: {e}")))
}

/// Extracts the Solidity compiler `input` and `output` fields of a build-info
/// file into one compact JSON string, the payload Defender expects alongside
/// a deployment.
pub fn extract_compiler_io(path: &str) -> Result<String, Error> {
    let artifact = load(path)?;
    let mut payload = serde_json::Map::new();
    for field in ["input", "output"] {
        let fragment = artifact.get(field).ok_or_else(|| {
            Error::Artifact(format!("Artifact file {path} does not contain a '{field}' field"))
        })?;
        payload.insert(field.to_string(), fragment.clone());
    }
    serde_json::to_string(&Value::Object(payload))
        .map_err(|e| Error::Artifact(format!("Failed to serialize build info from {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/MyContract.json");
    const BUILD_INFO_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/build-info.json");

    #[test]
    fn extracts_abi_as_compact_json() {
        let abi = extract_field(ABI_FILE, "abi").unwrap();
        assert_eq!(abi, r#"[{"type":"function","name":"hello"}]"#);
    }

    #[test]
    fn missing_field_is_an_error_naming_field_and_path() {
        let err = extract_field(BUILD_INFO_FILE, "abi").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'abi'"));
        assert!(message.contains("build-info.json"));
    }

    #[test]
    fn unreadable_file_is_an_error_naming_the_path() {
        let err = extract_field("no/such/file.json", "abi").unwrap_err();
        assert!(err.to_string().contains("no/such/file.json"));
    }

    #[test]
    fn non_json_file_is_a_distinct_error() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/not-json.txt");
        let err = extract_field(path, "abi").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn extracts_compiler_input_and_output() {
        let payload = extract_compiler_io(BUILD_INFO_FILE).unwrap();
        assert_eq!(
            payload,
            r#"{"input":{"language":"Solidity","sources":{}},"output":{"contracts":{}}}"#
        );
    }
}

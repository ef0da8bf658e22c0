// Key scheme over the flat contract namespace.
//
// `project_keys` holds a JSON array of ids; each id has its record under `project_{id}`.
// Nothing stops another writer from using the same prefix.

use chrono::Utc;
use rand::Rng;

pub const INDEX_KEY: &str = "project_keys";
pub const RECORD_PREFIX: &str = "project_";

const ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn record_key(id: &str) -> String {
    format!("{}{}", RECORD_PREFIX, id)
}

/// `"{unix_millis}-{7 base-36 chars}"`.
pub fn generate_project_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Parses the raw index bytes. Empty or whitespace-only input is an empty index.
pub fn parse_index(bytes: &[u8]) -> Result<Vec<String>, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("index is not UTF-8: {}", e))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| format!("index is not a JSON string array: {}", e))
}

pub fn serialize_index(ids: &[String]) -> Vec<u8> {
    // Vec<String> always serializes.
    serde_json::to_vec(ids).unwrap_or_else(|_| b"[]".to_vec())
}

use serde::{Deserialize, Deserializer, Serialize};

pub mod authentication;
pub mod dashboard;
pub mod profile;
pub mod transaction;

/// Uniform response envelope every API endpoint uses. `status == 0` signals
/// success and the payload sits in `data`; any other status is a
/// server-reported failure whose `message` is the user-facing text.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: i64,
    pub message: String,
    pub data: Option<T>,
}

/// Accepts an integer encoded either as a JSON number or as a string.
/// The history endpoint has been observed returning `offset`/`limit` both ways.
pub(crate) fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => Ok(n),
        IntOrString::Str(s) => s.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "int_or_string")]
        value: i64,
    }

    #[test]
    fn envelope_decodes_with_and_without_data() {
        let ok: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"status":0,"message":"Sukses","data":{"balance":5000}}"#)
                .unwrap();
        assert_eq!(ok.status, 0);
        assert!(ok.data.is_some());

        let err: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"status":102,"message":"Parameter tidak sesuai","data":null}"#)
                .unwrap();
        assert_eq!(err.status, 102);
        assert!(err.data.is_none());
    }

    #[test]
    fn int_or_string_accepts_both_encodings() {
        let n: Probe = serde_json::from_str(r#"{"value":5}"#).unwrap();
        assert_eq!(n.value, 5);
        let s: Probe = serde_json::from_str(r#"{"value":"5"}"#).unwrap();
        assert_eq!(s.value, 5);
    }
}

use serde::{Deserialize, Serialize};

/// Both fields are optional at the serde layer so that absent or null values
/// reach the handler's own validation instead of a framework rejection.
#[derive(Deserialize)]
pub struct SendRequest {
    #[serde(rename = "phoneList")]
    pub phone_list: Option<Vec<String>>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub results: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_uses_camel_case_phone_list() {
        let req: SendRequest =
            serde_json::from_str(r#"{"phoneList":["+15550001111"],"message":"hi"}"#).unwrap();
        assert_eq!(req.phone_list.as_deref(), Some(&["+15550001111".to_owned()][..]));
        assert_eq!(req.message.as_deref(), Some("hi"));
    }

    #[test]
    fn send_request_defaults_missing_fields_to_none() {
        let req: SendRequest = serde_json::from_str("{}").unwrap();
        assert!(req.phone_list.is_none());
        assert!(req.message.is_none());

        let req: SendRequest =
            serde_json::from_str(r#"{"phoneList":null,"message":null}"#).unwrap();
        assert!(req.phone_list.is_none());
        assert!(req.message.is_none());
    }
}

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a deeplink request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeeplinkRequest {
    pub coupang_urls: Vec<String>,
    pub sub_id: String,
}

/// Envelope returned by every partner API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeeplinkResponse {
    #[serde(rename = "rCode")]
    pub r_code: String,
    #[serde(rename = "rMessage", default, deserialize_with = "null_as_default")]
    pub r_message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Deeplink>,
}

impl DeeplinkResponse {
    pub fn is_success(&self) -> bool {
        self.r_code == "0"
    }

    /// The first non-empty short URL, if the call succeeded.
    pub fn shorten_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|d| d.shorten_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deeplink {
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub shorten_url: Option<String>,
    #[serde(default)]
    pub landing_url: Option<String>,
}

/// Failure envelopes send `null` for fields they leave out
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_field_names() {
        let body = DeeplinkRequest {
            coupang_urls: vec!["https://www.coupang.com/vp/products/1".into()],
            sub_id: "partner".into(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "coupangUrls": ["https://www.coupang.com/vp/products/1"],
                "subId": "partner"
            })
        );
    }

    #[test]
    fn success_response_exposes_short_url() {
        let raw = r#"{
            "rCode": "0",
            "rMessage": "",
            "data": [{
                "originalUrl": "https://www.coupang.com/vp/products/1",
                "shortenUrl": "https://link.coupang.com/a/abc",
                "landingUrl": "https://link.coupang.com/re/AFFSDP?lptag=x"
            }]
        }"#;

        let resp: DeeplinkResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.shorten_url(), Some("https://link.coupang.com/a/abc"));
    }

    #[test]
    fn empty_data_has_no_short_url() {
        let raw = r#"{"rCode": "0", "rMessage": "ok", "data": []}"#;
        let resp: DeeplinkResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.shorten_url(), None);

        let raw = r#"{"rCode": "0", "data": [{"shortenUrl": ""}]}"#;
        let resp: DeeplinkResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.shorten_url(), None);
    }

    #[test]
    fn failure_code_is_not_success() {
        let raw = r#"{"rCode": "400", "rMessage": "Invalid url"}"#;
        let resp: DeeplinkResponse = serde_json::from_str(raw).unwrap();
        assert!(!resp.is_success());
        assert!(resp.data.is_empty());
    }

    #[test]
    fn null_fields_in_failure_envelope_are_accepted() {
        let raw = r#"{"rCode": "400", "rMessage": "Invalid subId", "data": null}"#;
        let resp: DeeplinkResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.r_code, "400");
        assert_eq!(resp.r_message, "Invalid subId");
        assert!(resp.data.is_empty());

        let raw = r#"{"rCode": "500", "rMessage": null, "data": null}"#;
        let resp: DeeplinkResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.r_message, "");
    }
}

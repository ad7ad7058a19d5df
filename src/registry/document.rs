use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::error::Result;

// Field names follow the registry's wire format, which mixes snake_case
// with a couple of camelCase keys.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub tnved_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    #[serde(rename = "importRequest", default)]
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub production_type: String,
    #[serde(default)]
    pub products: Vec<Product>,
    pub reg_date: NaiveDate,
    pub reg_number: String,
}

impl Document {
    /// JSON body as sent to the registry.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};

    pub(crate) fn sample_document() -> Document {
        Document {
            description: Some(Description { participant_inn: "7700000000".into() }),
            doc_id: "doc-1".into(),
            doc_status: "NEW".into(),
            doc_type: "LP_INTRODUCE_GOODS".into(),
            import_request: true,
            owner_inn: "7700000001".into(),
            participant_inn: "7700000000".into(),
            producer_inn: "7700000002".into(),
            production_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            production_type: "OWN_PRODUCTION".into(),
            products: vec![Product {
                certificate_document: None,
                certificate_document_date: None,
                certificate_document_number: None,
                owner_inn: "7700000001".into(),
                producer_inn: "7700000002".into(),
                production_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                tnved_code: "6401100000".into(),
                uit_code: Some("010460406000600021N4N57RSCBUZTQ".into()),
                uitu_code: None,
            }],
            reg_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            reg_number: "REG-42".into(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let payload = sample_document().to_payload().unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(value["importRequest"], json!(true));
        assert_eq!(value["description"]["participantInn"], json!("7700000000"));
        assert_eq!(value["production_date"], json!("2024-01-15"));
        assert_eq!(value["products"][0]["tnved_code"], json!("6401100000"));
        // Unset optional fields are omitted rather than sent as null
        assert!(value["products"][0].get("uitu_code").is_none());
    }

    #[test]
    fn test_parses_registry_json() {
        let raw = json!({
            "doc_id": "abc",
            "doc_status": "NEW",
            "doc_type": "LP_INTRODUCE_GOODS",
            "owner_inn": "1",
            "participant_inn": "2",
            "producer_inn": "3",
            "production_date": "2023-12-31",
            "production_type": "OWN_PRODUCTION",
            "reg_date": "2024-01-01",
            "reg_number": "R1"
        });
        let document = Document::from_json(raw.to_string().as_bytes()).unwrap();

        assert!(!document.import_request);
        assert!(document.products.is_empty());
        assert!(document.description.is_none());
        assert_eq!(document.reg_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_rejects_malformed_date() {
        let raw = br#"{"doc_id":"a","doc_status":"s","doc_type":"t","owner_inn":"1","participant_inn":"2","producer_inn":"3","production_date":"15.01.2024","production_type":"p","reg_date":"2024-01-01","reg_number":"r"}"#;
        assert!(Document::from_json(raw).is_err());
    }
}

use serde::{Deserialize, Serialize};

use crate::collection::null_as_default;

/// A membership record as returned by the membership search service.
///
/// Only `id` and `recurring_collection_id` drive processing; the rest is kept
/// so the record can be echoed back in JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_renewal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_account_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_account: Option<MembershipAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_trial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub jobs: Vec<Job>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub perks: Vec<Perk>,
}

impl Membership {
    /// The collection id, treating an empty string as absent.
    pub fn collection_id(&self) -> Option<&str> {
        self.recurring_collection_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipAccount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_names: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_payload_ignoring_unknown_fields() {
        let json = r#"[{
            "id": "m-1",
            "website": "ES",
            "status": "ACTIVATED",
            "memberAccountId": 42,
            "recurringCollectionId": "rc-9",
            "feeContainerId": null,
            "memberStatusActions": ["ACTIVATION"],
            "jobs": [{"jobId": "j1", "jobType": "RENEWAL"}]
        }]"#;
        let parsed: Vec<Membership> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "m-1");
        assert_eq!(parsed[0].collection_id(), Some("rc-9"));
        assert_eq!(parsed[0].member_account_id, Some(42));
        assert_eq!(parsed[0].jobs[0].job_type.as_deref(), Some("RENEWAL"));
    }

    #[test]
    fn blank_collection_id_counts_as_missing() {
        let m: Membership = serde_json::from_str(r#"{"id":"m","recurringCollectionId":""}"#).unwrap();
        assert_eq!(m.collection_id(), None);
        let m: Membership = serde_json::from_str(r#"{"id":"m","jobs":null}"#).unwrap();
        assert_eq!(m.collection_id(), None);
        assert!(m.jobs.is_empty());
    }

    #[test]
    fn null_account_and_ids_do_not_fail_decode() {
        let json = r#"[{"id":"m1","recurringCollectionId":"rc1","memberAccount":{"id":null}},
                       {"id":null,"recurringCollectionId":"rc2"}]"#;
        let parsed: Vec<Membership> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].collection_id(), Some("rc1"));
        assert_eq!(parsed[0].member_account.as_ref().unwrap().id, "");
        assert_eq!(parsed[1].id, "");
        assert_eq!(parsed[1].collection_id(), Some("rc2"));
    }
}

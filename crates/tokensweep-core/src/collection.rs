use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// RecurringCollection
// ---------------------------------------------------------------------------

/// A recurring-collection record: the payment instruments and transaction
/// history used to bill one membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: Website,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_instrument_relationships: Vec<PaymentInstrumentTokenRelationship>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceId {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    #[serde(default)]
    pub code: Option<String>,
}

// ---------------------------------------------------------------------------
// Payment instrument tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrumentTokenRelationship {
    #[serde(default)]
    pub payment_instrument_token: Option<PaymentInstrumentToken>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub creation_date_in_millis: Option<serde_json::Value>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub preferred_by_customer: Option<bool>,
}

impl PaymentInstrumentTokenRelationship {
    /// The token value, if the relationship carries a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.payment_instrument_token
            .as_ref()
            .and_then(|t| t.token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstrumentToken {
    #[serde(default)]
    pub token: Option<String>,
}

// ---------------------------------------------------------------------------
// Transactions (history; not used for processing)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub recurring_order_type: Option<String>,
    #[serde(default)]
    pub sent_recurring_order_id: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recurring_product_ids: Vec<RecurringProductId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recurring_order_id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transaction_id: ResourceId,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
    #[serde(default)]
    pub successful: Option<bool>,
    #[serde(default)]
    pub error_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringProductId {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub product_type: String,
}

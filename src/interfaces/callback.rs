use serde::Serialize;
use std::collections::BTreeMap;

/// What the gateway appends to the merchant callback URL.
///
/// Every field is optional: the gateway drops different keys depending on how
/// the payment ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallbackRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Keys we do not interpret, kept as received.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CallbackRecord {
    /// Parses a callback query string. Never fails.
    ///
    /// Accepts `a=1&b=2`, `?a=1&b=2`, a request URI such as `/callback?a=1` or
    /// a full URL. Values are percent-decoded
    /// and the last occurrence of a repeated key wins.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let query = if let Some(query) = input.strip_prefix('?') {
            query
        } else if let Some((head, query)) = input.split_once('?')
            && !head.contains(['=', '&'])
        {
            query
        } else if input.contains("://") {
            input.split_once('?').map_or("", |(_, q)| q)
        } else {
            input
        };
        let query = query.split_once('#').map_or(query, |(q, _)| q);

        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    /// Builds a record from already-decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            let slot = match key.as_str() {
                "merchant" => &mut record.merchant,
                "order_id" => &mut record.order_id,
                "payment_ref_id" => &mut record.payment_ref_id,
                "status" => &mut record.status,
                "status_code" => &mut record.status_code,
                "message" => &mut record.message,
                _ => {
                    record.extra.insert(key, value);
                    continue;
                }
            };
            *slot = Some(value);
        }
        record
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("Success")
    }
}

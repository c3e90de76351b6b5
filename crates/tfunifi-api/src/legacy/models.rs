// Legacy API response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware versions.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Firewall rule ────────────────────────────────────────────────────

/// Firewall rule object from `rest/firewallrule`.
///
/// Only the fields the ordering logic and operators look at are modeled;
/// matching criteria (addresses, ports, groups, states) land in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Ruleset name exactly as the controller spells it, e.g. `LAN_IN` or `WANv6_LOCAL`.
    #[serde(default)]
    pub ruleset: String,
    /// Rank within the ruleset. Older firmware sends it as a string.
    #[serde(default, deserialize_with = "deserialize_rule_index")]
    pub rule_index: i32,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub logging: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of a `cmd/firewall` reorder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleIndexUpdate {
    #[serde(rename = "_id")]
    pub id: String,
    /// Sent as a decimal string, which is what the controller expects here.
    #[serde(
        serialize_with = "serialize_index_as_string",
        deserialize_with = "deserialize_rule_index"
    )]
    pub rule_index: i32,
}

impl FirewallRuleIndexUpdate {
    pub fn new(id: impl Into<String>, rule_index: i32) -> Self {
        Self {
            id: id.into(),
            rule_index,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

/// Accepts `2000`, `"2000"`, `""` and `null` (the last two as 0).
fn deserialize_rule_index<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(0),
        Some(IntOrString::Int(n)) => i32::try_from(n).map_err(D::Error::custom),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(0),
        Some(IntOrString::Str(s)) => s.trim().parse().map_err(D::Error::custom),
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_index_as_string<S>(index: &i32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_index_accepts_number_string_and_empty() {
        let rules: Vec<FirewallRule> = serde_json::from_value(json!([
            { "_id": "a", "ruleset": "LAN_IN", "rule_index": 2001 },
            { "_id": "b", "ruleset": "LAN_IN", "rule_index": "4000" },
            { "_id": "c", "ruleset": "LAN_IN", "rule_index": "" },
            { "_id": "d", "ruleset": "LAN_IN" }
        ]))
        .unwrap();

        let indices: Vec<i32> = rules.iter().map(|r| r.rule_index).collect();
        assert_eq!(indices, vec![2001, 4000, 0, 0]);
    }

    #[test]
    fn unknown_fields_are_kept_in_extra() {
        let rule: FirewallRule = serde_json::from_value(json!({
            "_id": "a",
            "ruleset": "WAN_IN",
            "rule_index": 2000,
            "src_firewallgroup_ids": ["g1"],
            "state_established": true
        }))
        .unwrap();

        assert_eq!(rule.extra.get("state_established"), Some(&json!(true)));
        assert!(rule.extra.contains_key("src_firewallgroup_ids"));
    }

    #[test]
    fn index_update_serializes_index_as_string() {
        let update = FirewallRuleIndexUpdate::new("abc", 2003);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "_id": "abc", "rule_index": "2003" })
        );
    }
}

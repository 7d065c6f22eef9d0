//! Inventory filter expressions
//!
//! Small builders for the filter language of `ListResources`. Values are always
//! quoted, enum literals never are.

use crate::relation::Relation;
use invgw_proto::TelemetryResourceKind;

/// Quote a string value, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// `field = "value"`
pub fn eq(field: &str, value: &str) -> String {
    format!("{field} = {}", quote(value))
}

/// `has(edge) AND edge.path = "value"`
pub fn edge_eq(edge: &str, path: &str, value: &str) -> String {
    format!("has({edge}) AND {edge}.{path} = {}", quote(value))
}

/// `field ~ "value"`, substring match.
pub fn contains(field: &str, value: &str) -> String {
    format!("{field} ~ {}", quote(value))
}

/// `kind = TELEMETRY_RESOURCE_KIND_X`
pub fn telemetry_kind(kind: TelemetryResourceKind) -> String {
    format!("kind = {}", kind.as_str_name())
}

/// AND all non-empty operands. Each operand is parenthesised when more than
/// one remains.
pub fn and_all<I, S>(operands: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = operands
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => parts
            .iter()
            .map(|p| format!("({p})"))
            .collect::<Vec<_>>()
            .join(" AND "),
    }
}

/// Direct listing filter of telemetry profiles: the kind predicate, plus an
/// OR-group with one `has(edge) AND edge.resource_id = "id"` per set relation.
pub fn telemetry_profile_filter(kind: TelemetryResourceKind, relation: &Relation<'_>) -> String {
    let kind = telemetry_kind(kind);
    let predicates: Vec<String> = relation
        .edges()
        .map(|(edge, id)| edge_eq(edge, "resource_id", id))
        .collect();

    let filter = if predicates.is_empty() {
        kind
    } else {
        format!("{kind} AND ({})", predicates.join(" OR "))
    };
    tracing::debug!(%filter, "built telemetry profile filter");
    filter
}

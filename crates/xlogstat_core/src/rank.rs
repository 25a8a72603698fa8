//! Top relations by page activity.

use crate::resolver::RelationResolver;
use crate::stats::RelationPageMap;
use serde::Serialize;

/// A ranked relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRelation {
    /// Relation id as found in the dump.
    pub relation_id: String,
    /// Resolved relation name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of distinct pages touched.
    pub distinct_pages: u64,
}

impl RankedRelation {
    /// The identity to show: the resolved name, else the relation id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.relation_id)
    }
}

/// Returns up to `limit` relations ordered by distinct page count.
///
/// Relations with more distinct pages come first; ties are ordered by
/// ascending relation id.
#[must_use]
pub fn rank(map: &RelationPageMap, limit: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(&String, u64)> = map
        .iter()
        .map(|(relation, pages)| (relation, pages.len() as u64))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(relation, pages)| (relation.clone(), pages))
        .collect()
}

/// Like [`rank`], attaching names from an optional resolver.
///
/// A resolver error is logged and treated like an unknown relation.
#[must_use]
pub fn rank_resolved(
    map: &RelationPageMap,
    limit: usize,
    resolver: Option<&dyn RelationResolver>,
) -> Vec<RankedRelation> {
    rank(map, limit)
        .into_iter()
        .map(|(relation_id, distinct_pages)| {
            let name = resolver.and_then(|r| match r.resolve(&relation_id) {
                Ok(name) => {
                    if name.is_none() {
                        tracing::trace!(relation = %relation_id, "relation name not found");
                    }
                    name
                }
                Err(e) => {
                    tracing::warn!(relation = %relation_id, error = %e, "relation name lookup failed");
                    None
                }
            });
            RankedRelation {
                relation_id,
                name,
                distinct_pages,
            }
        })
        .collect()
}

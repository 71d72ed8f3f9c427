//! Union of two overlapping sources that name the same logical item by
//! different keys.
//!
//! Source A is authoritative. A source B item is kept only when neither its
//! own identifier nor its cross-reference has been seen, and keeping it marks
//! both as seen. Iteration order is A first, then B in input order; the
//! result depends on that order.
//!
//! Cross-references between two B items are honoured in B order only: the
//! item visited first is kept and the other is dropped.

use std::collections::BTreeSet;

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    canonical_ids: Vec<String>,
    accepted_b: Vec<usize>,
    seen: BTreeSet<String>,
}

impl Reconciliation {
    /// Identifiers of the logical items, A before B, without duplicates.
    pub fn canonical_ids(&self) -> &[String] {
        &self.canonical_ids
    }

    /// Indices into source B of the items that survived.
    pub fn accepted_b(&self) -> &[usize] {
        &self.accepted_b
    }

    /// Every identifier marked as seen, including cross-references.
    pub fn seen(&self) -> &BTreeSet<String> {
        &self.seen
    }

    /// Number of distinct logical items.
    pub fn count(&self) -> usize {
        self.canonical_ids.len()
    }
}

/// Merge two sources by identifier-set union.
///
/// # Examples
/// ```
/// use admin_console::domain::reconcile::reconcile;
///
/// let a = ["a1", "a2"];
/// let b = [("a1", None), ("b1", Some("a2")), ("b2", None)];
/// let merged = reconcile(
///     &a,
///     &b,
///     |id| id.to_string(),
///     |(id, _)| id.to_string(),
///     |(_, xref)| xref.map(str::to_owned),
/// );
/// assert_eq!(merged.canonical_ids(), ["a1", "a2", "b2"]);
/// assert_eq!(merged.accepted_b(), [2]);
/// ```
pub fn reconcile<A, B>(
    source_a: &[A],
    source_b: &[B],
    id_a: impl Fn(&A) -> String,
    id_b: impl Fn(&B) -> String,
    xref_b: impl Fn(&B) -> Option<String>,
) -> Reconciliation {
    let mut merged = Reconciliation::default();
    for item in source_a {
        let id = id_a(item);
        if merged.seen.insert(id.clone()) {
            merged.canonical_ids.push(id);
        }
    }
    for (index, item) in source_b.iter().enumerate() {
        let id = id_b(item);
        let xref = xref_b(item);
        let xref_seen = xref.as_ref().is_some_and(|xref| merged.seen.contains(xref));
        if merged.seen.contains(&id) || xref_seen {
            continue;
        }
        merged.seen.insert(id.clone());
        if let Some(xref) = xref {
            merged.seen.insert(xref);
        }
        merged.canonical_ids.push(id);
        merged.accepted_b.push(index);
    }
    merged
}

use crate::Document;

/// Decides whether the startup catalog is registered but unsearchable.
///
/// True only when there is at least one document and none of them has any
/// chunks. A catalog where only some documents lack chunks is left alone;
/// this is a coarse heuristic, not a per-document health check.
pub fn needs_reindex(documents: &[Document]) -> bool {
    !documents.is_empty() && documents.iter().all(|doc| doc.chunk_count() == 0)
}

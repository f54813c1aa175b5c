//! Context Stitcher - joins retrieved chunks into one context block

use crate::retrieval::RetrievedChunk;

/// Marker used in place of context when retrieval returns nothing
pub const NO_CONTEXT_MARKER: &str = "No context found";

/// Separator placed between consecutive chunks
pub const CONTEXT_SEPARATOR: &str =
    " \n ********** \n ## Next Context ## \n  Moving on to another relevant document: \n  ********** \n ";

/// Join chunk texts in retrieval order.
/// An empty slice yields [`NO_CONTEXT_MARKER`].
pub fn stitch(chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return NO_CONTEXT_MARKER.to_string();
    }

    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

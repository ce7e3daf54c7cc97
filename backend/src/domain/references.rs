//! Inline gallery-reference resolution.
//!
//! Page content may embed galleries with the literal token `gallery(Name)`.
//! At render time each token is matched, case sensitively, against the
//! owning document's gallery names. Matches carry the gallery id; misses
//! carry the attempted name so clients can render an inline error without
//! aborting the rest of the content.

use super::content::{AssembledGallery, GalleryId};

/// Opening marker of a gallery reference token.
const MARKER: &str = "gallery(";

/// One `gallery(Name)` occurrence, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryReference {
    /// Byte offset of the token's `gallery(` marker within the content.
    pub offset: usize,
    /// The name as written between the parentheses.
    pub name: String,
    /// Resolution outcome for this token.
    pub target: ReferenceTarget,
}

/// Whether a reference matched a known gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// The name matched a gallery of the same document.
    Resolved { gallery_id: GalleryId },
    /// No gallery with this name exists; non-fatal for later tokens.
    Unresolved,
}

impl GalleryReference {
    /// Whether this reference resolved to a gallery.
    pub fn is_resolved(&self) -> bool {
        matches!(self.target, ReferenceTarget::Resolved { .. })
    }
}

/// Scan `content` for `gallery(Name)` tokens and resolve each against
/// `galleries`.
///
/// Resolution is a linear scan over the raw text followed by an exact,
/// case-sensitive lookup per token. Tokens are returned in the order they
/// appear; an unresolved token never blocks resolution of later ones.
/// A token without a closing parenthesis is not a reference and is ignored.
pub fn resolve_gallery_references(
    content: &str,
    galleries: &[AssembledGallery],
) -> Vec<GalleryReference> {
    let mut references = Vec::new();
    let mut cursor = 0;

    while let Some(found) = content[cursor..].find(MARKER) {
        let start = cursor + found;
        let name_start = start + MARKER.len();
        let Some(close) = content[name_start..].find(')') else {
            break;
        };
        let name = &content[name_start..name_start + close];
        let target = galleries
            .iter()
            .find(|assembled| assembled.gallery.name.as_ref() == name)
            .map_or(ReferenceTarget::Unresolved, |assembled| {
                ReferenceTarget::Resolved {
                    gallery_id: assembled.gallery.id,
                }
            });
        references.push(GalleryReference {
            offset: start,
            name: name.to_owned(),
            target,
        });
        cursor = name_start + close + 1;
    }

    references
}

//! Ownership gate for document access.
//!
//! Missing or invalid credentials are rejected earlier, in the bearer
//! extractor, with 401. This gate only answers the narrower question:
//! does the already-authenticated caller own the target document?

use super::content::Document;
use super::error::Error;
use super::user::UserId;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Authorized,
    Forbidden,
}

/// Check whether `caller` owns `document`.
pub fn check_document_owner(caller: &UserId, document: &Document) -> AccessDecision {
    if document.owner_id == *caller {
        AccessDecision::Authorized
    } else {
        AccessDecision::Forbidden
    }
}

/// Require ownership, returning a Forbidden error otherwise.
pub fn ensure_document_owner(caller: &UserId, document: &Document) -> Result<(), Error> {
    match check_document_owner(caller, document) {
        AccessDecision::Authorized => Ok(()),
        AccessDecision::Forbidden => Err(Error::forbidden("document belongs to another user")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{DocumentId, DocumentTitle};
    use crate::domain::error::ErrorCode;

    fn document(owner: UserId) -> Document {
        Document {
            id: DocumentId::random(),
            title: DocumentTitle::new("Notes").expect("valid title"),
            owner_id: owner,
        }
    }

    #[test]
    fn owner_is_authorized() {
        let owner = UserId::random();
        let doc = document(owner);
        assert_eq!(
            check_document_owner(&owner, &doc),
            AccessDecision::Authorized
        );
        assert!(ensure_document_owner(&owner, &doc).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        let doc = document(UserId::random());
        let stranger = UserId::random();
        assert_eq!(
            check_document_owner(&stranger, &doc),
            AccessDecision::Forbidden
        );
        let err = ensure_document_owner(&stranger, &doc).expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}

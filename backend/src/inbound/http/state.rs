//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TokenService;
use crate::domain::{AccountService, ContentService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub content: ContentService,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    pub fn new(
        accounts: AccountService,
        content: ContentService,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            content,
            tokens,
        }
    }
}

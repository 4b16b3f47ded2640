//! Caller identity contract.
//!
//! The core never sees raw credentials. Whatever owns the transport decodes
//! them and hands the core a resolved `UserId` through this trait.

use crate::model::note::UserId;
use thiserror::Error;

/// Reasons an identity could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallerError {
    #[error("no caller credentials supplied")]
    MissingCredentials,
    #[error("caller credentials rejected: {0}")]
    InvalidCredentials(String),
}

/// Resolves the authenticated user behind one inbound request.
pub trait CallerContext<Req: ?Sized> {
    fn resolve_caller_identity(&self, request: &Req) -> Result<UserId, CallerError>;
}

impl<Req: ?Sized, F> CallerContext<Req> for F
where
    F: Fn(&Req) -> Result<UserId, CallerError>,
{
    fn resolve_caller_identity(&self, request: &Req) -> Result<UserId, CallerError> {
        self(request)
    }
}

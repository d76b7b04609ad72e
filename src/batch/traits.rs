use crate::error::ClientError;
use crate::scribe::{
    FocusedRequest, FocusedResult, GhostWriteRequest, GhostWritten, ResolveRequest, ResolveResult,
};
use std::future::Future;
use std::pin::Pin;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

/// The scribe endpoints as seen from the client.
pub trait SuggestionBackend: Send + Sync {
    fn focused<'a>(&'a self, request: &'a FocusedRequest) -> BackendFuture<'a, FocusedResult>;

    fn resolve<'a>(&'a self, request: &'a ResolveRequest) -> BackendFuture<'a, ResolveResult>;

    fn ghost_write<'a>(&'a self, request: &'a GhostWriteRequest) -> BackendFuture<'a, GhostWritten>;
}

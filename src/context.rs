//! Dialogue Context
//!
//! A context is an opaque tag passed as extra input to semantic actions.
//! Grammar rules may only compose fragments originating from the same
//! context; this prevents stitching together semantically inconsistent
//! utterance fragments.
//!
//! Contexts have reference identity: two contexts are the same context if
//! and only if they are the same allocation. "Absent" is `Option::None`;
//! a context value is never a sentinel instance.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Reference-identity dialogue-state tag.
///
/// `private` is a value only meaningful to the expansion driver; `info` is
/// the value handed to semantic actions at the position where the context
/// appears among a rule's children. Both are opaque to this core.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    private: Box<dyn Any + Send + Sync>,
    info: Box<dyn Any + Send + Sync>,
}

impl Context {
    /// Create a context. The driver creates one per dialogue turn/state.
    pub fn new<P, I>(private: P, info: I) -> Self
    where
        P: Any + Send + Sync,
        I: Any + Send + Sync,
    {
        Context {
            inner: Arc::new(Inner {
                private: Box::new(private),
                info: Box::new(info),
            }),
        }
    }

    /// The driver-side value.
    pub fn private(&self) -> &(dyn Any + Send + Sync) {
        self.inner.private.as_ref()
    }

    /// The value visible to semantic actions.
    pub fn info(&self) -> &(dyn Any + Send + Sync) {
        self.inner.info.as_ref()
    }

    /// True if either side is absent or both are the same context.
    pub fn compatible(a: Option<&Context>, b: Option<&Context>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// The non-absent side, left-biased when both are present.
    ///
    /// Callers must have checked [`Context::compatible`] first; `meet` never
    /// reconciles two distinct contexts.
    pub fn meet(a: Option<Context>, b: Option<Context>) -> Option<Context> {
        a.or(b)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({:p})", Arc::as_ptr(&self.inner))
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CTX[{:p}]", Arc::as_ptr(&self.inner))
    }
}

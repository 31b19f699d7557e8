//! Weave: Derivation Algebra for Synthetic Corpus Generation
//!
//! An immutable, combinator-based representation of partially- or
//! fully-instantiated sentences, each carrying a composed semantic value, a
//! dialogue-context tag, and a search-ranking priority. An external expansion
//! driver applies grammar rules by invoking combinators over child
//! derivations; every application either produces a new derivation or rejects
//! the candidate.

pub mod combinator;
pub mod context;
pub mod derivation;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod sequence;
pub mod slot;
pub mod symbol;

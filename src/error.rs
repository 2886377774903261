use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use alloy::primitives::{B256, U256};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error related to malformed inputs (index sets, condition identifiers)
    Validation,
    /// Error related to a violated caller precondition (overlap, empty input)
    Precondition,
    /// Error related to condition lifecycle state (e.g. unresolved conditions)
    State,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

/// An index set is zero or has bits set beyond the condition's outcome slots.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct InvalidIndexSet {
    pub index_set: U256,
    pub outcome_slot_count: u32,
}

impl fmt::Display for InvalidIndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index set {} out of range for {} outcome slots",
            self.index_set, self.outcome_slot_count
        )
    }
}

impl StdError for InvalidIndexSet {}

impl From<InvalidIndexSet> for Error {
    fn from(err: InvalidIndexSet) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

/// Input is not a well-formed 32-byte condition identifier.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct MalformedConditionId {
    pub input: String,
}

impl fmt::Display for MalformedConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed condition id: {:?}", self.input)
    }
}

impl StdError for MalformedConditionId {}

impl From<MalformedConditionId> for Error {
    fn from(err: MalformedConditionId) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

/// The same condition id appeared more than once in a collection combination.
///
/// A position may reference each condition at most once; the sorted-fold
/// collection derivation has no meaningful output for repeats.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct DuplicateCondition {
    pub condition_id: B256,
}

impl fmt::Display for DuplicateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "condition {} appears more than once", self.condition_id)
    }
}

impl StdError for DuplicateCondition {}

impl From<DuplicateCondition> for Error {
    fn from(err: DuplicateCondition) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

/// Two index sets assumed disjoint share at least one set bit.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct OverlappingIndexSets {
    pub a: U256,
    pub b: U256,
}

impl fmt::Display for OverlappingIndexSets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index sets {} and {} overlap on {}",
            self.a,
            self.b,
            self.a & self.b
        )
    }
}

impl StdError for OverlappingIndexSets {}

impl From<OverlappingIndexSets> for Error {
    fn from(err: OverlappingIndexSets) -> Self {
        Error::with_source(Kind::Precondition, err)
    }
}

/// Redemption math was requested against a condition the oracle has not
/// reported on yet.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct ConditionNotResolved {
    pub condition_id: B256,
}

impl fmt::Display for ConditionNotResolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "condition {} is not resolved", self.condition_id)
    }
}

impl StdError for ConditionNotResolved {}

impl From<ConditionNotResolved> for Error {
    fn from(err: ConditionNotResolved) -> Self {
        Error::with_source(Kind::State, err)
    }
}

/// A statistic was requested over zero elements.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct EmptySequence;

impl fmt::Display for EmptySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "empty sequence: at least one element is required")
    }
}

impl StdError for EmptySequence {}

impl From<EmptySequence> for Error {
    fn from(err: EmptySequence) -> Self {
        Error::with_source(Kind::Precondition, err)
    }
}

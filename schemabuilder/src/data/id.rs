use std::fmt;

use uuid::Uuid;

/// Opaque identifier of a field, unique across the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(Uuid);

impl FieldId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh field ids.
///
/// The store owns one of these, so callers decide whether ids are random
/// or deterministic.
pub trait IdSource: fmt::Debug + Send {
    /// Produce an id that this source has never returned before.
    fn next_id(&mut self) -> FieldId;
}

/// Random (UUID v4) ids.
#[derive(Debug, Default, Clone)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> FieldId {
        FieldId(Uuid::new_v4())
    }
}

/// Monotonic ids: `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    issued: u128,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> FieldId {
        self.issued += 1;
        FieldId(Uuid::from_u128(self.issued))
    }
}

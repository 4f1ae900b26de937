use auditrail_common::{KeyType, PerformerMode, performer_column};
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Iterable};

/// Physical columns backing the create/update audit roles of an entity.
/// A role without a column is skipped when stamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditColumns<C> {
    pub created_at: Option<C>,
    pub created_by: Option<C>,
    pub updated_at: Option<C>,
    pub updated_by: Option<C>,
}

impl<C: ColumnTrait> AuditColumns<C> {
    /// Resolves `created_at`, `created_by`, `updated_at` and `updated_by` by
    /// name.
    pub fn conventional() -> Self {
        Self {
            created_at: column_named("created_at"),
            created_by: column_named("created_by"),
            updated_at: column_named("updated_at"),
            updated_by: column_named("updated_by"),
        }
    }

    pub fn none() -> Self {
        Self {
            created_at: None,
            created_by: None,
            updated_at: None,
            updated_by: None,
        }
    }

    pub fn with_created(mut self, at: C, by: Option<C>) -> Self {
        self.created_at = Some(at);
        self.created_by = by;
        self
    }

    pub fn with_updated(mut self, at: C, by: Option<C>) -> Self {
        self.updated_at = Some(at);
        self.updated_by = by;
        self
    }
}

/// Physical columns backing soft-delete and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftDeleteColumns<C> {
    pub deleted_at: C,
    pub deleted_by: Option<C>,
    pub restore_at: Option<C>,
    pub restore_by: Option<C>,
}

impl<C: ColumnTrait> SoftDeleteColumns<C> {
    /// Pairs `deleted_at` with its `*_by` column (`archived_at` ->
    /// `archived_by`) and looks up `restore_at` / `restore_by` by name.
    pub fn new(deleted_at: C) -> Self {
        Self {
            deleted_at,
            deleted_by: column_named(&performer_column(deleted_at.as_str())),
            restore_at: column_named("restore_at"),
            restore_by: column_named("restore_by"),
        }
    }

    pub fn with_restore(mut self, at: Option<C>, by: Option<C>) -> Self {
        self.restore_at = at;
        self.restore_by = by;
        self
    }
}

/// Records whose mutations are stamped with a timestamp and a performer.
pub trait Auditable: EntityTrait {
    /// Key type of the record's own primary key.
    fn key_type() -> KeyType {
        KeyType::Int
    }

    /// Overrides the configured performer mode for this table.
    fn performer_mode() -> Option<PerformerMode> {
        None
    }

    fn audit_columns() -> AuditColumns<Self::Column> {
        AuditColumns::conventional()
    }
}

/// Records deleted by timestamp instead of row removal.
pub trait SoftDeletable: EntityTrait {
    fn soft_delete_columns() -> SoftDeleteColumns<Self::Column>;
}

pub(crate) fn column_named<C: ColumnTrait>(name: &str) -> Option<C> {
    C::iter().find(|column| column.as_str() == name)
}

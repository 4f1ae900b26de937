//! 审计轨迹：新增、更新、软删除与恢复时写入时间戳和执行者
//!
//! 实体在注册时一次性解析审计列，之后每次操作只做赋值与持久化。

use crate::columns::{AuditColumns, Auditable, SoftDeletable, SoftDeleteColumns};
use crate::context::OperationContext;
use crate::events::{EventBus, RecordEvent, RecordEventKind, RecordObserver};
use crate::values::{fit_to_column, is_null, null_value, text_of, timestamp_value};
use auditrail_common::{
    AuditConfig, AuditError, GeneratedKey, KeyType, Performer, PerformerMode, PlainPerformer,
    Result,
};
use chrono::{DateTime, FixedOffset};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityName,
    EntityTrait, IdenStatic, IntoActiveModel, Iterable, ModelTrait, PrimaryKeyToColumn,
    QueryFilter, Value,
};
use std::ops::Deref;
use std::sync::Arc;

/// Shared configuration and observers; hands out per-entity auditors.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    config: Arc<AuditConfig>,
    events: EventBus,
}

impl AuditTrail {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config: Arc::new(config),
            events: EventBus::default(),
        }
    }

    /// Observers must be attached before entities are registered.
    pub fn with_observer(mut self, observer: impl RecordObserver + 'static) -> Self {
        self.events.subscribe(observer);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn register<E: Auditable>(&self) -> RecordAuditor<E> {
        let columns = E::audit_columns();
        let mode = E::performer_mode().unwrap_or(self.config.performer_mode);
        let key_type = E::key_type();
        let table = E::default().table_name().to_string();
        tracing::debug!(
            table = %table,
            performer_mode = %mode,
            key_type = %key_type,
            "registered auditable entity"
        );

        RecordAuditor {
            config: self.config.clone(),
            events: self.events.clone(),
            table,
            columns,
            mode,
            key_type,
        }
    }
}

/// Performer recorded in an audit column.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformerRef {
    /// Foreign-key value into the principal table.
    User(Value),
    Plain(PlainPerformer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome<M> {
    Restored(M),
    /// A `restoring` observer vetoed; nothing was written.
    Vetoed(M),
    /// The record was not soft-deleted; nothing was written.
    NotTrashed(M),
}

impl<M> RestoreOutcome<M> {
    pub fn is_restored(&self) -> bool {
        matches!(self, Self::Restored(_))
    }

    pub fn into_model(self) -> M {
        match self {
            Self::Restored(model) | Self::Vetoed(model) | Self::NotTrashed(model) => model,
        }
    }
}

/// Audit behaviour of one entity, resolved at registration.
#[derive(Debug, Clone)]
pub struct RecordAuditor<E: EntityTrait> {
    config: Arc<AuditConfig>,
    events: EventBus,
    table: String,
    columns: AuditColumns<E::Column>,
    mode: PerformerMode,
    key_type: KeyType,
}

impl<E: Auditable> RecordAuditor<E> {
    pub fn columns(&self) -> &AuditColumns<E::Column> {
        &self.columns
    }

    pub fn performer_mode(&self) -> PerformerMode {
        self.mode
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn is_incrementing(&self) -> bool {
        self.key_type.is_incrementing()
    }

    pub fn with_soft_deletes(self) -> SoftDeleteAuditor<E>
    where
        E: SoftDeletable,
    {
        SoftDeleteAuditor {
            columns: E::soft_delete_columns(),
            records: self,
        }
    }

    /// Generates the primary key of a non-incrementing record unless the
    /// caller already set one.
    pub fn assign_key(&self, active: &mut E::ActiveModel) -> Option<GeneratedKey> {
        let column = E::PrimaryKey::iter().next()?.into_column();
        if !matches!(active.get(column), ActiveValue::NotSet) {
            return None;
        }
        let key = self.key_type.generate()?;
        active.set(column, key.to_value(column.def().get_column_type()));
        Some(key)
    }

    /// Stamps the created and updated roles of a record about to be inserted.
    pub fn stamp_create(&self, ctx: &OperationContext, active: &mut E::ActiveModel) -> Result<()> {
        let now = ctx.now();
        self.stamp(ctx, active, self.columns.created_at, self.columns.created_by, now)?;
        self.stamp(ctx, active, self.columns.updated_at, self.columns.updated_by, now)
    }

    pub fn stamp_update(&self, ctx: &OperationContext, active: &mut E::ActiveModel) -> Result<()> {
        self.stamp(
            ctx,
            active,
            self.columns.updated_at,
            self.columns.updated_by,
            ctx.now(),
        )
    }

    pub async fn insert<C>(
        &self,
        db: &C,
        ctx: &OperationContext,
        mut active: E::ActiveModel,
    ) -> Result<E::Model>
    where
        C: ConnectionTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
    {
        if let Some(key) = self.assign_key(&mut active) {
            tracing::debug!(table = %self.table, key = %key, "generated primary key");
        }
        self.stamp_create(ctx, &mut active)?;
        Ok(active.insert(db).await?)
    }

    pub async fn update<C>(
        &self,
        db: &C,
        ctx: &OperationContext,
        mut active: E::ActiveModel,
    ) -> Result<E::Model>
    where
        C: ConnectionTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
    {
        self.stamp_update(ctx, &mut active)?;
        Ok(active.update(db).await?)
    }

    pub fn creator(&self, model: &E::Model) -> Option<PerformerRef> {
        self.performer_ref(model, self.columns.created_by)
    }

    pub fn updater(&self, model: &E::Model) -> Option<PerformerRef> {
        self.performer_ref(model, self.columns.updated_by)
    }

    fn stamp(
        &self,
        ctx: &OperationContext,
        active: &mut E::ActiveModel,
        at: Option<E::Column>,
        by: Option<E::Column>,
        now: DateTime<FixedOffset>,
    ) -> Result<()> {
        if let Some(column) = at {
            active.set(column, timestamp_value(column, now));
        }
        if let Some(column) = by {
            if let Some(value) = self.performer_for(ctx, column)? {
                active.set(column, value);
            }
        }
        Ok(())
    }

    /// Performer value for `column`, or `None` when stamping is disabled,
    /// the caller supplied the column, or nobody is authenticated.
    fn performer_for(&self, ctx: &OperationContext, column: E::Column) -> Result<Option<Value>> {
        if !self.config.use_perform_by {
            return Ok(None);
        }
        if ctx.is_explicit(column.as_str()) {
            tracing::debug!(
                table = %self.table,
                column = column.as_str(),
                "keeping explicitly supplied performer"
            );
            return Ok(None);
        }
        let Some(principal) = ctx.principal() else {
            tracing::debug!(
                table = %self.table,
                column = column.as_str(),
                "no authenticated principal, performer left unset"
            );
            return Ok(None);
        };

        let value = Performer::resolve(principal, self.mode).to_value(self.config.user_key_type)?;
        let described = format!("{value:?}");
        fit_to_column(value, column).map(Some).ok_or_else(|| {
            AuditError::performer(format!(
                "performer {described} does not fit column {}.{} of type {:?}",
                self.table,
                column.as_str(),
                column.def().get_column_type()
            ))
        })
    }

    /// Like [`Self::performer_for`], but an explicitly supplied column keeps
    /// the value already carried by `model` so it is persisted as given.
    fn performer_change(
        &self,
        ctx: &OperationContext,
        model: &E::Model,
        column: E::Column,
    ) -> Result<Option<Value>> {
        if ctx.is_explicit(column.as_str()) {
            return Ok(Some(model.get(column)));
        }
        self.performer_for(ctx, column)
    }

    fn performer_ref(&self, model: &E::Model, column: Option<E::Column>) -> Option<PerformerRef> {
        let value = model.get(column?);
        match self.mode {
            PerformerMode::Users if is_null(&value) => None,
            PerformerMode::Users => Some(PerformerRef::User(value)),
            PerformerMode::Plain => Some(PerformerRef::Plain(PlainPerformer::from_label(
                text_of(&value).as_deref(),
                self.config.user_key_type,
                &self.config.fake_mail_domain,
            ))),
        }
    }

    fn event(&self, kind: RecordEventKind, model: &E::Model) -> RecordEvent {
        RecordEvent::new(kind, self.table.as_str(), primary_key_values::<E>(model))
    }
}

/// Auditor of an entity that is also soft-deletable.
#[derive(Debug, Clone)]
pub struct SoftDeleteAuditor<E: EntityTrait> {
    records: RecordAuditor<E>,
    columns: SoftDeleteColumns<E::Column>,
}

impl<E: EntityTrait> Deref for SoftDeleteAuditor<E> {
    type Target = RecordAuditor<E>;

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl<E> SoftDeleteAuditor<E>
where
    E: Auditable + SoftDeletable,
{
    pub fn soft_delete_columns(&self) -> &SoftDeleteColumns<E::Column> {
        &self.columns
    }

    pub fn is_trashed(&self, model: &E::Model) -> bool {
        !is_null(&model.get(self.columns.deleted_at))
    }

    /// Filter keeping records that are not soft-deleted.
    pub fn without_trashed(&self) -> SimpleExpr {
        self.columns.deleted_at.is_null()
    }

    pub fn only_trashed(&self) -> SimpleExpr {
        self.columns.deleted_at.is_not_null()
    }

    /// Marks the record deleted with one `UPDATE` restricted to its primary
    /// key, mirrors the written values into the returned model and emits
    /// `trashed`. The restore pair of an earlier restore is cleared. A row
    /// that no longer exists is reported as [`DbErr::RecordNotUpdated`].
    pub async fn soft_delete<C>(
        &self,
        db: &C,
        ctx: &OperationContext,
        mut model: E::Model,
    ) -> Result<E::Model>
    where
        C: ConnectionTrait,
    {
        let now = ctx.now();
        let deleted_at = self.columns.deleted_at;
        let mut changes = vec![(deleted_at, timestamp_value(deleted_at, now))];

        if let Some(column) = self.columns.deleted_by {
            if let Some(value) = self.records.performer_change(ctx, &model, column)? {
                changes.push((column, value));
            }
        }
        for column in [self.columns.restore_at, self.columns.restore_by]
            .into_iter()
            .flatten()
        {
            changes.push((column, null_value(column)));
        }
        // a delete is also an update
        let audit = self.records.columns;
        if let Some(column) = audit.updated_at {
            changes.push((column, timestamp_value(column, now)));
        }
        if let Some(column) = audit.updated_by {
            if let Some(value) = self.records.performer_change(ctx, &model, column)? {
                changes.push((column, value));
            }
        }

        let update = changes
            .iter()
            .fold(E::update_many(), |update, (column, value)| {
                update.col_expr(*column, Expr::value(value.clone()))
            });
        let result = update
            .filter(primary_key_condition::<E>(&model))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            tracing::warn!(table = %self.records.table, "soft delete matched no row");
            return Err(DbErr::RecordNotUpdated.into());
        }
        tracing::debug!(
            table = %self.records.table,
            rows = result.rows_affected,
            "soft deleted record"
        );

        for (column, value) in changes {
            model.set(column, value);
        }

        self.records
            .events
            .dispatch(&self.records.event(RecordEventKind::Trashed, &model))?;
        Ok(model)
    }

    /// Builds the active model a restore saves: clears the deleted pair,
    /// stamps the restore pair and, since a restore is a save, the updated
    /// pair.
    pub fn prepare_restore(
        &self,
        ctx: &OperationContext,
        model: &E::Model,
    ) -> Result<E::ActiveModel>
    where
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        let now = ctx.now();
        let mut active = model.clone().into_active_model();

        active.set(self.columns.deleted_at, null_value(self.columns.deleted_at));
        if let Some(column) = self.columns.deleted_by {
            active.set(column, null_value(column));
        }
        if let Some(column) = self.columns.restore_at {
            active.set(column, timestamp_value(column, now));
        }
        if let Some(column) = self.columns.restore_by {
            if let Some(value) = self.records.performer_change(ctx, model, column)? {
                active.set(column, value);
            }
        }

        let audit = self.records.columns;
        self.records
            .stamp(ctx, &mut active, audit.updated_at, audit.updated_by, now)?;
        Ok(active)
    }

    /// Restores a soft-deleted record. Restoring a record that is not
    /// trashed is a no-op reported as [`RestoreOutcome::NotTrashed`].
    pub async fn restore<C>(
        &self,
        db: &C,
        ctx: &OperationContext,
        model: E::Model,
    ) -> Result<RestoreOutcome<E::Model>>
    where
        C: ConnectionTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
    {
        if !self.is_trashed(&model) {
            return Ok(RestoreOutcome::NotTrashed(model));
        }

        let events = &self.records.events;
        if !events.dispatch(&self.records.event(RecordEventKind::Restoring, &model))? {
            return Ok(RestoreOutcome::Vetoed(model));
        }

        let active = self.prepare_restore(ctx, &model)?;
        let restored = active.update(db).await?;

        events.dispatch(&self.records.event(RecordEventKind::Restored, &restored))?;
        Ok(RestoreOutcome::Restored(restored))
    }

    /// Removes the row for good.
    pub async fn force_delete<C>(&self, db: &C, model: &E::Model) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = E::delete_many()
            .filter(primary_key_condition::<E>(model))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub fn deleter(&self, model: &E::Model) -> Option<PerformerRef> {
        self.records.performer_ref(model, self.columns.deleted_by)
    }

    pub fn restorer(&self, model: &E::Model) -> Option<PerformerRef> {
        self.records.performer_ref(model, self.columns.restore_by)
    }
}

/// Loads the principal row a users-mode performer points to.
pub async fn find_user<U, C>(db: &C, performer: &PerformerRef) -> Result<Option<U::Model>>
where
    U: EntityTrait,
    C: ConnectionTrait,
{
    let PerformerRef::User(value) = performer else {
        return Ok(None);
    };
    let Some(key) = U::PrimaryKey::iter().next() else {
        return Ok(None);
    };
    let user = U::find()
        .filter(key.into_column().eq(value.clone()))
        .one(db)
        .await?;
    Ok(user)
}

fn primary_key_values<E: EntityTrait>(model: &E::Model) -> Vec<Value> {
    E::PrimaryKey::iter()
        .map(|key| model.get(key.into_column()))
        .collect()
}

fn primary_key_condition<E: EntityTrait>(model: &E::Model) -> Condition {
    E::PrimaryKey::iter().fold(Condition::all(), |condition, key| {
        let column = key.into_column();
        condition.add(column.eq(model.get(column)))
    })
}

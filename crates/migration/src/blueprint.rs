//! 表结构蓝图：审计列、软删除列与多态引用列的生成
//!
//! 蓝图先记录一份类型化的列计划，再统一生成 sea-query 建表与索引语句。

use auditrail_common::performer::PLAIN_LABEL_MAX;
use auditrail_common::{AuditConfig, KeyType, MorphKey, MorphKeyType, PerformerMode, performer_column};
use sea_orm_migration::prelude::*;

/// Physical shape of a planned column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Auto-incrementing `bigint`.
    BigIncrements,
    BigInteger,
    BigUnsigned,
    Uuid,
    /// ULID text, 26 characters.
    Ulid,
    String(u32),
    Text,
    TimestampTz,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnSpec {
    fn to_column_def(&self) -> ColumnDef {
        let mut def = ColumnDef::new(Alias::new(&self.name));
        match self.kind {
            ColumnKind::BigIncrements => def.big_integer().auto_increment(),
            ColumnKind::BigInteger => def.big_integer(),
            ColumnKind::BigUnsigned => def.big_unsigned(),
            ColumnKind::Uuid => def.uuid(),
            ColumnKind::Ulid => def.char_len(26),
            ColumnKind::String(len) => def.string_len(len),
            ColumnKind::Text => def.text(),
            ColumnKind::TimestampTz => def.timestamp_with_time_zone(),
        };
        if self.nullable {
            def.null();
        } else {
            def.not_null();
        }
        if self.primary_key {
            def.primary_key();
        }
        def
    }
}

/// Performer foreign key into the principal table.
#[derive(Debug, Clone)]
pub struct ForeignSpec {
    pub name: String,
    pub column: String,
    pub references_table: String,
    pub references_column: String,
    pub on_update: ForeignKeyAction,
    pub on_delete: ForeignKeyAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub columns: Vec<String>,
}

/// Statements produced by [`Blueprint::build`].
#[derive(Debug, Clone)]
pub struct BlueprintStatements {
    pub table: TableCreateStatement,
    pub indexes: Vec<IndexCreateStatement>,
}

/// Table definition in progress.
#[derive(Debug, Clone)]
pub struct Blueprint {
    table: String,
    performer_mode: PerformerMode,
    user_key_type: KeyType,
    users_table: String,
    users_key: String,
    morph_key_type: MorphKeyType,
    columns: Vec<ColumnSpec>,
    foreign_keys: Vec<ForeignSpec>,
    indexes: Vec<IndexSpec>,
}

impl Blueprint {
    pub fn create(table: impl Into<String>, config: &AuditConfig) -> Self {
        Self {
            table: table.into(),
            performer_mode: config.performer_mode,
            user_key_type: config.user_key_type,
            users_table: config.users_table.clone(),
            users_key: config.users_key.clone(),
            morph_key_type: config.morph_key_type,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Overrides the installation-wide performer mode for this table.
    pub fn with_performer_mode(mut self, mode: PerformerMode) -> Self {
        self.performer_mode = mode;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn foreign_keys(&self) -> &[ForeignSpec] {
        &self.foreign_keys
    }

    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    pub fn id(&mut self) -> &mut Self {
        self.id_named("id")
    }

    /// Primary key typed per the principal key type. ULID keys use the
    /// UUID form so performer foreign keys line up with them.
    pub fn id_named(&mut self, name: &str) -> &mut Self {
        let kind = match self.user_key_type {
            KeyType::Int => ColumnKind::BigIncrements,
            KeyType::Uuid | KeyType::Ulid => ColumnKind::Uuid,
            KeyType::String => ColumnKind::String(255),
        };
        self.columns.push(ColumnSpec {
            name: name.to_string(),
            kind,
            nullable: false,
            primary_key: true,
        });
        self
    }

    pub fn col(&mut self, name: &str, kind: ColumnKind, nullable: bool) -> &mut Self {
        self.columns.push(ColumnSpec {
            name: name.to_string(),
            kind,
            nullable,
            primary_key: false,
        });
        self
    }

    pub fn string(&mut self, name: &str, len: u32) -> &mut Self {
        self.col(name, ColumnKind::String(len), false)
    }

    pub fn text(&mut self, name: &str) -> &mut Self {
        self.col(name, ColumnKind::Text, false)
    }

    /// `created_at` / `updated_at` with their performer columns.
    pub fn timestamps(&mut self) -> &mut Self {
        self.audited_timestamp("created_at")
            .audited_timestamp("updated_at")
    }

    pub fn soft_deletes(&mut self) -> &mut Self {
        self.soft_deletes_named("deleted_at")
    }

    /// Soft-delete timestamp named `column` plus `restore_at`, each paired
    /// with a performer column.
    pub fn soft_deletes_named(&mut self, column: &str) -> &mut Self {
        self.audited_timestamp(column)
            .audited_timestamp("restore_at")
    }

    fn audited_timestamp(&mut self, column: &str) -> &mut Self {
        self.col(column, ColumnKind::TimestampTz, true);
        self.performer(&performer_column(column))
    }

    fn performer(&mut self, column: &str) -> &mut Self {
        match self.performer_mode {
            PerformerMode::Users => {
                let kind = match self.user_key_type {
                    KeyType::Int => ColumnKind::BigInteger,
                    KeyType::Uuid | KeyType::Ulid => ColumnKind::Uuid,
                    KeyType::String => ColumnKind::String(255),
                };
                self.col(column, kind, true);
                self.foreign_keys.push(ForeignSpec {
                    name: format!("fk_{}_{}", self.table, column),
                    column: column.to_string(),
                    references_table: self.users_table.clone(),
                    references_column: self.users_key.clone(),
                    on_update: ForeignKeyAction::Cascade,
                    on_delete: ForeignKeyAction::Restrict,
                });
            }
            PerformerMode::Plain => {
                self.col(column, ColumnKind::String(PLAIN_LABEL_MAX as u32), true);
            }
        }
        self
    }

    /// Polymorphic reference under the configured morph key strategy.
    pub fn morphs(&mut self, name: &str, index: Option<&str>) -> &mut Self {
        self.morphs_with(name, self.morph_key_type, index, false)
    }

    pub fn nullable_morphs(&mut self, name: &str, index: Option<&str>) -> &mut Self {
        self.morphs_with(name, self.morph_key_type, index, true)
    }

    pub fn string_morphs(&mut self, name: &str, index: Option<&str>) -> &mut Self {
        self.morphs_with(name, MorphKeyType::String, index, false)
    }

    pub fn nullable_string_morphs(&mut self, name: &str, index: Option<&str>) -> &mut Self {
        self.morphs_with(name, MorphKeyType::String, index, true)
    }

    pub fn any_morphs(&mut self, name: &str, index: Option<&str>) -> &mut Self {
        self.morphs_with(name, MorphKeyType::Any, index, false)
    }

    pub fn nullable_any_morphs(&mut self, name: &str, index: Option<&str>) -> &mut Self {
        self.morphs_with(name, MorphKeyType::Any, index, true)
    }

    /// Emits `{name}_type` and the key columns of `strategy`, each key column
    /// indexed together with the discriminator. The per-shape key columns of
    /// the `any` strategy are always nullable.
    pub fn morphs_with(
        &mut self,
        name: &str,
        strategy: MorphKeyType,
        index: Option<&str>,
        nullable: bool,
    ) -> &mut Self {
        let type_column = format!("{name}_type");
        self.col(&type_column, ColumnKind::String(255), nullable);

        match strategy {
            MorphKeyType::Any => {
                for suffix in MorphKey::SHAPES {
                    let kind = match suffix {
                        "id" => ColumnKind::BigUnsigned,
                        "uuid" => ColumnKind::Uuid,
                        "ulid" => ColumnKind::Ulid,
                        _ => ColumnKind::String(255),
                    };
                    let key_column = format!("{name}_{suffix}");
                    self.col(&key_column, kind, true);

                    let index_name = index.map(|base| match suffix {
                        "id" => base.to_string(),
                        _ => format!("{base}_{suffix}"),
                    });
                    self.morph_index(index_name, &type_column, &key_column);
                }
            }
            MorphKeyType::String => {
                let key_column = format!("{name}_string");
                self.col(&key_column, ColumnKind::String(255), nullable);
                self.morph_index(index.map(str::to_string), &type_column, &key_column);
            }
            MorphKeyType::Int | MorphKeyType::Uuid | MorphKeyType::Ulid => {
                let kind = match strategy {
                    MorphKeyType::Uuid => ColumnKind::Uuid,
                    MorphKeyType::Ulid => ColumnKind::Ulid,
                    _ => ColumnKind::BigUnsigned,
                };
                let key_column = format!("{name}_id");
                self.col(&key_column, kind, nullable);
                self.morph_index(index.map(str::to_string), &type_column, &key_column);
            }
        }
        self
    }

    fn morph_index(&mut self, name: Option<String>, type_column: &str, key_column: &str) {
        let name =
            name.unwrap_or_else(|| format!("{}_{type_column}_{key_column}_index", self.table));
        self.indexes.push(IndexSpec {
            name,
            columns: vec![type_column.to_string(), key_column.to_string()],
        });
    }

    pub fn build(&self) -> BlueprintStatements {
        let mut table = Table::create();
        table.table(Alias::new(&self.table)).if_not_exists();

        for column in &self.columns {
            table.col(column.to_column_def());
        }
        for foreign in &self.foreign_keys {
            table.foreign_key(
                ForeignKey::create()
                    .name(&foreign.name)
                    .from(Alias::new(&self.table), Alias::new(&foreign.column))
                    .to(
                        Alias::new(&foreign.references_table),
                        Alias::new(&foreign.references_column),
                    )
                    .on_update(foreign.on_update)
                    .on_delete(foreign.on_delete),
            );
        }

        let indexes = self
            .indexes
            .iter()
            .map(|spec| {
                let mut index = Index::create();
                index.name(&spec.name).table(Alias::new(&self.table));
                for column in &spec.columns {
                    index.col(Alias::new(column));
                }
                index
            })
            .collect();

        BlueprintStatements { table, indexes }
    }

    pub async fn create_in(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let statements = self.build();
        manager.create_table(statements.table).await?;
        for index in statements.indexes {
            manager.create_index(index).await?;
        }

        tracing::info!(
            table = %self.table,
            performer_mode = %self.performer_mode,
            columns = self.columns.len(),
            indexes = self.indexes.len(),
            "created table"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(blueprint: &Blueprint) -> Vec<&str> {
        blueprint
            .columns()
            .iter()
            .map(|column| column.name.as_str())
            .collect()
    }

    fn table_sql(blueprint: &Blueprint) -> String {
        blueprint.build().table.to_string(PostgresQueryBuilder)
    }

    #[test]
    fn test_timestamps_users_mode_int() {
        let mut blueprint = Blueprint::create("posts", &AuditConfig::default());
        blueprint.id().timestamps();

        assert_eq!(
            names(&blueprint),
            vec!["id", "created_at", "created_by", "updated_at", "updated_by"]
        );
        let created_by = blueprint.column("created_by").unwrap();
        assert_eq!(created_by.kind, ColumnKind::BigInteger);
        assert!(created_by.nullable);
        assert!(blueprint.column("created_at").unwrap().nullable);

        assert_eq!(blueprint.foreign_keys().len(), 2);
        let sql = table_sql(&blueprint);
        assert!(sql.contains(r#""id" bigserial"#));
        assert!(sql.contains(r#""created_at" timestamp with time zone NULL"#));
        assert!(sql.contains(r#""created_by" bigint NULL"#));
        assert!(sql.contains(r#"REFERENCES "users" ("id")"#));
    }

    #[test]
    fn test_timestamps_users_mode_uuid() {
        let config = AuditConfig::default().with_user_key_type(KeyType::Uuid);
        let mut blueprint = Blueprint::create("posts", &config);
        blueprint.timestamps();

        assert_eq!(blueprint.column("created_by").unwrap().kind, ColumnKind::Uuid);
        let foreign = &blueprint.foreign_keys()[0];
        assert_eq!(foreign.column, "created_by");
        assert_eq!(foreign.references_table, "users");
        assert_eq!(foreign.references_column, "id");
        assert!(matches!(foreign.on_update, ForeignKeyAction::Cascade));
        assert!(matches!(foreign.on_delete, ForeignKeyAction::Restrict));

        let sql = table_sql(&blueprint);
        assert!(sql.contains(r#""created_by" uuid NULL"#));
        assert!(sql.contains("ON DELETE RESTRICT"));
        assert!(sql.contains("ON UPDATE CASCADE"));
    }

    #[test]
    fn test_ulid_principals_use_uuid_columns() {
        let config = AuditConfig::default().with_user_key_type(KeyType::Ulid);
        let mut blueprint = Blueprint::create("users", &config);
        blueprint.id().timestamps();

        assert_eq!(blueprint.column("id").unwrap().kind, ColumnKind::Uuid);
        assert_eq!(blueprint.column("updated_by").unwrap().kind, ColumnKind::Uuid);
    }

    #[test]
    fn test_timestamps_plain_mode() {
        let config = AuditConfig::default().with_performer_mode(PerformerMode::Plain);
        let mut blueprint = Blueprint::create("posts", &config);
        blueprint.timestamps();

        assert_eq!(
            blueprint.column("updated_by").unwrap().kind,
            ColumnKind::String(100)
        );
        assert!(blueprint.foreign_keys().is_empty());
        let sql = table_sql(&blueprint);
        assert!(sql.contains(r#""created_by" varchar(100) NULL"#));
        assert!(!sql.contains("REFERENCES"));
    }

    #[test]
    fn test_table_override_of_performer_mode() {
        let mut blueprint = Blueprint::create("notes", &AuditConfig::default())
            .with_performer_mode(PerformerMode::Plain);
        blueprint.soft_deletes();
        assert!(blueprint.foreign_keys().is_empty());
    }

    #[test]
    fn test_soft_deletes_custom_column() {
        let mut blueprint = Blueprint::create("notes", &AuditConfig::default());
        blueprint.soft_deletes_named("archived_at");

        assert_eq!(
            names(&blueprint),
            vec!["archived_at", "archived_by", "restore_at", "restore_by"]
        );
        assert!(blueprint.columns().iter().all(|column| column.nullable));
        assert_eq!(blueprint.foreign_keys().len(), 2);
    }

    #[test]
    fn test_any_morphs() {
        let mut blueprint = Blueprint::create("comments", &AuditConfig::default());
        blueprint.any_morphs("commentable", None);

        assert_eq!(
            names(&blueprint),
            vec![
                "commentable_type",
                "commentable_id",
                "commentable_uuid",
                "commentable_ulid",
                "commentable_string",
            ]
        );
        assert!(!blueprint.column("commentable_type").unwrap().nullable);
        assert_eq!(
            blueprint.column("commentable_id").unwrap().kind,
            ColumnKind::BigUnsigned
        );
        assert!(blueprint.column("commentable_uuid").unwrap().nullable);

        let indexes = blueprint.indexes();
        assert_eq!(indexes.len(), 4);
        assert_eq!(
            indexes[0].name,
            "comments_commentable_type_commentable_id_index"
        );
        assert!(indexes
            .iter()
            .all(|index| index.columns[0] == "commentable_type"));

        let sql: Vec<String> = blueprint
            .build()
            .indexes
            .iter()
            .map(|index| index.to_string(PostgresQueryBuilder))
            .collect();
        assert!(sql[1].contains(r#"("commentable_type", "commentable_uuid")"#));
    }

    #[test]
    fn test_any_morphs_named_index() {
        let mut blueprint = Blueprint::create("comments", &AuditConfig::default());
        blueprint.nullable_any_morphs("commentable", Some("commentable_idx"));

        let names: Vec<&str> = blueprint
            .indexes()
            .iter()
            .map(|index| index.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "commentable_idx",
                "commentable_idx_uuid",
                "commentable_idx_ulid",
                "commentable_idx_string",
            ]
        );
        assert!(blueprint.column("commentable_type").unwrap().nullable);
    }

    #[test]
    fn test_string_morphs() {
        let mut blueprint = Blueprint::create("comments", &AuditConfig::default());
        blueprint.string_morphs("taggable", None);

        assert_eq!(names(&blueprint), vec!["taggable_type", "taggable_string"]);
        assert_eq!(
            blueprint.indexes()[0].columns,
            vec!["taggable_type".to_string(), "taggable_string".to_string()]
        );
    }

    #[test]
    fn test_morphs_follow_configured_strategy() {
        let mut blueprint = Blueprint::create("comments", &AuditConfig::default());
        blueprint.morphs("commentable", None);
        let key = blueprint.column("commentable_id").unwrap();
        assert_eq!(key.kind, ColumnKind::BigUnsigned);
        assert!(!key.nullable);

        let config = AuditConfig::default().with_morph_key_type(MorphKeyType::Ulid);
        let mut blueprint = Blueprint::create("comments", &config);
        blueprint.nullable_morphs("commentable", Some("commentable_idx"));
        let key = blueprint.column("commentable_id").unwrap();
        assert_eq!(key.kind, ColumnKind::Ulid);
        assert!(key.nullable);
        assert_eq!(blueprint.indexes()[0].name, "commentable_idx");
        assert!(table_sql(&blueprint).contains(r#""commentable_id" char(26) NULL"#));
    }

    #[test]
    fn test_id_per_key_type() {
        let config = AuditConfig::default().with_user_key_type(KeyType::String);
        let mut blueprint = Blueprint::create("users", &config);
        blueprint.id_named("key");

        let key = blueprint.column("key").unwrap();
        assert_eq!(key.kind, ColumnKind::String(255));
        assert!(key.primary_key);
        assert!(!key.nullable);
    }
}

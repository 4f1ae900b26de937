//! Entities used by the unit tests of this crate.

pub mod posts {
    use crate::columns::{Auditable, SoftDeletable, SoftDeleteColumns};
    use auditrail_common::KeyType;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "posts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub title: String,
        pub created_at: Option<DateTimeWithTimeZone>,
        pub created_by: Option<i64>,
        pub updated_at: Option<DateTimeWithTimeZone>,
        pub updated_by: Option<i64>,
        pub deleted_at: Option<DateTimeWithTimeZone>,
        pub deleted_by: Option<i64>,
        pub restore_at: Option<DateTimeWithTimeZone>,
        pub restore_by: Option<i64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter)]
    pub enum Relation {}

    impl RelationTrait for Relation {
        fn def(&self) -> RelationDef {
            unreachable!("posts has no relations")
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Auditable for Entity {
        fn key_type() -> KeyType {
            KeyType::Uuid
        }
    }

    impl SoftDeletable for Entity {
        fn soft_delete_columns() -> SoftDeleteColumns<Column> {
            SoftDeleteColumns::new(Column::DeletedAt)
        }
    }
}

pub mod notes {
    use crate::columns::{Auditable, SoftDeletable, SoftDeleteColumns};
    use auditrail_common::PerformerMode;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub body: String,
        pub created_at: Option<DateTime>,
        pub created_by: Option<String>,
        pub updated_at: Option<DateTime>,
        pub updated_by: Option<String>,
        pub archived_at: Option<DateTime>,
        pub archived_by: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter)]
    pub enum Relation {}

    impl RelationTrait for Relation {
        fn def(&self) -> RelationDef {
            unreachable!("notes has no relations")
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Auditable for Entity {
        fn performer_mode() -> Option<PerformerMode> {
            Some(PerformerMode::Plain)
        }
    }

    impl SoftDeletable for Entity {
        fn soft_delete_columns() -> SoftDeleteColumns<Column> {
            SoftDeleteColumns::new(Column::ArchivedAt)
        }
    }
}

pub mod comments {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "comments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub body: String,
        pub commentable_type: String,
        pub commentable_id: Option<i64>,
        pub commentable_uuid: Option<Uuid>,
        pub commentable_ulid: Option<String>,
        pub commentable_string: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter)]
    pub enum Relation {}

    impl RelationTrait for Relation {
        fn def(&self) -> RelationDef {
            unreachable!("comments has no relations")
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod ledgers {
    use crate::columns::Auditable;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "ledgers")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub created_at: Option<DateTime>,
        pub created_by: Option<i32>,
        pub updated_at: Option<DateTime>,
        pub updated_by: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter)]
    pub enum Relation {}

    impl RelationTrait for Relation {
        fn def(&self) -> RelationDef {
            unreachable!("ledgers has no relations")
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Auditable for Entity {}
}

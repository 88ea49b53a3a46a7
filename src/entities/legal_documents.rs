use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "legal_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tenant_id: String,

    pub title: String,

    /// Rich-text / markdown body.
    pub content: String,

    /// One of: privacy_policy, terms_of_use, incident_plan, dpia, ropa_report.
    pub doc_type: String,

    /// Bumped whenever the content changes.
    pub version: i32,

    pub is_published: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "awareness_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tenant_id: String,

    pub title: String,

    /// Markdown body.
    pub content: String,

    /// One of: security, privacy_culture, governance, compliance.
    pub category: String,

    pub is_published: bool,

    pub view_count: i64,

    /// JSON blob: question, 4 options, correct_answer_index, explanation.
    pub quiz: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

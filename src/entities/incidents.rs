use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tenant_id: String,

    pub title: String,

    pub description: String,

    /// One of: low, medium, high, critical.
    pub severity: String,

    /// One of: open, investigating, mitigated, resolved, false_positive.
    pub status: String,

    /// JSON string array of affected data categories, when known.
    pub affected_data_types: Option<String>,

    pub date_occurred: Option<String>,

    pub date_reported: String,

    pub analysis_report: Option<String>,

    pub remediation_plan: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incident_history::Entity")]
    History,
}

impl Related<super::incident_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

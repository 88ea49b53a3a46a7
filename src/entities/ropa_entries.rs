use sea_orm::entity::prelude::*;

/// Record of Processing Activities entry (LGPD art. 37 data mapping).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ropa_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tenant_id: String,

    pub process_name: String,

    pub department: String,

    /// JSON string array, e.g. `["CPF", "Email"]`.
    pub data_types: String,

    pub data_subjects: String,

    pub legal_basis: String,

    pub retention_period: String,

    pub security_measures: Option<String>,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

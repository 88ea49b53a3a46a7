use sea_orm::entity::prelude::*;

/// Third-party data processor under the tenant's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tenant_id: String,

    pub name: String,

    pub service_provided: String,

    /// Reuses the incident severity scale: low, medium, high, critical.
    pub risk_level: String,

    pub has_signed_dpa: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

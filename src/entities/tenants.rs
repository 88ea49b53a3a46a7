use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Brazilian company registration number, `XX.XXX.XXX/XXXX-XX`.
    #[sea_orm(unique)]
    pub cnpj: String,

    pub name: String,

    /// One of: active, trial, suspended, cancelled.
    pub plan_status: String,

    pub contact_email: Option<String>,

    /// JSON blob: DPO contact, privacy committee, theme and security policy.
    pub settings: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

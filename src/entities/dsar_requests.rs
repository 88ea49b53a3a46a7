use sea_orm::entity::prelude::*;

/// Data-subject access request (LGPD art. 18 rights).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dsar_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tenant_id: String,

    /// Generated `DSAR-<year>-<seq>` tracking number, sequential per tenant.
    pub protocol_number: String,

    pub subject_name: String,

    pub subject_email: String,

    pub request_type: String,

    /// One of: new, validating, processing, completed, rejected.
    pub status: String,

    pub deadline: String,

    pub response_content: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One logged event, keyed by subject partition and canonical timestamp.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medical_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_key: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub timestamp: String,
    pub event_label: String,
    pub dosage: Option<String>,
    pub duration_minutes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

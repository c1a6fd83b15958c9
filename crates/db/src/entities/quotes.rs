//! `SeaORM` Entity for the quotes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    /// The document number is the primary key; its uniqueness arbitrates
    /// concurrent number allocation.
    #[sea_orm(primary_key, auto_increment = false)]
    pub document_number: String,
    /// The raw quote request, stored verbatim.
    pub json_data: Json,
    pub client_name: Option<String>,
    pub currency: String,
    pub total: Decimal,
    pub item_count: i32,
    pub first_item_description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

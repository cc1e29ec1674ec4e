use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Durable order row created at checkout completion.
///
/// Money columns written by earlier storefront versions may be absent
/// (`subtotal`, `discount`, `shipping`, `vat_amount`), and the legacy
/// `shipping_cost`/`tax` spellings may hold the value instead. The read-path
/// normalization in `services::orders` resolves those fallback chains; this
/// entity only mirrors the storage shape.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Absent for guest checkouts
    #[sea_orm(nullable)]
    pub user_id: Option<Uuid>,

    #[validate(email(message = "Contact email must be a valid email address"))]
    pub email: String,

    pub status: String,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub subtotal: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub discount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub shipping: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub shipping_cost: Option<Decimal>,
    pub shipping_method: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub vat_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 4)))", nullable)]
    pub vat_rate: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub tax: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,

    pub currency: String,

    pub stripe_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,

    #[sea_orm(column_type = "Json", nullable)]
    pub shipping_address: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub billing_address: Option<Json>,
    /// Snapshot of the cart lines at checkout time, never rewritten
    #[sea_orm(column_type = "Json")]
    pub items: Json,

    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub payment_method: String,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub refund_amount: Option<Decimal>,
    pub refund_status: Option<String>,

    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

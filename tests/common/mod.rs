use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use packshop_api::migrator::Migrator;
use packshop_api::models::{Address, OrderLine};
use packshop_api::services::orders::{CreateOrderRequest, OrderService};

/// Spins up a migrated in-memory database and an order service over it.
///
/// The pool is pinned to a single connection: each SQLite `:memory:`
/// connection is its own database, so a wider pool would scatter the schema.
pub async fn order_service() -> OrderService {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("in-memory database should connect");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply cleanly");

    OrderService::new(Arc::new(db), None)
}

pub fn uk_address() -> Address {
    Address {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        line1: "12 Mill Lane".into(),
        city: "Leeds".into(),
        county: "West Yorkshire".into(),
        postcode: "LS1 4AB".into(),
        country: "GB".into(),
        phone: "07700 900123".into(),
        ..Default::default()
    }
}

pub fn checkout_request(user_id: Option<Uuid>) -> CreateOrderRequest {
    let items = vec![OrderLine {
        product_id: "prod-boxes-305".into(),
        product_name: "Double wall box 305mm".into(),
        variant_sku: Some("DW-305".into()),
        variant_name: Some("305 x 305 x 305".into()),
        quantity: 50,
        unit_price: dec!(1.20),
        line_total: dec!(60.00),
    }];

    CreateOrderRequest {
        user_id,
        email: "ada@example.co.uk".into(),
        items,
        shipping_address: uk_address(),
        billing_address: uk_address(),
        subtotal: dec!(60.00),
        discount: None,
        shipping: dec!(5.99),
        shipping_method: Some("Standard".into()),
        vat_amount: dec!(13.20),
        vat_rate: Some(dec!(20)),
        total_amount: dec!(79.19),
        status: None,
        stripe_session_id: Some(format!("cs_test_{}", Uuid::new_v4().simple())),
        stripe_payment_intent_id: None,
        notes: None,
    }
}

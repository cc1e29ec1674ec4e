use crate::{
    db::DbPool,
    entities::order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{Address, OrderLine, OrderStatus},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// This deployment sells in pounds sterling and takes card payments only.
/// A multi-currency or multi-method storefront would thread these through
/// `CreateOrderRequest` instead.
const CURRENCY: &str = "GBP";
const PAYMENT_METHOD: &str = "card";

/// Fallback display name when neither address carries one.
const DEFAULT_CUSTOMER_NAME: &str = "Customer";

/// Checkout payload accepted by the write path. Totals arrive pre-computed
/// from the cart's pricing pass; payment identifiers are opaque pass-throughs
/// from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    /// Absent for guest checkout
    pub user_id: Option<Uuid>,
    #[validate(email(message = "A valid contact email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderLine>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub subtotal: Decimal,
    pub discount: Option<Decimal>,
    pub shipping: Decimal,
    pub shipping_method: Option<String>,
    pub vat_amount: Decimal,
    pub vat_rate: Option<Decimal>,
    pub total_amount: Decimal,
    /// Defaults to pending when omitted
    pub status: Option<OrderStatus>,
    pub stripe_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub reason: Option<String>,
}

/// Canonical order shape handed to every caller, regardless of how loosely
/// the row was typed when it was written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    /// First 8 characters of the id, uppercased; derived, never stored
    pub order_number: String,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub shipping_method: Option<String>,
    pub vat_amount: Decimal,
    pub vat_rate: Option<Decimal>,
    pub total_amount: Decimal,
    pub currency: String,
    pub stripe_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
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
    pub refund_amount: Option<Decimal>,
    pub refund_status: Option<String>,
}

/// Service for creating and reading durable order records.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a durable order from a completed checkout.
    ///
    /// The insert runs in a transaction: either the row exists and its id is
    /// returned, or the call errors with no partial order left behind.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let (customer_name, customer_phone) =
            derive_customer_contact(&request.shipping_address, &request.billing_address);

        let items = serde_json::to_value(&request.items)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        let shipping_address = serde_json::to_value(&request.shipping_address)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        let billing_address = serde_json::to_value(&request.billing_address)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;

        let status = request.status.unwrap_or(OrderStatus::Pending);

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            user_id: Set(request.user_id),
            email: Set(request.email.clone()),
            status: Set(status.to_string()),
            subtotal: Set(Some(request.subtotal)),
            discount: Set(Some(request.discount.unwrap_or(Decimal::ZERO))),
            shipping: Set(Some(request.shipping)),
            shipping_cost: Set(Some(request.shipping)),
            shipping_method: Set(request.shipping_method.clone()),
            vat_amount: Set(Some(request.vat_amount)),
            vat_rate: Set(request.vat_rate),
            tax: Set(Some(request.vat_amount)),
            total_amount: Set(request.total_amount),
            currency: Set(CURRENCY.to_string()),
            stripe_session_id: Set(request.stripe_session_id.clone()),
            stripe_payment_intent_id: Set(request.stripe_payment_intent_id.clone()),
            shipping_address: Set(Some(shipping_address)),
            billing_address: Set(Some(billing_address)),
            items: Set(items),
            customer_name: Set(customer_name),
            customer_phone: Set(customer_phone),
            payment_method: Set(PAYMENT_METHOD.to_string()),
            notes: Set(request.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            shipped_at: Set(None),
            delivered_at: Set(None),
            cancelled_at: Set(None),
            cancellation_reason: Set(None),
            refund_amount: Set(None),
            refund_status: Set(None),
            version: Set(1),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, "Order created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderCreated(order_id)).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order created event");
            }
        }

        Ok(self.model_to_response(order_model))
    }

    /// Retrieves an order by id. `None` when no such row exists; database
    /// failures propagate to the caller.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let db = &*self.db;

        let order = OrderEntity::find_by_id(order_id).one(db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to fetch order from database");
            ServiceError::DatabaseError(e)
        })?;

        Ok(order.map(|model| self.model_to_response(model)))
    }

    /// Retrieves an order by the payment gateway's checkout-session id, for
    /// webhook reconciliation and the confirmation page.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_order_by_stripe_session(
        &self,
        session_id: &str,
    ) -> Result<Option<OrderResponse>, ServiceError> {
        let db = &*self.db;

        let order = OrderEntity::find()
            .filter(order::Column::StripeSessionId.eq(session_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, session_id = %session_id, "Failed to fetch order by session id");
                ServiceError::DatabaseError(e)
            })?;

        Ok(order.map(|model| self.model_to_response(model)))
    }

    /// Lists a user's orders, newest first. Guest orders (no user id) never
    /// appear here.
    ///
    /// This backs the account dashboard, which must render even when the
    /// store is having a bad day: every failure is logged and swallowed into
    /// an empty list.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_orders(&self, user_id: Uuid) -> Vec<OrderResponse> {
        let db = &*self.db;

        let result = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(db)
            .await;

        match result {
            Ok(orders) => orders
                .into_iter()
                .map(|model| self.model_to_response(model))
                .collect(),
            Err(e) => {
                warn!(error = %e, user_id = %user_id, "Failed to list user orders; returning empty list");
                Vec::new()
            }
        }
    }

    /// Administrative status transition, validated against the order state
    /// machine and guarded by a version compare-and-swap so concurrent edits
    /// conflict instead of silently overwriting each other.
    #[instrument(skip(self, request), fields(order_id = %order_id, new_status = %request.status))]
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;
        let now = Utc::now();

        let current = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status =
            OrderStatus::from_str(&current.status).unwrap_or(OrderStatus::Pending);
        let new_status = request.status;

        if !old_status.can_transition_to(new_status) {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot transition order from {} to {}",
                old_status, new_status
            )));
        }

        let mut update = OrderEntity::update_many()
            .col_expr(order::Column::Status, Expr::value(new_status.to_string()))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .col_expr(order::Column::Version, Expr::value(current.version + 1));

        match new_status {
            OrderStatus::Shipped => {
                update = update.col_expr(order::Column::ShippedAt, Expr::value(Some(now)));
            }
            OrderStatus::Delivered => {
                update = update.col_expr(order::Column::DeliveredAt, Expr::value(Some(now)));
            }
            OrderStatus::Cancelled => {
                update = update
                    .col_expr(order::Column::CancelledAt, Expr::value(Some(now)))
                    .col_expr(
                        order::Column::CancellationReason,
                        Expr::value(request.reason.clone()),
                    );
            }
            _ => {}
        }

        let result = update
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(current.version))
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to update order status");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            warn!(order_id = %order_id, "Order status update lost a version race");
            return Err(ServiceError::ConcurrentModification(order_id));
        }

        info!(
            order_id = %order_id,
            old_status = %old_status,
            new_status = %new_status,
            "Order status updated successfully"
        );

        if let Some(event_sender) = &self.event_sender {
            let event = if new_status == OrderStatus::Cancelled {
                Event::OrderCancelled(order_id)
            } else {
                Event::OrderStatusChanged {
                    order_id,
                    old_status: old_status.to_string(),
                    new_status: new_status.to_string(),
                }
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order status event");
            }
        }

        let updated = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        Ok(self.model_to_response(updated))
    }

    /// Normalizes a stored row into the canonical order shape.
    ///
    /// Money columns missing from legacy rows resolve through their fallback
    /// chains (`subtotal` ← `total_amount`, `shipping` ← `shipping_cost`,
    /// `vat_amount` ← `tax`), absent addresses become the empty-string
    /// address object, and unreadable item JSON degrades to an empty list.
    fn model_to_response(&self, model: OrderModel) -> OrderResponse {
        let order_number = derive_order_number(model.id);
        let status = OrderStatus::from_str(&model.status).unwrap_or(OrderStatus::Pending);

        let subtotal = model.subtotal.unwrap_or(model.total_amount);
        let discount = model.discount.unwrap_or(Decimal::ZERO);
        let shipping = model
            .shipping
            .or(model.shipping_cost)
            .unwrap_or(Decimal::ZERO);
        let vat_amount = model.vat_amount.or(model.tax).unwrap_or(Decimal::ZERO);

        OrderResponse {
            id: model.id,
            order_number,
            user_id: model.user_id,
            email: model.email,
            status,
            items: OrderLine::list_from_stored(&model.items),
            shipping_address: Address::from_stored(model.shipping_address.as_ref()),
            billing_address: Address::from_stored(model.billing_address.as_ref()),
            subtotal,
            discount,
            shipping,
            shipping_method: model.shipping_method,
            vat_amount,
            vat_rate: model.vat_rate,
            total_amount: model.total_amount,
            currency: model.currency,
            stripe_session_id: model.stripe_session_id,
            stripe_payment_intent_id: model.stripe_payment_intent_id,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            payment_method: model.payment_method,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
            shipped_at: model.shipped_at,
            delivered_at: model.delivered_at,
            cancelled_at: model.cancelled_at,
            cancellation_reason: model.cancellation_reason,
            refund_amount: model.refund_amount,
            refund_status: model.refund_status,
        }
    }
}

/// Human-readable order number: first 8 characters of the id, uppercased.
/// Derived on every read so the same order always displays the same number.
fn derive_order_number(id: Uuid) -> String {
    id.to_string()[..8].to_uppercase()
}

/// Display contact fields with the shipping → billing → default fallback, so
/// confirmation emails and admin views never render a blank name.
fn derive_customer_contact(shipping: &Address, billing: &Address) -> (String, Option<String>) {
    let name = [shipping.full_name(), billing.full_name()]
        .into_iter()
        .find(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string());

    let phone = [shipping.phone.as_str(), billing.phone.as_str()]
        .into_iter()
        .find(|p| !p.is_empty())
        .map(str::to_string);

    (name, phone)
}

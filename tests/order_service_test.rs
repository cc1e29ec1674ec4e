mod common;

use rust_decimal_macros::dec;
use uuid::Uuid;

use packshop_api::errors::ServiceError;
use packshop_api::models::OrderStatus;
use packshop_api::services::orders::UpdateOrderStatusRequest;

#[tokio::test]
async fn created_order_round_trips_through_the_store() {
    let service = common::order_service().await;
    let request = common::checkout_request(Some(Uuid::new_v4()));
    let session_id = request.stripe_session_id.clone().unwrap();

    let created = service.create_order(request).await.unwrap();

    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.currency, "GBP");
    assert_eq!(created.payment_method, "card");
    assert_eq!(created.customer_name, "Ada Lovelace");
    assert_eq!(
        created.order_number,
        created.id.to_string()[..8].to_uppercase()
    );

    let fetched = service.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.order_number, created.order_number);
    assert_eq!(fetched.subtotal, dec!(60.00));
    assert_eq!(fetched.shipping, dec!(5.99));
    assert_eq!(fetched.vat_amount, dec!(13.20));
    assert_eq!(fetched.total_amount, dec!(79.19));
    assert_eq!(fetched.items, created.items);
    assert_eq!(fetched.items[0].quantity, 50);
    assert_eq!(fetched.shipping_address.postcode, "LS1 4AB");
    assert_eq!(fetched.billing_address, created.billing_address);
    assert_eq!(fetched.stripe_session_id.as_deref(), Some(session_id.as_str()));
}

#[tokio::test]
async fn guest_checkout_persists_without_a_user() {
    let service = common::order_service().await;

    let created = service
        .create_order(common::checkout_request(None))
        .await
        .unwrap();
    assert_eq!(created.user_id, None);

    let fetched = service.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.user_id, None);
}

#[tokio::test]
async fn invalid_email_is_rejected_before_persisting() {
    let service = common::order_service().await;

    let mut request = common::checkout_request(None);
    request.email = "not-an-email".into();

    match service.create_order(request).await {
        Err(ServiceError::ValidationError(_)) => {}
        Err(other) => panic!("expected validation error, got {:?}", other),
        Ok(order) => panic!("expected validation error, got order {}", order.id),
    }
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let service = common::order_service().await;

    let mut request = common::checkout_request(None);
    request.items.clear();

    assert!(matches!(
        service.create_order(request).await,
        Err(ServiceError::ValidationError(_))
    ));
}

#[tokio::test]
async fn user_listing_is_newest_first_and_excludes_guests_and_others() {
    let service = common::order_service().await;
    let user_id = Uuid::new_v4();

    let first = service
        .create_order(common::checkout_request(Some(user_id)))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = service
        .create_order(common::checkout_request(Some(user_id)))
        .await
        .unwrap();

    // Noise that must not leak into this user's dashboard
    service
        .create_order(common::checkout_request(None))
        .await
        .unwrap();
    service
        .create_order(common::checkout_request(Some(Uuid::new_v4())))
        .await
        .unwrap();

    let orders = service.get_user_orders(user_id).await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, second.id);
    assert_eq!(orders[1].id, first.id);
}

#[tokio::test]
async fn unknown_user_gets_an_empty_listing() {
    let service = common::order_service().await;
    assert!(service.get_user_orders(Uuid::new_v4()).await.is_empty());
}

#[tokio::test]
async fn stripe_session_lookup_finds_the_matching_order() {
    let service = common::order_service().await;
    let request = common::checkout_request(None);
    let session_id = request.stripe_session_id.clone().unwrap();

    let created = service.create_order(request).await.unwrap();

    let found = service
        .get_order_by_stripe_session(&session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);

    let missing = service
        .get_order_by_stripe_session("cs_test_never_issued")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn unknown_order_id_reads_as_none() {
    let service = common::order_service().await;
    assert!(service.get_order(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn orders_walk_the_full_fulfilment_path() {
    let service = common::order_service().await;
    let created = service
        .create_order(common::checkout_request(None))
        .await
        .unwrap();

    let processing = service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Processing,
                reason: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(processing.status, OrderStatus::Processing);
    assert!(processing.shipped_at.is_none());

    let shipped = service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Shipped,
                reason: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert!(shipped.shipped_at.is_some());

    let delivered = service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Delivered,
                reason: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_at.is_some());
}

#[tokio::test]
async fn skipping_fulfilment_states_is_rejected() {
    let service = common::order_service().await;
    let created = service
        .create_order(common::checkout_request(None))
        .await
        .unwrap();

    let result = service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Delivered,
                reason: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidStatus(_))));

    // The failed attempt must leave the stored status untouched
    let unchanged = service.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, OrderStatus::Pending);
}

#[tokio::test]
async fn cancellation_stamps_timestamp_and_reason() {
    let service = common::order_service().await;
    let created = service
        .create_order(common::checkout_request(None))
        .await
        .unwrap();

    let cancelled = service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Cancelled,
                reason: Some("Customer changed their mind".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(
        cancelled.cancellation_reason.as_deref(),
        Some("Customer changed their mind")
    );
}

#[tokio::test]
async fn terminal_orders_refuse_further_transitions() {
    let service = common::order_service().await;
    let created = service
        .create_order(common::checkout_request(None))
        .await
        .unwrap();

    service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Cancelled,
                reason: None,
            },
        )
        .await
        .unwrap();

    let result = service
        .update_order_status(
            created.id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Processing,
                reason: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidStatus(_))));
}

#[tokio::test]
async fn updating_a_missing_order_is_not_found() {
    let service = common::order_service().await;

    let result = service
        .update_order_status(
            Uuid::new_v4(),
            UpdateOrderStatusRequest {
                status: OrderStatus::Processing,
                reason: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

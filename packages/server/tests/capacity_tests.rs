// Concurrency: the per-(event, ticket-type) lock must make the capacity
// check and order insert atomic as a pair, so concurrent purchases cannot
// oversell a ticket type.

mod common;

use common::*;
use server_core::common::ServiceError;
use server_core::domains::orders::{create_payment_intent, CreatePaymentIntentInput};
use server_core::kernel::test_dependencies::TestDependencies;

fn purchase(event_id: i64, quantity: i32, email: &str) -> CreatePaymentIntentInput {
    CreatePaymentIntentInput {
        event_id,
        ticket_type: GA_TICKET.to_string(),
        quantity,
        purchaser_name: "Concurrent Buyer".to_string(),
        purchaser_email: email.to_string(),
        contact_id: None,
    }
}

#[tokio::test]
async fn concurrent_purchases_cannot_oversell() {
    let t = TestDependencies::new();
    let mut event = gala_event(1);
    event.ticket_types.0[0].capacity = 3;
    t.events.put(event);

    // Two buyers race for 2 tickets each with only 3 left
    let (a, b) = tokio::join!(
        create_payment_intent(purchase(1, 2, "first@example.com"), &t.deps),
        create_payment_intent(purchase(1, 2, "second@example.com"), &t.deps),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one purchase wins the last spots");

    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    match loser {
        ServiceError::CapacityExceeded { remaining, .. } => assert_eq!(remaining, 1),
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }

    let committed: i64 = t
        .orders
        .all()
        .iter()
        .map(|o| o.quantity as i64)
        .sum();
    assert_eq!(committed, 2);
}

#[tokio::test]
async fn different_ticket_types_do_not_contend() {
    let t = TestDependencies::new();
    let event = with_ticket(gala_event(1), ticket("VIP", 10000, 2));
    t.events.put(event);

    let vip = CreatePaymentIntentInput {
        ticket_type: "VIP".to_string(),
        ..purchase(1, 2, "vip@example.com")
    };

    let (a, b) = tokio::join!(
        create_payment_intent(purchase(1, 2, "ga@example.com"), &t.deps),
        create_payment_intent(vip, &t.deps),
    );
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(t.orders.all().len(), 2);
}

#[tokio::test]
async fn oversubscribed_ticket_reports_zero_remaining() {
    let t = TestDependencies::new();
    let mut event = gala_event(1);
    event.ticket_types.0[0].capacity = 5;
    t.events.put(event);

    create_payment_intent(purchase(1, 4, "first@example.com"), &t.deps)
        .await
        .unwrap();

    // Capacity edited down below the committed sales
    let mut event = gala_event(1);
    event.ticket_types.0[0].capacity = 3;
    t.events.put(event);

    let err = create_payment_intent(purchase(1, 1, "second@example.com"), &t.deps)
        .await
        .unwrap_err();
    match err {
        ServiceError::CapacityExceeded { remaining, message } => {
            assert_eq!(remaining, 0);
            assert!(message.contains("only 0 remaining"), "message: {}", message);
        }
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn capacity_counts_pending_and_confirmed_only() {
    let t = TestDependencies::new();
    let mut event = gala_event(1);
    event.ticket_types.0[0].capacity = 2;
    t.events.put(event);

    // Fill the capacity with a pending order
    create_payment_intent(purchase(1, 2, "first@example.com"), &t.deps)
        .await
        .unwrap();

    let err = create_payment_intent(purchase(1, 1, "second@example.com"), &t.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::CapacityExceeded { .. }));
}

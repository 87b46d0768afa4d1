use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use meetup_travel::db;
use meetup_travel::domain::{
    BookingStatus, CreateBookingInput, DomainError, PaymentStatus, PricingSelection,
    ServiceSelection, Tour, TourInput, TourPricingInput, TourRepository,
};
use meetup_travel::infrastructure::SeaOrmTourRepository;
use meetup_travel::models::{booking, booking_additional_service, booking_pricing_option, payment};
use meetup_travel::services::{booking_service, payment_service, report_service};

fn money(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn setup_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_tour(db: &DatabaseConnection) -> Tour {
    SeaOrmTourRepository::new(db.clone())
        .create(TourInput {
            title: "Ha Long Bay Cruise".to_string(),
            price: money("19.00"),
            pricing_options: Some(vec![
                TourPricingInput {
                    customer_type: "Adult".to_string(),
                    price: money("19.00"),
                    round_trip: false,
                },
                TourPricingInput {
                    customer_type: "Child".to_string(),
                    price: money("12.50"),
                    round_trip: false,
                },
            ]),
            ..Default::default()
        })
        .await
        .expect("Failed to create tour")
}

fn booking_input(tour_id: i32, selections: Vec<PricingSelection>) -> CreateBookingInput {
    CreateBookingInput {
        tour_id,
        departure_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        end_date: None,
        customer_name: "Linh Tran".to_string(),
        customer_email: "linh@example.com".to_string(),
        pickup_location: Some("Hanoi Old Quarter".to_string()),
        pickup_address: None,
        whatsapp_number: None,
        note: None,
        pricing_selections: selections,
        service_selections: vec![],
    }
}

async fn row_counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        booking::Entity::find().count(db).await.unwrap(),
        booking_pricing_option::Entity::find().count(db).await.unwrap(),
        booking_additional_service::Entity::find()
            .count(db)
            .await
            .unwrap(),
    )
}

#[tokio::test]
async fn test_total_is_exact_sum_of_subtotals() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    let adult = tour.pricing_options[0].id;

    let created = booking_service::create_booking(
        &db,
        booking_input(
            tour.id,
            vec![PricingSelection {
                pricing_tier_id: adult,
                quantity: 3,
            }],
        ),
    )
    .await
    .unwrap();

    assert_eq!(created.total_price, money("57.00"));
    assert_eq!(created.total_price.to_string(), "57.00");
    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.pricing_options[0].subtotal, money("57.00"));
    assert_eq!(created.line_items_total().unwrap(), created.total_price);
}

#[tokio::test]
async fn test_unknown_tour_persists_nothing() {
    let db = setup_db().await;

    let result = booking_service::create_booking(
        &db,
        booking_input(
            999,
            vec![PricingSelection {
                pricing_tier_id: 1,
                quantity: 1,
            }],
        ),
    )
    .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert_eq!(row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn test_invalid_tier_rolls_back_whole_booking() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    let adult = tour.pricing_options[0].id;

    let mut input = booking_input(
        tour.id,
        vec![
            PricingSelection {
                pricing_tier_id: adult,
                quantity: 2,
            },
            PricingSelection {
                pricing_tier_id: 4242,
                quantity: 1,
            },
        ],
    );
    input.service_selections.push(ServiceSelection {
        service_name: "Kayak".to_string(),
        service_type: None,
        unit_price: money("5.00"),
        quantity: 1,
        catalog_service_id: None,
    });

    let result = booking_service::create_booking(&db, input).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert_eq!(row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let result = booking_service::create_booking(
        &db,
        booking_input(
            tour.id,
            vec![PricingSelection {
                pricing_tier_id: tour.pricing_options[0].id,
                quantity: 0,
            }],
        ),
    )
    .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn test_tier_of_another_tour_is_rejected() {
    let db = setup_db().await;
    let first = create_tour(&db).await;
    let second = create_tour(&db).await;

    let result = booking_service::create_booking(
        &db,
        booking_input(
            first.id,
            vec![PricingSelection {
                pricing_tier_id: second.pricing_options[0].id,
                quantity: 1,
            }],
        ),
    )
    .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn test_overflowing_service_total_is_rejected() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let mut input = booking_input(
        tour.id,
        vec![PricingSelection {
            pricing_tier_id: tour.pricing_options[0].id,
            quantity: 1,
        }],
    );
    input.service_selections.push(ServiceSelection {
        service_name: "Yacht charter".to_string(),
        service_type: None,
        unit_price: Decimal::MAX,
        quantity: 2,
        catalog_service_id: None,
    });

    let result = booking_service::create_booking(&db, input).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn test_overflowing_grand_total_is_rejected() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let mut input = booking_input(tour.id, vec![]);
    for name in ["Yacht charter", "Helicopter transfer"] {
        input.service_selections.push(ServiceSelection {
            service_name: name.to_string(),
            service_type: None,
            unit_price: Decimal::MAX,
            quantity: 1,
            catalog_service_id: None,
        });
    }

    let result = booking_service::create_booking(&db, input).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    let created = booking_service::create_booking(&db, booking_input(tour.id, vec![]))
        .await
        .unwrap();

    booking_service::cancel_booking(&db, created.id).await.unwrap();
    booking_service::cancel_booking(&db, created.id).await.unwrap();

    let fetched = booking_service::get_booking(&db, created.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Cancelled);

    let missing = booking_service::cancel_booking(&db, 999).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_vietqr_confirmation_adds_one_pending_payment() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    let created = booking_service::create_booking(
        &db,
        booking_input(
            tour.id,
            vec![PricingSelection {
                pricing_tier_id: tour.pricing_options[1].id,
                quantity: 2,
            }],
        ),
    )
    .await
    .unwrap();

    // Confirmation applies even to a cancelled booking
    booking_service::cancel_booking(&db, created.id).await.unwrap();

    let confirmed =
        booking_service::confirm_vietqr_payment(&db, created.id, Some("FT2403150001".to_string()))
            .await
            .unwrap();

    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(confirmed.payments.len(), 1);
    let payment = &confirmed.payments[0];
    assert_eq!(payment.payment_status, PaymentStatus::Pending);
    assert_eq!(payment.payment_method, "VietQR");
    assert_eq!(payment.currency, "VND");
    assert_eq!(payment.amount, money("25.00"));
    assert_eq!(payment.transaction_id.as_deref(), Some("FT2403150001"));
}

#[tokio::test]
async fn test_vietqr_blank_reference_gets_generated_id() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    let created = booking_service::create_booking(&db, booking_input(tour.id, vec![]))
        .await
        .unwrap();

    let confirmed = booking_service::confirm_vietqr_payment(&db, created.id, Some("  ".into()))
        .await
        .unwrap();

    let reference = confirmed.payments[0].transaction_id.clone().unwrap();
    assert!(reference.starts_with("VietQR-"));
}

#[tokio::test]
async fn test_verify_payment_leaves_booking_untouched() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    let created = booking_service::create_booking(&db, booking_input(tour.id, vec![]))
        .await
        .unwrap();
    let confirmed = booking_service::confirm_vietqr_payment(&db, created.id, None)
        .await
        .unwrap();
    let payment_id = confirmed.payments[0].id;

    // Backdate so the refreshed timestamp is observable
    let row = payment::Entity::find_by_id(payment_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let mut active: payment::ActiveModel = row.into();
    active.payment_time = Set(Some("2020-01-01 00:00:00".to_string()));
    active.update(&db).await.unwrap();

    let verified = payment_service::verify_payment(&db, payment_id).await.unwrap();
    assert_eq!(verified.payment_status, PaymentStatus::Completed);
    let old = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert!(verified.payment_time.unwrap() > old);

    let booking = booking_service::get_booking(&db, created.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);

    let missing = payment_service::verify_payment(&db, 999).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

async fn completed_booking_at(db: &DatabaseConnection, tour: &Tour, booking_time: &str) -> i32 {
    let created = booking_service::create_booking(
        db,
        booking_input(
            tour.id,
            vec![PricingSelection {
                pricing_tier_id: tour.pricing_options[0].id,
                quantity: 1,
            }],
        ),
    )
    .await
    .unwrap();

    let row = booking::Entity::find_by_id(created.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: booking::ActiveModel = row.into();
    active.booking_time = Set(booking_time.to_string());
    active.total_price = Set("100.00".to_string());
    active.update(db).await.unwrap();

    booking_service::update_status(db, created.id, BookingStatus::Completed)
        .await
        .unwrap();
    created.id
}

#[tokio::test]
async fn test_yearly_stats_counts_completed_bookings_by_month() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    completed_booking_at(&db, &tour, "2024-03-02 09:15:00").await;
    completed_booking_at(&db, &tour, "2024-03-28 17:40:00").await;
    // Other year
    completed_booking_at(&db, &tour, "2023-03-10 10:00:00").await;

    let stats = report_service::yearly_stats(&db, Some(2024)).await.unwrap();

    assert_eq!(stats.year, 2024);
    assert_eq!(stats.monthly_counts.get("March"), Some(2));
    assert_eq!(stats.data.iter().sum::<u32>(), 2);
    assert_eq!(stats.data[2], 2);
    assert_eq!(stats.labels.len(), 12);
    assert_eq!(stats.total_revenue, money("200.00"));
}

#[tokio::test]
async fn test_yearly_stats_ignore_non_completed_bookings() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let counted = completed_booking_at(&db, &tour, "2024-06-01 08:00:00").await;
    for status in [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ] {
        let id = completed_booking_at(&db, &tour, "2024-06-02 08:00:00").await;
        booking_service::update_status(&db, id, status).await.unwrap();
    }

    let stats = report_service::yearly_stats(&db, Some(2024)).await.unwrap();
    assert_eq!(stats.monthly_counts.get("June"), Some(1));
    assert_eq!(stats.total_revenue, money("100.00"));

    booking_service::delete_booking(&db, counted).await.unwrap();
    let stats = report_service::yearly_stats(&db, Some(2024)).await.unwrap();
    assert_eq!(stats.total_revenue, Decimal::ZERO);
    assert!(stats.data.iter().all(|c| *c == 0));
}

#[tokio::test]
async fn test_booking_details_carry_all_line_items() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let mut input = booking_input(
        tour.id,
        vec![
            PricingSelection {
                pricing_tier_id: tour.pricing_options[0].id,
                quantity: 2,
            },
            PricingSelection {
                pricing_tier_id: tour.pricing_options[1].id,
                quantity: 1,
            },
        ],
    );
    input.service_selections.push(ServiceSelection {
        service_name: "Airport Transfer".to_string(),
        service_type: Some("TRANSFER".to_string()),
        unit_price: money("7.25"),
        quantity: 2,
        catalog_service_id: Some(4242),
    });
    let created = booking_service::create_booking(&db, input).await.unwrap();

    let fetched = booking_service::get_booking(&db, created.id).await.unwrap();
    assert_eq!(fetched.pricing_options.len(), 2);
    assert_eq!(fetched.additional_services.len(), 1);
    assert_eq!(fetched.tour_title.as_deref(), Some("Ha Long Bay Cruise"));

    let mut subtotals: Vec<Decimal> = fetched.pricing_options.iter().map(|p| p.subtotal).collect();
    subtotals.sort();
    assert_eq!(subtotals, vec![money("12.50"), money("38.00")]);

    let service = &fetched.additional_services[0];
    assert_eq!(service.subtotal, money("14.50"));
    // Unknown catalog id is stored unlinked
    assert_eq!(service.additional_service_id, None);

    assert_eq!(fetched.total_price, money("64.50"));
    assert_eq!(fetched.line_items_total().unwrap(), fetched.total_price);
}

#[tokio::test]
async fn test_bookings_listed_by_email() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;
    booking_service::create_booking(&db, booking_input(tour.id, vec![]))
        .await
        .unwrap();
    let mut other = booking_input(tour.id, vec![]);
    other.customer_email = "minh@example.com".to_string();
    booking_service::create_booking(&db, other).await.unwrap();

    let page = booking_service::list_bookings_by_email(
        &db,
        "linh@example.com",
        meetup_travel::domain::PageRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].customer_email, "linh@example.com");
}

#[tokio::test]
async fn test_delete_booking_cascades() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let mut input = booking_input(
        tour.id,
        vec![PricingSelection {
            pricing_tier_id: tour.pricing_options[0].id,
            quantity: 2,
        }],
    );
    input.service_selections.push(ServiceSelection {
        service_name: "Kayak".to_string(),
        service_type: None,
        unit_price: money("5.00"),
        quantity: 1,
        catalog_service_id: None,
    });
    let created = booking_service::create_booking(&db, input).await.unwrap();
    booking_service::confirm_vietqr_payment(&db, created.id, Some("FT001".to_string()))
        .await
        .unwrap();
    assert_eq!(row_counts(&db).await, (1, 1, 1));
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 1);

    booking_service::delete_booking(&db, created.id).await.unwrap();

    assert_eq!(row_counts(&db).await, (0, 0, 0));
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 0);

    let fetched = booking_service::get_booking(&db, created.id).await;
    assert!(matches!(fetched, Err(DomainError::NotFound { .. })));

    let missing = booking_service::delete_booking(&db, 999).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_terminal_booking_can_be_reopened() {
    let db = setup_db().await;
    let tour = create_tour(&db).await;

    let input = booking_input(
        tour.id,
        vec![PricingSelection {
            pricing_tier_id: tour.pricing_options[0].id,
            quantity: 1,
        }],
    );
    let created = booking_service::create_booking(&db, input).await.unwrap();
    booking_service::cancel_booking(&db, created.id).await.unwrap();

    let reopened = booking_service::update_status(&db, created.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(reopened.status, BookingStatus::Confirmed);
}

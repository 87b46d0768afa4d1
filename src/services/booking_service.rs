//! Booking Service - composition and lifecycle of bookings
//!
//! Every multi-row write runs inside one SeaORM transaction; only the
//! transaction handle is used for queries until it commits.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;

use crate::domain::values::{
    date_to_db, money_to_db, now, parse_date, parse_money, parse_optional_date, parse_timestamp,
    timestamp_to_db,
};
use crate::domain::{
    BookingAdditionalService, BookingDetails, BookingPricingOption, BookingStatus,
    CreateBookingInput, DomainError, Page, PageRequest, Payment, PaymentStatus, VIETQR_CURRENCY,
    VIETQR_METHOD, booking_total, fallback_transaction_id, line_subtotal,
};
use crate::models::{
    additional_service, booking, booking_additional_service, booking_pricing_option, payment,
    tour, tour_pricing,
};

pub(crate) fn payment_from_model(m: payment::Model) -> Result<Payment, DomainError> {
    Ok(Payment {
        id: m.id,
        booking_id: m.booking_id,
        payment_method: m.payment_method,
        transaction_id: m.transaction_id,
        amount: parse_money(&m.amount)?,
        currency: m.currency,
        payment_status: m.payment_status.parse()?,
        payment_time: m
            .payment_time
            .as_deref()
            .map(parse_timestamp)
            .transpose()?,
    })
}

fn pricing_option_from_model(
    m: booking_pricing_option::Model,
) -> Result<BookingPricingOption, DomainError> {
    Ok(BookingPricingOption {
        id: m.id,
        pricing_option_id: m.pricing_option_id,
        customer_type: m.customer_type,
        round_trip: m.round_trip,
        quantity: m.quantity,
        price: parse_money(&m.price)?,
        subtotal: parse_money(&m.subtotal)?,
    })
}

fn additional_service_from_model(
    m: booking_additional_service::Model,
) -> Result<BookingAdditionalService, DomainError> {
    Ok(BookingAdditionalService {
        id: m.id,
        booking_id: m.booking_id,
        additional_service_id: m.additional_service_id,
        service_name: m.service_name,
        service_type: m.service_type,
        price: parse_money(&m.price)?,
        quantity: m.quantity,
        subtotal: parse_money(&m.subtotal)?,
    })
}

/// Builds full booking views for `rows` with one query per child table,
/// preserving the order of `rows`.
async fn assemble<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<booking::Model>,
) -> Result<Vec<BookingDetails>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|b| b.id).collect();

    let tours: HashMap<i32, tour::Model> = tour::Entity::find()
        .filter(tour::Column::Id.is_in(rows.iter().map(|b| b.tour_id)))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let mut options: HashMap<i32, Vec<BookingPricingOption>> = HashMap::new();
    for m in booking_pricing_option::Entity::find()
        .filter(booking_pricing_option::Column::BookingId.is_in(ids.clone()))
        .order_by_asc(booking_pricing_option::Column::Id)
        .all(conn)
        .await?
    {
        options
            .entry(m.booking_id)
            .or_default()
            .push(pricing_option_from_model(m)?);
    }

    let mut services: HashMap<i32, Vec<BookingAdditionalService>> = HashMap::new();
    for m in booking_additional_service::Entity::find()
        .filter(booking_additional_service::Column::BookingId.is_in(ids.clone()))
        .order_by_asc(booking_additional_service::Column::Id)
        .all(conn)
        .await?
    {
        services
            .entry(m.booking_id)
            .or_default()
            .push(additional_service_from_model(m)?);
    }

    let mut payments: HashMap<i32, Vec<Payment>> = HashMap::new();
    for m in payment::Entity::find()
        .filter(payment::Column::BookingId.is_in(ids))
        .order_by_asc(payment::Column::Id)
        .all(conn)
        .await?
    {
        payments
            .entry(m.booking_id)
            .or_default()
            .push(payment_from_model(m)?);
    }

    rows.into_iter()
        .map(|b| {
            let tour = tours.get(&b.tour_id);
            Ok(BookingDetails {
                id: b.id,
                tour_id: b.tour_id,
                tour_title: tour.map(|t| t.title.clone()),
                tour_image_url: tour.and_then(|t| t.image_url.clone()),
                customer_name: b.customer_name,
                customer_email: b.customer_email,
                departure_date: parse_date(&b.departure_date)?,
                end_date: parse_optional_date(b.end_date.as_deref())?,
                pickup_location: b.pickup_location,
                pickup_address: b.pickup_address,
                total_price: parse_money(&b.total_price)?,
                booking_time: parse_timestamp(&b.booking_time)?,
                status: b.status.parse()?,
                payment_id: b.payment_id,
                whatsapp_number: b.whatsapp_number,
                note_for_meetup: b.note_for_meetup,
                pricing_options: options.remove(&b.id).unwrap_or_default(),
                additional_services: services.remove(&b.id).unwrap_or_default(),
                payments: payments.remove(&b.id).unwrap_or_default(),
            })
        })
        .collect()
}

async fn find_row<C: ConnectionTrait>(conn: &C, id: i32) -> Result<booking::Model, DomainError> {
    booking::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Booking", id))
}

async fn load<C: ConnectionTrait>(conn: &C, id: i32) -> Result<BookingDetails, DomainError> {
    let row = find_row(conn, id).await?;
    assemble(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| DomainError::not_found("Booking", id))
}

async fn fetch_page(
    db: &DatabaseConnection,
    query: Select<booking::Entity>,
    request: PageRequest,
) -> Result<Page<BookingDetails>, DomainError> {
    let paginator = query
        .order_by_desc(booking::Column::BookingTime)
        .order_by_desc(booking::Column::Id)
        .paginate(db, request.size);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(request.page).await?;
    Ok(Page::new(assemble(db, rows).await?, total, request))
}

/// Compose and persist a booking with its line items as one unit.
///
/// Tier prices are read from the catalog; service lines keep the name and
/// unit price supplied by the caller. Any failure rolls back every row.
pub async fn create_booking(
    db: &DatabaseConnection,
    input: CreateBookingInput,
) -> Result<BookingDetails, DomainError> {
    input.validate_lines()?;
    if let Some(end) = input.end_date {
        if end < input.departure_date {
            return Err(DomainError::Validation(
                "End date must not be before the departure date".to_string(),
            ));
        }
    }

    let txn = db.begin().await?;

    let tour = tour::Entity::find_by_id(input.tour_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Tour", input.tour_id))?;

    let mut tier_lines = Vec::with_capacity(input.pricing_selections.len());
    for selection in &input.pricing_selections {
        let tier = tour_pricing::Entity::find_by_id(selection.pricing_tier_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("TourPricing", selection.pricing_tier_id))?;
        if tier.tour_id != tour.id {
            return Err(DomainError::Validation(format!(
                "Pricing option {} does not belong to tour {}",
                tier.id, tour.id
            )));
        }
        let unit_price = parse_money(&tier.price)?;
        let subtotal = line_subtotal(unit_price, selection.quantity)?;
        tier_lines.push((tier, selection.quantity, unit_price, subtotal));
    }

    let service_lines = input
        .service_selections
        .iter()
        .map(|s| Ok((s, line_subtotal(s.unit_price, s.quantity)?)))
        .collect::<Result<Vec<_>, DomainError>>()?;

    let total = booking_total(
        tier_lines
            .iter()
            .map(|(_, _, _, subtotal)| *subtotal)
            .chain(service_lines.iter().map(|(_, subtotal)| *subtotal)),
    )?;

    let header = booking::ActiveModel {
        tour_id: Set(tour.id),
        customer_name: Set(input.customer_name.clone()),
        customer_email: Set(input.customer_email.clone()),
        departure_date: Set(date_to_db(input.departure_date)),
        end_date: Set(input.end_date.map(date_to_db)),
        pickup_location: Set(input.pickup_location.clone()),
        pickup_address: Set(input.pickup_address.clone()),
        total_price: Set(money_to_db(total)),
        booking_time: Set(timestamp_to_db(now())),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        payment_id: Set(None),
        whatsapp_number: Set(input.whatsapp_number.clone()),
        note_for_meetup: Set(input.note.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for (tier, quantity, unit_price, subtotal) in tier_lines {
        booking_pricing_option::ActiveModel {
            booking_id: Set(header.id),
            pricing_option_id: Set(tier.id),
            customer_type: Set(tier.customer_type),
            round_trip: Set(tier.round_trip),
            quantity: Set(quantity),
            price: Set(money_to_db(unit_price)),
            subtotal: Set(money_to_db(subtotal)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for (selection, subtotal) in service_lines {
        let catalog_id = match selection.catalog_service_id {
            Some(id) => additional_service::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .map(|s| s.id),
            None => None,
        };
        if catalog_id.is_none() && selection.catalog_service_id.is_some() {
            tracing::debug!(
                "Additional service {:?} not in catalog, storing '{}' unlinked",
                selection.catalog_service_id,
                selection.service_name
            );
        }

        booking_additional_service::ActiveModel {
            booking_id: Set(header.id),
            additional_service_id: Set(catalog_id),
            service_name: Set(selection.service_name.clone()),
            service_type: Set(selection.service_type.clone()),
            price: Set(money_to_db(selection.unit_price)),
            quantity: Set(selection.quantity),
            subtotal: Set(money_to_db(subtotal)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let details = load(&txn, header.id).await?;
    txn.commit().await?;

    tracing::info!(
        "Created booking {} for tour {} ({}), total {}",
        details.id,
        details.tour_id,
        details.customer_email,
        details.total_price
    );
    Ok(details)
}

pub async fn get_booking(db: &DatabaseConnection, id: i32) -> Result<BookingDetails, DomainError> {
    load(db, id).await
}

pub async fn list_bookings(
    db: &DatabaseConnection,
    request: PageRequest,
) -> Result<Page<BookingDetails>, DomainError> {
    fetch_page(db, booking::Entity::find(), request).await
}

pub async fn list_bookings_by_email(
    db: &DatabaseConnection,
    email: &str,
    request: PageRequest,
) -> Result<Page<BookingDetails>, DomainError> {
    let query = booking::Entity::find().filter(booking::Column::CustomerEmail.eq(email));
    fetch_page(db, query, request).await
}

/// Set the status unconditionally. Moves outside the natural lifecycle
/// graph are allowed for administrators but logged.
pub async fn update_status(
    db: &DatabaseConnection,
    id: i32,
    status: BookingStatus,
) -> Result<BookingDetails, DomainError> {
    let row = find_row(db, id).await?;
    let current: BookingStatus = row.status.parse()?;
    if current.is_terminal() && current != status {
        tracing::warn!(
            "Booking {} reopened from terminal status {} -> {}",
            id,
            current,
            status
        );
    } else if !current.is_natural_transition(status) {
        tracing::warn!(
            "Booking {} moved outside the usual lifecycle: {} -> {}",
            id,
            current,
            status
        );
    }

    let mut active: booking::ActiveModel = row.into();
    active.status = Set(status.as_str().to_string());
    active.update(db).await?;

    tracing::info!("Booking {} status {} -> {}", id, current, status);
    load(db, id).await
}

/// Idempotent: always ends in CANCELLED.
pub async fn cancel_booking(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let row = find_row(db, id).await?;
    if row.status != BookingStatus::Cancelled.as_str() {
        let mut active: booking::ActiveModel = row.into();
        active.status = Set(BookingStatus::Cancelled.as_str().to_string());
        active.update(db).await?;
        tracing::info!("Booking {} cancelled", id);
    }
    Ok(())
}

/// Hard delete of the booking with its line items and payments.
pub async fn delete_booking(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    find_row(&txn, id).await?;

    payment::Entity::delete_many()
        .filter(payment::Column::BookingId.eq(id))
        .exec(&txn)
        .await?;
    booking_additional_service::Entity::delete_many()
        .filter(booking_additional_service::Column::BookingId.eq(id))
        .exec(&txn)
        .await?;
    booking_pricing_option::Entity::delete_many()
        .filter(booking_pricing_option::Column::BookingId.eq(id))
        .exec(&txn)
        .await?;
    booking::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!("Deleted booking {}", id);
    Ok(())
}

/// Record a manual bank-transfer (VietQR) payment awaiting verification
/// and confirm the booking, whatever its prior status.
pub async fn confirm_vietqr_payment(
    db: &DatabaseConnection,
    id: i32,
    reference: Option<String>,
) -> Result<BookingDetails, DomainError> {
    let txn = db.begin().await?;

    let row = find_row(&txn, id).await?;
    let amount = row.total_price.clone();

    let mut active: booking::ActiveModel = row.into();
    active.status = Set(BookingStatus::Confirmed.as_str().to_string());
    active.update(&txn).await?;

    let transaction_id = reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| fallback_transaction_id(Utc::now().timestamp_millis()));

    payment::ActiveModel {
        booking_id: Set(id),
        payment_method: Set(VIETQR_METHOD.to_string()),
        transaction_id: Set(Some(transaction_id.clone())),
        amount: Set(amount),
        currency: Set(VIETQR_CURRENCY.to_string()),
        payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
        payment_time: Set(Some(timestamp_to_db(now()))),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let details = load(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(
        "Booking {} confirmed via {} payment {}",
        id,
        VIETQR_METHOD,
        transaction_id
    );
    Ok(details)
}

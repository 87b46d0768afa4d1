use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::bookings::create_booking,
        api::bookings::get_booking,
        api::bookings::update_booking_status,
        api::bookings::confirm_vietqr_payment,
        api::bookings::yearly_stats,
        api::payments::verify_payment,
        api::tours::list_tours,
    ),
    tags(
        (name = "meetup-travel", description = "Meetup Travel booking API")
    )
)]
pub struct ApiDoc;

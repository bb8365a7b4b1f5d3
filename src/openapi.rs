use utoipa::OpenApi;

use crate::models::{
    Booking, BookingConfirmation, BookingCreate, ClassCreate, ClassCreated, ClassDetails,
    FitnessClass,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_check,
        crate::handlers::create_class,
        crate::handlers::list_all_classes,
        crate::handlers::list_upcoming_classes,
        crate::handlers::book_class,
        crate::handlers::bookings_by_email
    ),
    components(schemas(
        FitnessClass,
        Booking,
        ClassCreate,
        ClassDetails,
        ClassCreated,
        BookingCreate,
        BookingConfirmation
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "classes", description = "Fitness class scheduling"),
        (name = "bookings", description = "Seat reservations")
    )
)]
pub struct ApiDoc;

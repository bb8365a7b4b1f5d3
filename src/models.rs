use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A scheduled fitness session as stored in `fitnessclasses`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema, sqlx::FromRow)]
pub struct FitnessClass {
    pub id: i64,
    pub name: String,
    #[serde(rename = "dateTime")]
    #[sqlx(rename = "dateTime")]
    #[schema(value_type = String, format = "date-time", example = "2025-12-25T09:00:00")]
    pub date_time: NaiveDateTime,
    pub instructor: String,
    #[serde(rename = "availableSlots")]
    #[sqlx(rename = "availableSlots")]
    pub available_slots: i64,
}

/// A reservation of one slot, as stored in `bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
}

/// Body of `POST /classes/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Yoga Morning",
    "dateTime": "2023-12-25T09:00:00",
    "instructor": "Jane Doe",
    "availableSlots": 20
}))]
pub struct ClassCreate {
    pub name: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
    pub instructor: String,
    #[serde(rename = "availableSlots")]
    pub available_slots: i64,
}

/// A validated class, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub name: String,
    pub date_time: NaiveDateTime,
    pub instructor: String,
    pub available_slots: i64,
}

/// Body of `POST /book`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "class_id": 1,
    "client_name": "Alice",
    "client_email": "alice@example.com"
}))]
pub struct BookingCreate {
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingsQuery {
    /// Client email to look bookings up by
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassDetails {
    pub name: String,
    #[serde(rename = "dateTime")]
    #[schema(value_type = String, format = "date-time", example = "2025-12-25T09:00:00")]
    pub date_time: NaiveDateTime,
    pub instructor: String,
    #[serde(rename = "availableSlots")]
    pub available_slots: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassCreated {
    pub message: String,
    pub class_id: i64,
    pub class_details: ClassDetails,
}

impl From<FitnessClass> for ClassCreated {
    fn from(class: FitnessClass) -> Self {
        Self {
            message: "Class created successfully".into(),
            class_id: class.id,
            class_details: ClassDetails {
                name: class.name,
                date_time: class.date_time,
                instructor: class.instructor,
                available_slots: class.available_slots,
            },
        }
    }
}

/// Outcome of a successful booking transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    pub booking: Booking,
    pub remaining_slots: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingConfirmation {
    pub message: String,
    pub booking_id: i64,
    pub remaining_slots: i64,
}

impl From<BookingReceipt> for BookingConfirmation {
    fn from(receipt: BookingReceipt) -> Self {
        Self {
            message: "Booking successful".into(),
            booking_id: receipt.booking.id,
            remaining_slots: receipt.remaining_slots,
        }
    }
}

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Booking, BookingReceipt, FitnessClass, NewClass};
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("No slots available for class {0}")]
    SlotsExhausted(i64),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ClassNotFound(_) => ServiceError::NotFound("Class not found".into()),
            StoreError::SlotsExhausted(class_id) => ServiceError::SlotsExhausted(class_id),
            StoreError::Database(_) => ServiceError::Store(value),
        }
    }
}

/// Class listing and booking rules on top of [`Store`].
///
/// Every listing treats an empty result as `NotFound` rather than returning
/// an empty array; clients of the existing API rely on the 404.
#[derive(Clone, Debug)]
pub struct BookingService {
    store: Store,
}

fn non_empty<T>(items: Vec<T>, message: &str) -> Result<Vec<T>, ServiceError> {
    if items.is_empty() {
        warn!("{message}");
        Err(ServiceError::NotFound(message.to_string()))
    } else {
        Ok(items)
    }
}

impl BookingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn create_class(&self, class: NewClass) -> Result<FitnessClass, ServiceError> {
        let created = self.store.insert_class(&class).await?;
        info!(
            "Class '{}' created successfully with ID {}",
            created.name, created.id
        );
        Ok(created)
    }

    pub async fn list_all_classes(&self) -> Result<Vec<FitnessClass>, ServiceError> {
        let classes = self.store.all_classes().await?;
        non_empty(classes, "No classes found")
    }

    pub async fn list_upcoming_classes(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<FitnessClass>, ServiceError> {
        let classes = self.store.classes_after(now.naive_utc()).await?;
        non_empty(classes, "No classes found")
    }

    pub async fn book_class(
        &self,
        class_id: i64,
        client_name: &str,
        client_email: &str,
    ) -> Result<BookingReceipt, ServiceError> {
        match self
            .store
            .book_class(class_id, client_name, client_email)
            .await
        {
            Ok(receipt) => {
                info!(
                    "Booking successful for {client_email}, booking ID {}",
                    receipt.booking.id
                );
                Ok(receipt)
            }
            Err(StoreError::ClassNotFound(id)) => {
                warn!("Class with ID {id} not found");
                Err(StoreError::ClassNotFound(id).into())
            }
            Err(StoreError::SlotsExhausted(id)) => {
                info!("No available slots for class ID {id}");
                Err(ServiceError::SlotsExhausted(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list_bookings_by_email(&self, email: &str) -> Result<Vec<Booking>, ServiceError> {
        let bookings = self.store.bookings_by_email(email).await?;
        non_empty(bookings, "No bookings found for this email")
    }
}

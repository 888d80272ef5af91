//! REST backend speaking the json-server style API.

use super::{BackendFuture, BookingBackend, GatewayError, GatewayResult};
use crate::types::{Booking, BookingId, BookingStatus, NewBooking, NewUser, User};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// [`BookingBackend`] over HTTP
#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    /// Backend rooted at `base_url`, e.g. `http://localhost:3001`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Backend using a preconfigured client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

fn unreachable_error(error: &reqwest::Error) -> GatewayError {
    GatewayError::Unreachable(error.to_string())
}

async fn ensure_success(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

impl BookingBackend for RestBackend {
    fn fetch_bookings(&self) -> BackendFuture<Vec<Booking>> {
        let request = self.client.get(self.url("bookings"));
        Box::pin(async move {
            let response = request.send().await.map_err(|e| unreachable_error(&e))?;
            read_json(response).await
        })
    }

    fn find_users_by_email(&self, email: &str) -> BackendFuture<Vec<User>> {
        let request = self.client.get(self.url("users")).query(&[("email", email)]);
        Box::pin(async move {
            let response = request.send().await.map_err(|e| unreachable_error(&e))?;
            read_json(response).await
        })
    }

    fn create_user(&self, user: NewUser) -> BackendFuture<User> {
        let request = self.client.post(self.url("users")).json(&user);
        Box::pin(async move {
            let response = request.send().await.map_err(|e| unreachable_error(&e))?;
            read_json(response).await
        })
    }

    fn create_booking(&self, booking: NewBooking) -> BackendFuture<Booking> {
        let booking = NewBooking {
            status: BookingStatus::Pending,
            ..booking
        };
        let request = self.client.post(self.url("bookings")).json(&booking);
        Box::pin(async move {
            let response = request.send().await.map_err(|e| unreachable_error(&e))?;
            read_json(response).await
        })
    }

    fn update_booking_status(&self, id: &BookingId, status: BookingStatus) -> BackendFuture<Booking> {
        let request = self
            .client
            .patch(self.url(&format!("bookings/{id}")))
            .json(&serde_json::json!({ "status": status }));
        Box::pin(async move {
            let response = request.send().await.map_err(|e| unreachable_error(&e))?;
            read_json(response).await
        })
    }

    fn delete_booking(&self, id: &BookingId) -> BackendFuture<()> {
        let request = self.client.delete(self.url(&format!("bookings/{id}")));
        Box::pin(async move {
            let response = request.send().await.map_err(|e| unreachable_error(&e))?;
            ensure_success(response).await.map(|_| ())
        })
    }
}

use crate::interface_adapters::protocol::{CreateRoomRequest, WorkerStatusResponse};
use crate::use_cases::{CreateRoomError, RoomCreator, StatusError, StatusSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

// Thin reqwest client for the workers' internal API.
#[derive(Clone)]
pub struct WorkerClient {
    http: reqwest::Client,
}

impl WorkerClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl RoomCreator for WorkerClient {
    async fn create_room(&self, base_url: &str, room_id: &str) -> Result<(), CreateRoomError> {
        let url = format!("{base_url}/internal/create");
        let response = self
            .http
            .put(url)
            .json(&CreateRoomRequest { room_id })
            .send()
            .await
            .map_err(|_| CreateRoomError::Unreachable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CreateRoomError::Rejected(response.status().as_u16()))
        }
    }
}

#[async_trait]
impl StatusSource for WorkerClient {
    async fn fetch_status(&self, base_url: &str) -> Result<HashMap<String, usize>, StatusError> {
        let url = format!("{base_url}/internal/status");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|_| StatusError::Unreachable)?;

        if !response.status().is_success() {
            return Err(StatusError::Rejected(response.status().as_u16()));
        }

        let status = response
            .json::<WorkerStatusResponse>()
            .await
            .map_err(|_| StatusError::Decode)?;
        Ok(status
            .rooms
            .into_iter()
            .map(|room| (room.room_id, room.occupancy))
            .collect())
    }
}

// Join placement: seat the player in an existing room, or provision a
// new one on the least-loaded worker.

use crate::domain::{Placement, WorkerRegistry};
use async_trait::async_trait;
use std::fmt;

#[derive(Debug)]
pub enum CreateRoomError {
    Unreachable,
    Rejected(u16),
}

#[derive(Debug)]
pub enum PlacementError {
    /// No worker is registered.
    NoWorkers,
    /// The chosen worker refused or failed to create a room.
    CreateFailed(CreateRoomError),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::NoWorkers => write!(f, "no workers available"),
            PlacementError::CreateFailed(e) => write!(f, "room creation failed: {e:?}"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Seam for provisioning rooms on workers over HTTP.
#[async_trait]
pub trait RoomCreator: Send + Sync {
    async fn create_room(&self, base_url: &str, room_id: &str) -> Result<(), CreateRoomError>;
}

/// Finds a seat for one player. The registry's occupancy estimate is
/// bumped immediately; the registry lock is never held across the
/// provisioning call, so two concurrent joins can race to create a room
/// on the same worker. The losing create returns a conflict the worker
/// tolerates, and the next probe reconciles the counts.
pub async fn assign_room(
    registry: &WorkerRegistry,
    creator: &dyn RoomCreator,
) -> Result<Placement, PlacementError> {
    if let Some(placement) = registry.reserve_existing_slot() {
        return Ok(placement);
    }

    let addr = registry.choose_host().ok_or(PlacementError::NoWorkers)?;
    let room_id = uuid::Uuid::new_v4().to_string();

    match creator.create_room(&addr.base_url(), &room_id).await {
        Ok(()) | Err(CreateRoomError::Rejected(409)) => {}
        Err(e) => return Err(PlacementError::CreateFailed(e)),
    }

    registry.add_room(&addr.key(), room_id.clone());
    Ok(Placement { addr, room_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkerAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingCreator {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RoomCreator for RecordingCreator {
        async fn create_room(&self, _base_url: &str, _room_id: &str) -> Result<(), CreateRoomError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CreateRoomError::Unreachable)
            } else {
                Ok(())
            }
        }
    }

    fn creator(fail: bool) -> RecordingCreator {
        RecordingCreator {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    #[tokio::test]
    async fn no_workers_means_no_placement() {
        let registry = WorkerRegistry::new(16);
        let creator = creator(false);
        assert!(matches!(
            assign_room(&registry, &creator).await,
            Err(PlacementError::NoWorkers)
        ));
        assert_eq!(creator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_join_provisions_a_room() {
        let registry = WorkerRegistry::new(16);
        registry.register_host(WorkerAddr {
            host: "w1".to_string(),
            port: 3001,
        });
        let creator = creator(false);

        let placement = assign_room(&registry, &creator).await.unwrap();
        assert_eq!(placement.addr.host, "w1");
        assert_eq!(creator.calls.load(Ordering::SeqCst), 1);

        // Second join reuses the room without another create call.
        let again = assign_room(&registry, &creator).await.unwrap();
        assert_eq!(again.room_id, placement.room_id);
        assert_eq!(creator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_provisioning_surfaces() {
        let registry = WorkerRegistry::new(16);
        registry.register_host(WorkerAddr {
            host: "w1".to_string(),
            port: 3001,
        });
        let creator = creator(true);
        assert!(matches!(
            assign_room(&registry, &creator).await,
            Err(PlacementError::CreateFailed(_))
        ));
    }
}

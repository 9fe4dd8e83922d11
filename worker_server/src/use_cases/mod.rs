pub mod events;
pub mod game;
pub mod lobby;
pub mod room;

pub use events::{DeltaUpdate, GameEvent, OutboundEvent};
pub use game::{Game, MAX_ENTITY_COUNT};
pub use lobby::{Lobby, LobbyError, RoomStatus};
pub use room::{ConnectError, Room, RoomSettings, ROOM_CAPACITY};

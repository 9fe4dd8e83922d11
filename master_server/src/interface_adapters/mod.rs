// Interface adapters: HTTP DTOs, handlers, and fleet clients.

pub mod clients;
pub mod handlers;
pub mod protocol;
pub mod state;

// Interface adapters: HTTP surface and the upstream client.

pub mod clients;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;

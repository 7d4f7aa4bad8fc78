pub mod dto;
pub mod error;
pub mod handlers;
pub mod resource;
pub mod routes;

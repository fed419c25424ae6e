pub mod dtos;
pub mod extractors;
pub mod hal;
pub mod handlers;
pub mod router;

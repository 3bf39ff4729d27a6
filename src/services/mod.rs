pub mod presence_service;
pub mod reservation_service;
pub mod room_service;

pub mod message;
pub mod room;

pub use message::RoomMessage;
pub use room::Room;

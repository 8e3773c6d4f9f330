pub mod bookings;
pub mod connections;
pub mod conversations;
pub mod messages;
pub mod notifications;
pub mod profiles;
pub mod reviews;
pub mod slots;

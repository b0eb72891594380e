pub mod booking;
pub mod content;
pub mod emergency;
pub mod moderation;

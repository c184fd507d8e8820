pub mod assignment;
pub mod attendance;
pub mod role;
pub mod shift;
pub mod user;

pub mod assignment;
pub mod attendance;
pub mod health;
pub mod response;
pub mod shift;

#[cfg(test)]
pub mod test_support;

// Export Client type for use with other public interfaces.
pub mod client;

pub mod repos;

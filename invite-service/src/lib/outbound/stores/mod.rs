pub mod memory_invitation;
pub mod redis_invitation;

pub use memory_invitation::InMemoryInvitationTokenStore;
pub use redis_invitation::RedisInvitationTokenStore;

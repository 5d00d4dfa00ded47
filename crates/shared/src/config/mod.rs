mod database;
mod redis;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::redis::{RedisClient, RedisConfig};

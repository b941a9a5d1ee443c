pub mod diesel_pool;

pub use diesel_pool::{
    check_pool_health, create_diesel_pool, mask_connection_string, DieselPool, PoolConfig,
    MIGRATIONS,
};

pub mod common_env;
pub mod consts;
pub mod graceful;
pub mod logging;
pub mod mongo;
pub mod mq;
pub mod mysql_pool;
pub mod redis_pool;

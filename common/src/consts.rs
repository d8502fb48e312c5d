pub const COMMON_ENV_PATH: &str = "./deploy/common.env";
pub const JIPENG_CONFIG_PATH: &str = "./deploy/jipeng";

/// 运行模式常量
pub const RUN_MODE_DEV: &str = "dev";
pub const RUN_MODE_TEST: &str = "test";
pub const RUN_MODE_PROD: &str = "prod";

/// Redis DB 常量 - 缓存和消息队列分库存放
pub const REDIS_DB_CACHE: u32 = 4;
pub const REDIS_DB_MQ: u32 = 0;

/// Redis 连接池大小
pub const REDIS_POOL_MAX_SIZE: usize = 32;

/// MySQL 连接池默认配置
pub const MYSQL_MAX_CONNECTIONS: u32 = 32;
pub const MYSQL_MIN_CONNECTIONS: u32 = 1;
pub const MYSQL_IDLE_TIMEOUT_SECS: u64 = 600;
pub const MYSQL_MAX_LIFETIME_SECS: u64 = 1800;
pub const MYSQL_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const MYSQL_TEST_BEFORE_ACQUIRE: bool = false;

/// MongoDB 连接池大小
pub const MONGO_MAX_POOL_SIZE: u32 = 32;

/// MQ stream 的统一前缀和最大长度（MAXLEN ~ 近似裁剪）
pub const MQ_STREAM_PREFIX: &str = "jipeng";
pub const MQ_STREAM_MAXLEN: usize = 10000;
/// 每条消息只有一个字段 payload 为 json
pub const MQ_MSG_KEY: &str = "payload";

pub fn validate_run_mode(run_mode: &str) -> anyhow::Result<()> {
	match run_mode {
		RUN_MODE_DEV | RUN_MODE_TEST | RUN_MODE_PROD => Ok(()),
		_ => Err(anyhow::anyhow!("Invalid RUN_MODE: {}. Must be one of '{}', '{}' or '{}'", run_mode, RUN_MODE_DEV, RUN_MODE_TEST, RUN_MODE_PROD)),
	}
}

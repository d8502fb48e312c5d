use {
	crate::config::CacheConfig,
	common::{common_env::CommonEnv, redis_pool},
	deadpool_redis::Pool,
	tracing::info,
};

/// 缓存 Redis 连接池
#[derive(Clone)]
pub struct CachePool {
	pool: Pool,
}

impl CachePool {
	pub fn new(pool: Pool) -> Self {
		Self { pool }
	}

	pub async fn ping(&self) -> anyhow::Result<()> {
		redis_pool::ping(&self.pool, "Cache").await
	}

	/// 关闭连接池 (释放所有连接)
	pub fn close(&self) {
		self.pool.close();
	}
}

/// 初始化缓存 Redis 连接池并确认可用
pub async fn init(env: &CommonEnv, config: &CacheConfig) -> anyhow::Result<CachePool> {
	let pool = redis_pool::create_pool(&env.cache_redis_host, env.cache_redis_password.as_deref(), config.db, config.pool_size)?;
	let cache = CachePool::new(pool);
	cache.ping().await?;
	info!("Cache Redis pool initialized (host: {}, db: {})", env.cache_redis_host, config.db);
	Ok(cache)
}

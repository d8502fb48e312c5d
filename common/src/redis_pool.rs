use {
	deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime},
	redis::AsyncCommands,
};

/// 拼接 redis url 密码为空时不带认证段
pub fn redis_url(redis_host: &str, redis_password: Option<&str>, db: u32) -> String {
	let auth = match redis_password {
		Some(pwd) if !pwd.is_empty() => format!(":{}@", pwd),
		_ => String::new(),
	};
	format!("redis://{}{}/{}", auth, redis_host, db)
}

/// 创建 Redis 连接池（不会立即建立连接 需要调用方 ping 确认可用）
pub fn create_pool(redis_host: &str, redis_password: Option<&str>, db: u32, max_size: usize) -> anyhow::Result<Pool> {
	let mut cfg = Config::from_url(redis_url(redis_host, redis_password, db));
	cfg.pool = Some(PoolConfig::new(max_size));
	let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
	Ok(pool)
}

/// 从连接池获取连接
pub async fn get_connection(pool: &Pool, name: &str) -> anyhow::Result<Connection> {
	pool.get().await.map_err(|e| anyhow::anyhow!("Failed to get {} redis connection: {}", name, e))
}

/// Ping 指定连接池
pub async fn ping(pool: &Pool, name: &str) -> anyhow::Result<()> {
	let mut conn = get_connection(pool, name).await?;
	let _: String = conn.ping().await.map_err(|e| anyhow::anyhow!("{} Redis ping error: {}", name, e))?;
	Ok(())
}

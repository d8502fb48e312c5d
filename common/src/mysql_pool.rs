use {
	serde::{Deserialize, Serialize},
	sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions},
	std::time::Duration,
	tracing::info,
};

/// MySQL 连接池配置
#[derive(Debug, Clone)]
pub struct MySqlPoolConfig {
	pub max_connections: u32,
	pub min_connections: u32,
	pub idle_timeout: Duration,
	pub max_lifetime: Duration,
	pub acquire_timeout: Duration,
	pub test_before_acquire: bool,
}

impl Default for MySqlPoolConfig {
	fn default() -> Self {
		use crate::consts::*;
		Self {
			max_connections: MYSQL_MAX_CONNECTIONS,
			min_connections: MYSQL_MIN_CONNECTIONS,
			idle_timeout: Duration::from_secs(MYSQL_IDLE_TIMEOUT_SECS),
			max_lifetime: Duration::from_secs(MYSQL_MAX_LIFETIME_SECS),
			acquire_timeout: Duration::from_secs(MYSQL_ACQUIRE_TIMEOUT_SECS),
			test_before_acquire: MYSQL_TEST_BEFORE_ACQUIRE,
		}
	}
}

/// 连接参数
#[derive(Debug, Clone)]
pub struct MySqlTarget<'a> {
	pub host: &'a str,
	pub port: u16,
	pub user: &'a str,
	pub password: &'a str,
	pub database: &'a str,
}

/// 初始化 MySQL 连接池
pub async fn init_mysql_pool(target: MySqlTarget<'_>, config: MySqlPoolConfig) -> anyhow::Result<MySqlPool> {
	// 用 options 而不是拼 url 密码里的特殊字符不需要转义
	let connect_options = MySqlConnectOptions::new().host(target.host).port(target.port).username(target.user).password(target.password).database(target.database);

	let pool_options = MySqlPoolOptions::new()
		.max_connections(config.max_connections)
		.min_connections(config.min_connections)
		.acquire_timeout(config.acquire_timeout)
		.test_before_acquire(config.test_before_acquire)
		.idle_timeout(config.idle_timeout)
		.max_lifetime(config.max_lifetime);

	let pool = pool_options.connect_with(connect_options).await?;

	// 测试连接
	sqlx::query("SELECT 1").execute(&pool).await?;

	info!("MySQL pool initialized: {}:{}/{} (max: {}, min: {})", target.host, target.port, target.database, config.max_connections, config.min_connections);
	Ok(pool)
}

/// MySQL 配置文件结构体（用于从 TOML 配置文件反序列化）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MySqlConfig {
	pub max_connections: u32,
	pub min_connections: u32,
	pub idle_timeout_secs: u64,
	pub max_lifetime_secs: u64,
	#[serde(default = "default_acquire_timeout_secs")]
	pub acquire_timeout_secs: u64,
	#[serde(default)]
	pub test_before_acquire: bool,
}

fn default_acquire_timeout_secs() -> u64 {
	crate::consts::MYSQL_ACQUIRE_TIMEOUT_SECS
}

impl MySqlConfig {
	/// 检查配置是否有效
	pub fn check(&self) -> anyhow::Result<()> {
		if self.max_connections == 0 {
			return Err(anyhow::anyhow!("MySQL max_connections must be greater than 0"));
		}
		if self.min_connections == 0 {
			return Err(anyhow::anyhow!("MySQL min_connections must be greater than 0"));
		}
		if self.idle_timeout_secs == 0 {
			return Err(anyhow::anyhow!("MySQL idle_timeout_secs must be greater than 0"));
		}
		if self.max_lifetime_secs == 0 {
			return Err(anyhow::anyhow!("MySQL max_lifetime_secs must be greater than 0"));
		}
		if self.acquire_timeout_secs == 0 {
			return Err(anyhow::anyhow!("MySQL acquire_timeout_secs must be greater than 0"));
		}
		if self.max_connections < self.min_connections {
			return Err(anyhow::anyhow!("MySQL max_connections must not be less than min_connections"));
		}
		Ok(())
	}

	pub fn pool_config(&self) -> MySqlPoolConfig {
		MySqlPoolConfig {
			max_connections: self.max_connections,
			min_connections: self.min_connections,
			idle_timeout: Duration::from_secs(self.idle_timeout_secs),
			max_lifetime: Duration::from_secs(self.max_lifetime_secs),
			acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
			test_before_acquire: self.test_before_acquire,
		}
	}
}

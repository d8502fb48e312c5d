use {
	crate::consts::COMMON_ENV_PATH,
	config::{Config, Environment},
	serde::{Deserialize, Serialize},
	std::path::Path,
	tokio::sync::OnceCell,
};

/// 连接凭据等敏感信息只从环境变量读取 不进配置文件
#[derive(Clone, Deserialize, Serialize)]
pub struct CommonEnv {
	pub run_mode: String,

	// Cache Redis 配置
	pub cache_redis_host: String,
	pub cache_redis_password: Option<String>,

	// MQ Redis 配置
	pub mq_redis_host: String,
	pub mq_redis_password: Option<String>,

	// MySQL 配置
	pub mysql_host: String,
	pub mysql_port: u16,
	pub mysql_user: String,
	pub mysql_password: String,
	pub mysql_database: String,

	// MongoDB 配置
	pub mongo_uri: String,
	pub mongo_database: String,

	// 微信配置
	pub wx_app_id: String,
	pub wx_app_secret: String,
}

// 手写 Debug 避免密码进日志
impl std::fmt::Debug for CommonEnv {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommonEnv")
			.field("run_mode", &self.run_mode)
			.field("cache_redis_host", &self.cache_redis_host)
			.field("mq_redis_host", &self.mq_redis_host)
			.field("mysql_host", &self.mysql_host)
			.field("mysql_port", &self.mysql_port)
			.field("mysql_user", &self.mysql_user)
			.field("mysql_database", &self.mysql_database)
			.field("mongo_database", &self.mongo_database)
			.field("wx_app_id", &self.wx_app_id)
			.finish_non_exhaustive()
	}
}

impl CommonEnv {
	pub fn check(&self) -> anyhow::Result<()> {
		crate::consts::validate_run_mode(&self.run_mode)?;

		if self.cache_redis_host.is_empty() {
			return Err(anyhow::anyhow!("Cache Redis host is empty"));
		}
		if self.mq_redis_host.is_empty() {
			return Err(anyhow::anyhow!("MQ Redis host is empty"));
		}
		if self.mysql_host.is_empty() {
			return Err(anyhow::anyhow!("MySQL host is empty"));
		}
		if self.mysql_user.is_empty() {
			return Err(anyhow::anyhow!("MySQL user is empty"));
		}
		if self.mysql_database.is_empty() {
			return Err(anyhow::anyhow!("MySQL database is empty"));
		}
		if self.mongo_uri.is_empty() {
			return Err(anyhow::anyhow!("MongoDB uri is empty"));
		}
		if self.mongo_database.is_empty() {
			return Err(anyhow::anyhow!("MongoDB database is empty"));
		}
		if self.wx_app_id.is_empty() {
			return Err(anyhow::anyhow!("Wx app id is empty"));
		}
		if self.wx_app_secret.is_empty() {
			return Err(anyhow::anyhow!("Wx app secret is empty"));
		}
		Ok(())
	}
}

pub static COMMON_ENV: OnceCell<CommonEnv> = OnceCell::const_new();

pub fn load_common_env() -> anyhow::Result<()> {
	// 容器里一般直接注入环境变量 文件不存在时跳过
	if Path::new(COMMON_ENV_PATH).exists() {
		dotenvy::from_path(COMMON_ENV_PATH)?;
	}

	let common_env = parse_common_env(Environment::default())?;
	println!("Common env configuration: {:?}", common_env);
	COMMON_ENV.set(common_env)?;
	Ok(())
}

/// 从给定的环境变量源反序列化并校验
pub fn parse_common_env(source: Environment) -> anyhow::Result<CommonEnv> {
	let config = Config::builder().add_source(source).build()?;
	let common_env: CommonEnv = config.try_deserialize()?;
	common_env.check()?;
	Ok(common_env)
}

pub fn get_common_env() -> anyhow::Result<&'static CommonEnv> {
	COMMON_ENV.get().ok_or_else(|| anyhow::anyhow!("Common env not loaded"))
}

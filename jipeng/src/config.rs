use {
	crate::{consts::*, server::ServerSettings},
	common::{logging::LoggingConfig, mysql_pool::MySqlConfig},
	config::{Config, Environment, File, FileFormat},
	serde::{Deserialize, Serialize},
	std::{net::SocketAddr, time::Duration},
	tokio::sync::OnceCell,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JipengConfig {
	pub logging: LoggingConfig,
	#[serde(default)]
	pub server: ServerConfig,
	#[serde(default)]
	pub cache: CacheConfig,
	pub mysql: MySqlConfig,
	#[serde(default)]
	pub mongodb: MongoConfig,
	#[serde(default)]
	pub mq: MqConfig,
	#[serde(default)]
	pub wx: WxConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	pub read_timeout_secs: u64,
	pub read_header_timeout_secs: u64,
	pub write_timeout_secs: u64,
	pub idle_timeout_secs: u64,
	pub max_header_bytes: usize,
	pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: DEFAULT_PORT,
			read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
			read_header_timeout_secs: DEFAULT_READ_HEADER_TIMEOUT_SECS,
			write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
			idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
			max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
			shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
		}
	}
}

impl ServerConfig {
	pub fn get_addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	pub fn check(&self) -> anyhow::Result<()> {
		self.get_addr().parse::<SocketAddr>().map_err(|e| anyhow::anyhow!("Invalid server address {}: {}", self.get_addr(), e))?;
		if self.read_timeout_secs == 0 || self.read_header_timeout_secs == 0 || self.write_timeout_secs == 0 || self.idle_timeout_secs == 0 {
			return Err(anyhow::anyhow!("Server timeouts must be greater than 0"));
		}
		if self.max_header_bytes < MIN_MAX_HEADER_BYTES {
			return Err(anyhow::anyhow!("Server max_header_bytes must be at least {}", MIN_MAX_HEADER_BYTES));
		}
		if self.shutdown_timeout_secs == 0 {
			return Err(anyhow::anyhow!("Server shutdown_timeout_secs must be greater than 0"));
		}
		Ok(())
	}

	pub fn settings(&self) -> ServerSettings {
		ServerSettings {
			addr: self.get_addr(),
			read_timeout: Duration::from_secs(self.read_timeout_secs),
			read_header_timeout: Duration::from_secs(self.read_header_timeout_secs),
			write_timeout: Duration::from_secs(self.write_timeout_secs),
			idle_timeout: Duration::from_secs(self.idle_timeout_secs),
			max_header_bytes: self.max_header_bytes,
		}
	}

	pub fn shutdown_timeout(&self) -> Duration {
		Duration::from_secs(self.shutdown_timeout_secs)
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
	pub db: u32,
	pub pool_size: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self { db: common::consts::REDIS_DB_CACHE, pool_size: common::consts::REDIS_POOL_MAX_SIZE }
	}
}

impl CacheConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		if self.pool_size == 0 {
			return Err(anyhow::anyhow!("Cache pool_size must be greater than 0"));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MongoConfig {
	pub max_pool_size: u32,
}

impl Default for MongoConfig {
	fn default() -> Self {
		Self { max_pool_size: common::consts::MONGO_MAX_POOL_SIZE }
	}
}

impl MongoConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		if self.max_pool_size == 0 {
			return Err(anyhow::anyhow!("MongoDB max_pool_size must be greater than 0"));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MqConfig {
	pub db: u32,
	pub pool_size: usize,
	pub stream_prefix: String,
	pub stream_maxlen: usize,
}

impl Default for MqConfig {
	fn default() -> Self {
		Self {
			db: common::consts::REDIS_DB_MQ,
			pool_size: common::consts::REDIS_POOL_MAX_SIZE,
			stream_prefix: common::consts::MQ_STREAM_PREFIX.to_string(),
			stream_maxlen: common::consts::MQ_STREAM_MAXLEN,
		}
	}
}

impl MqConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		if self.pool_size == 0 {
			return Err(anyhow::anyhow!("MQ pool_size must be greater than 0"));
		}
		if self.stream_prefix.is_empty() {
			return Err(anyhow::anyhow!("MQ stream_prefix is empty"));
		}
		if self.stream_maxlen == 0 {
			return Err(anyhow::anyhow!("MQ stream_maxlen must be greater than 0"));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WxConfig {
	pub api_base: String,
	pub timeout_secs: u64,
	pub connect_timeout_secs: u64,
}

impl Default for WxConfig {
	fn default() -> Self {
		Self { api_base: DEFAULT_WX_API_BASE.to_string(), timeout_secs: DEFAULT_WX_TIMEOUT_SECS, connect_timeout_secs: DEFAULT_WX_CONNECT_TIMEOUT_SECS }
	}
}

impl WxConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
			return Err(anyhow::anyhow!("Wx api_base must be an http(s) url: {}", self.api_base));
		}
		if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
			return Err(anyhow::anyhow!("Wx timeouts must be greater than 0"));
		}
		Ok(())
	}
}

impl JipengConfig {
	pub fn check(&self) -> anyhow::Result<()> {
		self.logging.check()?;
		self.server.check()?;
		self.cache.check()?;
		self.mysql.check()?;
		self.mongodb.check()?;
		self.mq.check()?;
		self.wx.check()?;
		Ok(())
	}
}

pub static CONFIG: OnceCell<JipengConfig> = OnceCell::const_new();

/// 读取 `{config_path}/{run_mode}.toml` 环境变量 `JIPENG__SECTION__KEY` 可以覆盖文件里的值
pub fn load_config(config_path: &str, run_mode: &str) -> anyhow::Result<()> {
	let config = Config::builder()
		.add_source(File::with_name(&format!("{}/{}", config_path, run_mode)).required(true))
		.add_source(Environment::with_prefix("JIPENG").prefix_separator("__").separator("__"))
		.build()?;

	let jipeng_config: JipengConfig = config.try_deserialize()?;
	jipeng_config.check()?;
	println!("Configuration loaded for mode: {}", run_mode);
	println!("Configuration: {:?}", jipeng_config);
	CONFIG.set(jipeng_config)?;
	Ok(())
}

/// 从 toml 文本解析配置 不写入全局
pub fn parse_config(content: &str) -> anyhow::Result<JipengConfig> {
	let config = Config::builder().add_source(File::from_str(content, FileFormat::Toml)).build()?;
	let jipeng_config: JipengConfig = config.try_deserialize()?;
	jipeng_config.check()?;
	Ok(jipeng_config)
}

pub fn get_config() -> anyhow::Result<&'static JipengConfig> {
	CONFIG.get().ok_or_else(|| anyhow::anyhow!("Config not loaded"))
}

use {
	crate::{
		cache::{self, CachePool},
		config::{get_config, load_config},
		db::{self, MongoStore},
		mq,
		wx::{self, WxClient},
	},
	common::{
		common_env::{self, get_common_env},
		mq::MqProducer,
	},
	sqlx::MySqlPool,
	tracing::info,
};

/// 启动期创建的外部资源 由 main 持有 停机后按初始化的逆序释放
pub struct AppResources {
	pub cache: CachePool,
	pub mysql: MySqlPool,
	pub mongo: MongoStore,
	pub mq: MqProducer,
	pub wx: WxClient,
}

impl AppResources {
	/// 逆序释放：wx → mq → mongodb → mysql → cache
	pub async fn close(self) {
		let Self { cache, mysql, mongo, mq, wx } = self;

		drop(wx);
		info!("Wx client released");

		mq.close();
		info!("MQ Redis pool closed");

		mongo.close().await;
		info!("MongoDB client closed");

		mysql.close().await;
		info!("MySQL pool closed");

		cache.close();
		info!("Cache Redis pool closed");
	}
}

/// 按固定顺序初始化 任何一步失败直接返回 由 main 终止进程
pub async fn init_all() -> anyhow::Result<AppResources> {
	init_load()?;
	init_logging()?;

	let env = get_common_env()?;
	let config = get_config()?;

	let cache = cache::init(env, &config.cache).await?; // 初始化缓存
	let mysql = db::init_mysql(env, &config.mysql).await?; // 初始化 MySQL 连接池
	let mongo = db::init_mongo(env, &config.mongodb).await?; // 初始化 MongoDB 客户端
	let mq = mq::init(env, &config.mq).await?; // 初始化消息队列
	let wx = wx::set(env, &config.wx)?; // 设置微信客户端

	Ok(AppResources { cache, mysql, mongo, mq, wx })
}

fn init_load() -> anyhow::Result<()> {
	common_env::load_common_env()?;
	let run_mode = &get_common_env()?.run_mode;
	load_config(common::consts::JIPENG_CONFIG_PATH, run_mode)?;
	Ok(())
}

fn init_logging() -> anyhow::Result<()> {
	common::logging::init_logging(&get_config()?.logging)
}

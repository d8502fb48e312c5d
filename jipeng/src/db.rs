use {
	crate::{config::MongoConfig, consts::MONGO_APP_NAME},
	common::{
		common_env::CommonEnv,
		mongo::init_mongo_client,
		mysql_pool::{MySqlConfig, MySqlTarget, init_mysql_pool},
	},
	mongodb::{Client, Database},
	sqlx::MySqlPool,
	tracing::info,
};

/// 初始化 MySQL 连接池
pub async fn init_mysql(env: &CommonEnv, config: &MySqlConfig) -> anyhow::Result<MySqlPool> {
	let target = MySqlTarget { host: &env.mysql_host, port: env.mysql_port, user: &env.mysql_user, password: &env.mysql_password, database: &env.mysql_database };
	init_mysql_pool(target, config.pool_config()).await
}

/// MongoDB 客户端和业务库
#[derive(Clone)]
pub struct MongoStore {
	client: Client,
	database: Database,
}

impl MongoStore {
	pub fn database(&self) -> &Database {
		&self.database
	}

	/// 关闭客户端 等待已借出的连接归还
	pub async fn close(self) {
		self.client.shutdown().await;
	}
}

/// 初始化 MongoDB 客户端
pub async fn init_mongo(env: &CommonEnv, config: &MongoConfig) -> anyhow::Result<MongoStore> {
	let client = init_mongo_client(&env.mongo_uri, MONGO_APP_NAME, config.max_pool_size).await?;
	let database = client.database(&env.mongo_database);
	info!("MongoDB database selected: {}", env.mongo_database);
	Ok(MongoStore { client, database })
}

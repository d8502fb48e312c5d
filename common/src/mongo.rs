use {
	mongodb::{Client, bson::doc, options::ClientOptions},
	tracing::info,
};

/// 初始化 MongoDB 客户端并 ping admin 库确认可用
pub async fn init_mongo_client(uri: &str, app_name: &str, max_pool_size: u32) -> anyhow::Result<Client> {
	let mut options = ClientOptions::parse(uri).await?;
	options.app_name = Some(app_name.to_string());
	options.max_pool_size = Some(max_pool_size);

	let client = Client::with_options(options)?;
	client.database("admin").run_command(doc! { "ping": 1 }).await?;

	info!("MongoDB client initialized (app: {}, max_pool_size: {})", app_name, max_pool_size);
	Ok(client)
}

use {
	crate::config::MqConfig,
	common::{common_env::CommonEnv, mq::MqProducer, redis_pool},
	tracing::info,
};

/// 初始化消息队列生产者
pub async fn init(env: &CommonEnv, config: &MqConfig) -> anyhow::Result<MqProducer> {
	let pool = redis_pool::create_pool(&env.mq_redis_host, env.mq_redis_password.as_deref(), config.db, config.pool_size)?;
	let producer = MqProducer::new(pool, config.stream_prefix.clone(), config.stream_maxlen);
	producer.ping().await?;
	info!("MQ Redis pool initialized (host: {}, db: {}, prefix: {})", env.mq_redis_host, config.db, config.stream_prefix);
	Ok(producer)
}

use {
	crate::{consts::MQ_MSG_KEY, redis_pool},
	deadpool_redis::Pool,
	redis::{AsyncCommands, streams::StreamMaxlen},
	serde::Serialize,
	thiserror::Error,
	tracing::debug,
};

#[derive(Debug, Error)]
pub enum MqError {
	#[error("Invalid topic: {0:?}")]
	InvalidTopic(String),

	#[error("Serialize payload error: {0}")]
	Serialize(#[from] serde_json::Error),

	#[error("Redis error: {0}")]
	Redis(#[from] redis::RedisError),

	#[error("{0}")]
	Pool(String),
}

/// 基于 Redis Stream 的消息生产者
///
/// 每个 topic 对应一个 stream `{prefix}:{topic}` 消息只有一个 `payload` 字段 内容为 json
#[derive(Clone)]
pub struct MqProducer {
	pool: Pool,
	prefix: String,
	maxlen: usize,
}

impl MqProducer {
	pub fn new(pool: Pool, prefix: impl Into<String>, maxlen: usize) -> Self {
		Self { pool, prefix: prefix.into(), maxlen }
	}

	/// topic 对应的 stream 名
	pub fn stream_name(&self, topic: &str) -> Result<String, MqError> {
		if topic.is_empty() || topic.contains(char::is_whitespace) {
			return Err(MqError::InvalidTopic(topic.to_string()));
		}
		Ok(format!("{}:{}", self.prefix, topic))
	}

	/// 发布一条消息 返回 stream entry id
	pub async fn publish<T: Serialize>(&self, topic: &str, message: &T) -> Result<String, MqError> {
		let stream = self.stream_name(topic)?;
		let payload = serde_json::to_string(message)?;
		let mut conn = redis_pool::get_connection(&self.pool, "MQ").await.map_err(|e| MqError::Pool(e.to_string()))?;
		let id: String = conn.xadd_maxlen(&stream, StreamMaxlen::Approx(self.maxlen), "*", &[(MQ_MSG_KEY, payload.as_str())]).await?;
		debug!("Published message to {} ({})", stream, id);
		Ok(id)
	}

	pub async fn ping(&self) -> anyhow::Result<()> {
		redis_pool::ping(&self.pool, "MQ").await
	}

	/// 关闭连接池 已借出的连接归还后释放
	pub fn close(&self) {
		self.pool.close();
	}
}

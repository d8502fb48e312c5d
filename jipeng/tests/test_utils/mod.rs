#![allow(dead_code)]

use {
	axum::{Router, routing::get},
	common::graceful::ShutdownSignal,
	jipeng::{
		lifecycle::{Lifecycle, LifecycleError},
		server::ServerSettings,
	},
	std::time::Duration,
	tokio::sync::mpsc,
};

/// 慢接口的处理时长
pub const SLOW_HANDLER_MILLIS: u64 = 300;
/// 足够让强制断开生效的超长处理时长
pub const STUCK_HANDLER_SECS: u64 = 30;

/// 测试用监听参数（随机端口 超时放短）
pub fn test_settings(addr: &str) -> ServerSettings {
	ServerSettings {
		addr: addr.to_string(),
		read_timeout: Duration::from_secs(10),
		read_header_timeout: Duration::from_secs(2),
		write_timeout: Duration::from_secs(10),
		idle_timeout: Duration::from_secs(2),
		max_header_bytes: 8192,
	}
}

/// 不依赖外部服务的路由
pub fn test_router() -> Router {
	Router::new()
		.route("/ping", get(|| async { "pong" }))
		.route(
			"/slow",
			get(|| async {
				tokio::time::sleep(Duration::from_millis(SLOW_HANDLER_MILLIS)).await;
				"done"
			}),
		)
		.route(
			"/stuck",
			get(|| async {
				tokio::time::sleep(Duration::from_secs(STUCK_HANDLER_SECS)).await;
				"never"
			}),
		)
}

/// 在随机端口上启动
pub async fn start_lifecycle(shutdown_timeout: Duration) -> Result<Lifecycle, LifecycleError> {
	Lifecycle::start(test_settings("127.0.0.1:0"), test_router(), shutdown_timeout).await
}

/// 和真实信号通道一样容量为 1
pub fn signal_channel() -> (mpsc::Sender<ShutdownSignal>, mpsc::Receiver<ShutdownSignal>) {
	mpsc::channel(1)
}

/// 不走系统代理的 HTTP 客户端
pub fn http_client() -> reqwest::Client {
	reqwest::Client::builder().no_proxy().timeout(Duration::from_secs(10)).build().expect("build reqwest client")
}

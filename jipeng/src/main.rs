use {
	axum::Router,
	jipeng::{
		config::get_config,
		init,
		lifecycle::{Lifecycle, ShutdownOutcome},
		router::{self, AppState},
	},
	std::fmt::Display,
	tracing::{info, warn},
};

#[tokio::main]
async fn main() {
	let resources = init::init_all().await.unwrap_or_else(|e| fatal("init", e));
	let config = get_config().unwrap_or_else(|e| fatal("config", e));

	let settings = config.server.settings();
	let engine = router::inject(Router::new(), AppState::new(&resources), settings.request_timeout());

	// 先注册信号 再启动监听
	let quit = common::graceful::notify_shutdown_signals().unwrap_or_else(|e| fatal("signal", e));
	let lifecycle = Lifecycle::start(settings, engine, config.server.shutdown_timeout()).await.unwrap_or_else(|e| fatal("start", e));

	match lifecycle.run(quit).await {
		Ok(ShutdownOutcome::Graceful) => info!("All connections drained"),
		Ok(ShutdownOutcome::ForcedClose) => warn!("Remaining connections were closed after the shutdown deadline"),
		Err(e) => fatal("lifecycle", e),
	}

	resources.close().await;
	info!("jipeng stopped");
	common::logging::flush_logging();
}

/// 记录错误后立即退出 不做任何清理
fn fatal(stage: &str, err: impl Display) -> ! {
	common::logging::report_fatal(&format!("[{}] {:#}", stage, err));
	common::logging::flush_logging();
	std::process::exit(1);
}

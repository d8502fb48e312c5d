//! 进程生命周期：启动监听 → 等待停机信号 → 限时优雅停机
//!
//! ```text
//! NotStarted ──start──▶ Serving ──signal──▶ ShuttingDown ──▶ Stopped
//!      │                   │                     │
//!      └── bind 失败 ───────┴── 监听出错 ───────────┴── 停机出错 ──▶ FatalAborted
//! ```
//!
//! 停机超时不算致命：剩余连接被强制断开，结果为 `ShutdownOutcome::ForcedClose`。

use {
	crate::server::{HttpServer, ServerError, ServerSettings},
	axum::Router,
	common::graceful::ShutdownSignal,
	std::{net::SocketAddr, sync::Arc, time::Duration},
	thiserror::Error,
	tokio::{
		sync::{mpsc, watch},
		task::{JoinError, JoinHandle},
	},
	tracing::{info, warn},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
	NotStarted,
	Serving,
	ShuttingDown,
	Stopped,
	FatalAborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
	/// 所有在途请求在期限内完成
	Graceful,
	/// 期限已到 剩余连接被强制断开
	ForcedClose,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
	#[error("listen: {0}")]
	Listener(#[from] ServerError),

	#[error("listen: listener stopped before any shutdown signal")]
	ListenerStopped,

	#[error("listen: listener task failed: {0}")]
	ListenerTask(#[source] JoinError),

	#[error("Server Shutdown: {0}")]
	Shutdown(#[source] ServerError),

	#[error("Server Shutdown: listener task failed: {0}")]
	ShutdownTask(#[source] JoinError),

	#[error("signal channel closed before any shutdown signal")]
	SignalChannelClosed,
}

/// 等待阶段的结果
#[derive(Debug)]
pub enum WaitOutcome {
	Signal(ShutdownSignal),
	/// 还没收到信号监听任务就结束了
	ListenerExited(Result<Result<(), ServerError>, JoinError>),
	SignalChannelClosed,
}

/// 阻塞直到收到一个停机信号 期间监听任务提前结束同样会唤醒
///
/// 信号通道只读这一次，之后到达的信号留在通道里不会再被处理。
pub async fn wait(quit: &mut mpsc::Receiver<ShutdownSignal>, serve_task: &mut JoinHandle<Result<(), ServerError>>) -> WaitOutcome {
	tokio::select! {
		received = quit.recv() => match received {
			Some(signal) => WaitOutcome::Signal(signal),
			None => WaitOutcome::SignalChannelClosed,
		},
		joined = serve_task => WaitOutcome::ListenerExited(joined),
	}
}

/// 生命周期控制器 持有服务句柄和监听任务
pub struct Lifecycle {
	server: Arc<HttpServer>,
	serve_task: JoinHandle<Result<(), ServerError>>,
	shutdown_timeout: Duration,
	state: watch::Sender<LifecycleState>,
}

impl Lifecycle {
	/// 绑定端口并在后台任务里启动监听 返回时已处于 `Serving`
	pub async fn start(settings: ServerSettings, router: Router, shutdown_timeout: Duration) -> Result<Self, LifecycleError> {
		let (state, _) = watch::channel(LifecycleState::NotStarted);

		let server = match HttpServer::bind(settings, router).await {
			Ok(server) => Arc::new(server),
			Err(e) => {
				state.send_replace(LifecycleState::FatalAborted);
				return Err(LifecycleError::Listener(e));
			}
		};
		info!(
			"🚀 Server listening on {} (request timeout {:?}, header timeout {:?}, max header {} bytes)",
			server.local_addr(),
			server.settings().request_timeout(),
			server.settings().header_timeout(),
			server.settings().max_header_bytes
		);

		let serving = server.clone();
		let serve_task = tokio::spawn(async move { serving.serve().await });
		state.send_replace(LifecycleState::Serving);

		Ok(Self { server, serve_task, shutdown_timeout, state })
	}

	pub fn local_addr(&self) -> SocketAddr {
		self.server.local_addr()
	}

	pub fn state(&self) -> LifecycleState {
		*self.state.borrow()
	}

	/// 订阅状态变化
	pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
		self.state.subscribe()
	}

	/// 等待信号并停机
	pub async fn run(self, mut quit: mpsc::Receiver<ShutdownSignal>) -> Result<ShutdownOutcome, LifecycleError> {
		let Self { server, mut serve_task, shutdown_timeout, state } = self;

		match wait(&mut quit, &mut serve_task).await {
			WaitOutcome::Signal(signal) => info!("Received {}", signal),
			WaitOutcome::ListenerExited(joined) => {
				state.send_replace(LifecycleState::FatalAborted);
				let err = match joined {
					Ok(Ok(())) => LifecycleError::ListenerStopped,
					Ok(Err(e)) => LifecycleError::Listener(e),
					Err(e) => LifecycleError::ListenerTask(e),
				};
				return Err(err);
			}
			WaitOutcome::SignalChannelClosed => {
				// 没有信号源就再也不会停机 按致命处理
				state.send_replace(LifecycleState::FatalAborted);
				server.force_close();
				serve_task.abort();
				return Err(LifecycleError::SignalChannelClosed);
			}
		}
		drop(quit);

		state.send_replace(LifecycleState::ShuttingDown);
		info!("Shutdown Server ...");

		match shutdown(&server, serve_task, shutdown_timeout).await {
			Ok(outcome) => {
				state.send_replace(LifecycleState::Stopped);
				info!("Server exiting");
				Ok(outcome)
			}
			Err(e) => {
				state.send_replace(LifecycleState::FatalAborted);
				Err(e)
			}
		}
	}
}

/// 停止监听并在期限内等待在途请求完成 超时则强制断开
///
/// 期限只是一个 `timeout` future，不管走哪个分支返回都会随之释放。
async fn shutdown(server: &HttpServer, mut serve_task: JoinHandle<Result<(), ServerError>>, deadline: Duration) -> Result<ShutdownOutcome, LifecycleError> {
	server.shutdown();

	match tokio::time::timeout(deadline, &mut serve_task).await {
		Ok(joined) => match joined {
			Ok(Ok(())) => Ok(ShutdownOutcome::Graceful),
			Ok(Err(e)) => Err(LifecycleError::Shutdown(e)),
			Err(e) => Err(LifecycleError::ShutdownTask(e)),
		},
		Err(_) => {
			warn!("timeout of {} seconds.", deadline.as_secs_f64());
			server.force_close();
			let grace = Duration::from_millis(crate::consts::FORCE_CLOSE_GRACE_MILLIS);
			match tokio::time::timeout(grace, &mut serve_task).await {
				Ok(Ok(Err(e))) => Err(LifecycleError::Shutdown(e)),
				Ok(Err(e)) => Err(LifecycleError::ShutdownTask(e)),
				Ok(Ok(Ok(()))) => Ok(ShutdownOutcome::ForcedClose),
				Err(_) => {
					// 强制断开后监听任务仍未退出 直接丢弃
					serve_task.abort();
					Ok(ShutdownOutcome::ForcedClose)
				}
			}
		}
	}
}

use {
	tokio::sync::mpsc::{self, error::TrySendError},
	tracing::{debug, info},
};

/// 触发停机的系统信号 SIGKILL 无法捕获 不在这里处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
	/// SIGINT / ctrl-c
	Interrupt,
	/// SIGTERM 也是 kill 不带参数时的默认信号
	Terminate,
}

impl std::fmt::Display for ShutdownSignal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ShutdownSignal::Interrupt => write!(f, "SIGINT"),
			ShutdownSignal::Terminate => write!(f, "SIGTERM"),
		}
	}
}

/// 注册 SIGINT / SIGTERM 并返回只读一次的信号通道
///
/// 通道容量为 1 主任务还没读走时到达的后续信号直接丢弃 不会重复触发停机。
/// 信号处理器在函数返回前就已注册完成 必须在 tokio runtime 内调用。
pub fn notify_shutdown_signals() -> anyhow::Result<mpsc::Receiver<ShutdownSignal>> {
	let (tx, rx) = mpsc::channel(1);

	#[cfg(unix)]
	{
		use tokio::signal::unix::{SignalKind, signal};
		let mut sigint = signal(SignalKind::interrupt())?;
		let mut sigterm = signal(SignalKind::terminate())?;
		tokio::spawn(async move {
			loop {
				let received = tokio::select! {
					Some(()) = sigint.recv() => ShutdownSignal::Interrupt,
					Some(()) = sigterm.recv() => ShutdownSignal::Terminate,
					else => break,
				};
				forward_signal(&tx, received);
			}
		});
	}
	#[cfg(not(unix))]
	{
		tokio::spawn(async move {
			while tokio::signal::ctrl_c().await.is_ok() {
				forward_signal(&tx, ShutdownSignal::Interrupt);
			}
		});
	}

	Ok(rx)
}

// 接收方关闭后依旧持有信号处理器 吞掉后续信号 避免第二次 ctrl-c 走默认处理直接杀进程
fn forward_signal(tx: &mpsc::Sender<ShutdownSignal>, received: ShutdownSignal) {
	match tx.try_send(received) {
		Ok(()) => info!("Received {}, starting graceful shutdown...", received),
		Err(TrySendError::Full(_)) => debug!("Received {} while a shutdown signal is already pending, ignored", received),
		Err(TrySendError::Closed(_)) => debug!("Received {} after shutdown started, ignored", received),
	}
}

use {
	crate::consts::ACCEPT_RETRY_DELAY_MILLIS,
	axum::Router,
	hyper::server::conn::http1,
	hyper_util::{
		rt::{TokioIo, TokioTimer},
		service::TowerToHyperService,
	},
	std::{
		io,
		net::SocketAddr,
		sync::{Mutex, PoisonError},
		time::Duration,
	},
	thiserror::Error,
	tokio::{
		net::{TcpListener, TcpStream},
		sync::watch,
		task::JoinSet,
	},
	tracing::{debug, error, info, warn},
};

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("failed to bind {addr}: {source}")]
	Bind {
		addr: String,
		#[source]
		source: io::Error,
	},

	#[error("failed to accept connection: {0}")]
	Accept(#[source] io::Error),

	#[error("server is already serving")]
	AlreadyServing,
}

/// 监听和单连接参数
#[derive(Debug, Clone)]
pub struct ServerSettings {
	pub addr: String,
	pub read_timeout: Duration,
	pub read_header_timeout: Duration,
	pub write_timeout: Duration,
	pub idle_timeout: Duration,
	pub max_header_bytes: usize,
}

impl ServerSettings {
	/// 单个请求从读到写完的总时长上限
	pub fn request_timeout(&self) -> Duration {
		self.read_timeout.max(self.write_timeout)
	}

	/// 等待请求头的时长上限 keep-alive 连接等下一个请求头也受它约束 所以取读头和空闲的较小值
	pub fn header_timeout(&self) -> Duration {
		self.read_header_timeout.min(self.idle_timeout)
	}

	fn http1_builder(&self) -> http1::Builder {
		let mut builder = http1::Builder::new();
		builder.timer(TokioTimer::new()).header_read_timeout(self.header_timeout()).max_buf_size(self.max_header_bytes).keep_alive(true);
		builder
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Running,
	/// 不再 accept 在途连接处理完当前请求后关闭
	Draining,
	/// 直接断开所有剩余连接
	Forced,
}

/// HTTP 服务句柄
///
/// `bind` 同步完成监听 之后 `serve` 在独立任务里跑 accept 循环，
/// 控制任务通过 `shutdown` / `force_close` 通知它停止。两边只共享一个 watch 通道。
pub struct HttpServer {
	settings: ServerSettings,
	local_addr: SocketAddr,
	listener: Mutex<Option<TcpListener>>,
	router: Router,
	phase: watch::Sender<Phase>,
}

impl HttpServer {
	/// 绑定监听端口 失败直接返回 不会进入 serve
	pub async fn bind(settings: ServerSettings, router: Router) -> Result<Self, ServerError> {
		let listener = TcpListener::bind(&settings.addr).await.map_err(|source| ServerError::Bind { addr: settings.addr.clone(), source })?;
		let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { addr: settings.addr.clone(), source })?;
		let (phase, _) = watch::channel(Phase::Running);
		Ok(Self { settings, local_addr, listener: Mutex::new(Some(listener)), router, phase })
	}

	pub fn local_addr(&self) -> SocketAddr {
		self.local_addr
	}

	pub fn settings(&self) -> &ServerSettings {
		&self.settings
	}

	/// accept 循环
	///
	/// 被 `shutdown` 正常关闭时返回 `Ok(())`，其余任何返回都是监听出错。
	pub async fn serve(&self) -> Result<(), ServerError> {
		let listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner).take().ok_or(ServerError::AlreadyServing)?;
		let builder = self.settings.http1_builder();
		let mut phase = self.phase.subscribe();
		let mut connections = JoinSet::new();

		info!("HTTP server serving on {}", self.local_addr);

		if *phase.borrow_and_update() == Phase::Running {
			loop {
				tokio::select! {
					accepted = listener.accept() => match accepted {
						Ok((stream, peer)) => {
							connections.spawn(serve_connection(builder.clone(), stream, peer, self.router.clone(), self.phase.subscribe()));
						}
						Err(e) if is_connection_error(&e) => {
							debug!("Accept error on a single connection: {}", e);
						}
						Err(e) if is_resource_error(&e) => {
							// fd 或内存暂时耗尽 等已有连接释放后重试 等待期间仍响应停机
							let delay = Duration::from_millis(ACCEPT_RETRY_DELAY_MILLIS);
							warn!("Accept failed, retrying in {:?}: {}", delay, e);
							tokio::select! {
								_ = tokio::time::sleep(delay) => {}
								_ = phase.changed() => break,
							}
						}
						Err(e) => {
							error!("Accept failed: {}", e);
							connections.abort_all();
							while connections.join_next().await.is_some() {}
							return Err(ServerError::Accept(e));
						}
					},
					_ = phase.changed() => break,
					// 回收已结束的连接任务
					Some(_) = connections.join_next(), if !connections.is_empty() => {}
				}
			}
		}

		// 先关掉监听 新连接直接被拒绝
		drop(listener);
		info!("HTTP server stopped accepting, {} connection(s) in flight", connections.len());

		loop {
			tokio::select! {
				next = connections.join_next() => {
					if next.is_none() {
						break;
					}
				}
				// Ref 持有读锁 不能带进分支里的 await
				_ = async { phase.wait_for(|p| *p == Phase::Forced).await.is_ok() } => {
					warn!("Force closing {} remaining connection(s)", connections.len());
					connections.abort_all();
					while connections.join_next().await.is_some() {}
					break;
				}
			}
		}

		info!("HTTP server closed");
		Ok(())
	}

	/// 停止 accept 并让在途连接处理完当前请求后关闭 不等待完成
	pub fn shutdown(&self) {
		self.phase.send_if_modified(|phase| {
			if *phase == Phase::Running {
				*phase = Phase::Draining;
				true
			} else {
				false
			}
		});
	}

	/// 断开所有剩余连接
	pub fn force_close(&self) {
		self.phase.send_replace(Phase::Forced);
	}
}

async fn serve_connection(builder: http1::Builder, stream: TcpStream, peer: SocketAddr, router: Router, mut phase: watch::Receiver<Phase>) {
	let service = TowerToHyperService::new(router);
	let conn = builder.serve_connection(TokioIo::new(stream), service);
	tokio::pin!(conn);

	// 连接在停机开始之后才被 accept 时 处理完这一个请求就关闭
	if *phase.borrow_and_update() != Phase::Running {
		conn.as_mut().graceful_shutdown();
	}

	loop {
		tokio::select! {
			result = conn.as_mut() => {
				if let Err(e) = result {
					debug!("Connection {} closed with error: {}", peer, e);
				}
				break;
			}
			changed = phase.changed() => {
				if changed.is_err() {
					// 服务句柄已释放 不会再有停机通知
					if let Err(e) = conn.as_mut().await {
						debug!("Connection {} closed with error: {}", peer, e);
					}
					break;
				}
				conn.as_mut().graceful_shutdown();
			}
		}
	}
}

/// 只影响单个连接的 accept 错误 不需要停掉整个监听
fn is_connection_error(e: &io::Error) -> bool {
	matches!(e.kind(), io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset)
}

/// 资源暂时耗尽导致的 accept 错误 监听本身没有问题
fn is_resource_error(e: &io::Error) -> bool {
	#[cfg(unix)]
	{
		if let Some(code) = e.raw_os_error() {
			return matches!(code, libc::EMFILE | libc::ENFILE | libc::ENOBUFS | libc::ENOMEM);
		}
	}
	e.kind() == io::ErrorKind::OutOfMemory
}

//! 生命周期测试：启动 → 等信号 → 限时停机
//!
//! 全部绑定 127.0.0.1 随机端口 不依赖 Redis / MySQL / MongoDB

mod test_utils;

use {
	common::graceful::ShutdownSignal,
	jipeng::{
		lifecycle::{self, Lifecycle, LifecycleError, LifecycleState, ShutdownOutcome, WaitOutcome},
		server::ServerError,
	},
	std::{
		io,
		time::{Duration, Instant},
	},
	test_utils::*,
	tokio::sync::mpsc::error::TrySendError,
};

// ============================================================================
// 正常启停
// ============================================================================

#[tokio::test]
async fn test_start_enters_serving_and_answers_requests() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	assert_eq!(lifecycle.state(), LifecycleState::Serving);

	let url = format!("http://{}/ping", lifecycle.local_addr());
	let resp = http_client().get(&url).send().await.unwrap();
	assert_eq!(resp.status(), 200);
	assert_eq!(resp.text().await.unwrap(), "pong");

	let (tx, rx) = signal_channel();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	assert_eq!(lifecycle.run(rx).await.unwrap(), ShutdownOutcome::Graceful);
}

#[tokio::test]
async fn test_interrupt_without_inflight_requests_stops_quickly() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let state = lifecycle.subscribe();
	let (tx, rx) = signal_channel();

	let started = Instant::now();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	let outcome = lifecycle.run(rx).await.unwrap();

	assert_eq!(outcome, ShutdownOutcome::Graceful);
	assert!(started.elapsed() < Duration::from_secs(1), "shutdown took {:?}", started.elapsed());
	assert_eq!(*state.borrow(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_terminate_takes_same_path_as_interrupt() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let state = lifecycle.subscribe();
	let (tx, rx) = signal_channel();

	tx.send(ShutdownSignal::Terminate).await.unwrap();
	assert_eq!(lifecycle.run(rx).await.unwrap(), ShutdownOutcome::Graceful);
	assert_eq!(*state.borrow(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_listener_closed_after_shutdown() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let addr = lifecycle.local_addr();
	let (tx, rx) = signal_channel();

	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	lifecycle.run(rx).await.unwrap();

	assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_repeated_start_stop_cycles_release_the_port() {
	let first = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let addr = first.local_addr().to_string();
	let (tx, rx) = signal_channel();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	first.run(rx).await.unwrap();

	// 同一个端口反复启停 句柄和期限都随 run 结束释放
	for _ in 0..3 {
		let lifecycle = Lifecycle::start(test_settings(&addr), test_router(), Duration::from_secs(5)).await.unwrap();
		let resp = http_client().get(format!("http://{}/ping", addr)).send().await.unwrap();
		assert_eq!(resp.status(), 200);

		let (tx, rx) = signal_channel();
		tx.send(ShutdownSignal::Interrupt).await.unwrap();
		assert_eq!(lifecycle.run(rx).await.unwrap(), ShutdownOutcome::Graceful);
	}
}

// ============================================================================
// 在途请求和停机期限
// ============================================================================

#[tokio::test]
async fn test_inflight_request_completes_before_exit() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let url = format!("http://{}/slow", lifecycle.local_addr());
	let request = tokio::spawn(async move { http_client().get(&url).send().await });

	// 等请求进入 handler
	tokio::time::sleep(Duration::from_millis(SLOW_HANDLER_MILLIS / 3)).await;

	let (tx, rx) = signal_channel();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	let outcome = lifecycle.run(rx).await.unwrap();
	assert_eq!(outcome, ShutdownOutcome::Graceful);

	let resp = request.await.unwrap().unwrap();
	assert_eq!(resp.status(), 200);
	assert_eq!(resp.text().await.unwrap(), "done");
}

#[tokio::test]
async fn test_deadline_forces_remaining_connections_closed() {
	let deadline = Duration::from_millis(200);
	let lifecycle = start_lifecycle(deadline).await.unwrap();
	let state = lifecycle.subscribe();
	let url = format!("http://{}/stuck", lifecycle.local_addr());
	let request = tokio::spawn(async move { http_client().get(&url).send().await });

	tokio::time::sleep(Duration::from_millis(100)).await;

	let (tx, rx) = signal_channel();
	let started = Instant::now();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	let outcome = lifecycle.run(rx).await.unwrap();

	assert_eq!(outcome, ShutdownOutcome::ForcedClose);
	assert!(started.elapsed() >= deadline);
	assert!(started.elapsed() < Duration::from_secs(3), "forced close took {:?}", started.elapsed());
	assert_eq!(*state.borrow(), LifecycleState::Stopped);

	// 连接被断开 客户端拿不到响应
	assert!(request.await.unwrap().is_err());
}

// ============================================================================
// 信号通道
// ============================================================================

#[tokio::test]
async fn test_second_signal_does_not_trigger_second_shutdown() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let (tx, rx) = signal_channel();

	tx.try_send(ShutdownSignal::Interrupt).unwrap();
	// 容量为 1 第二个信号被丢弃
	assert!(matches!(tx.try_send(ShutdownSignal::Interrupt), Err(TrySendError::Full(_))));

	assert_eq!(lifecycle.run(rx).await.unwrap(), ShutdownOutcome::Graceful);

	// 停机后通道已关闭 后续信号只会被丢弃
	assert!(matches!(tx.try_send(ShutdownSignal::Terminate), Err(TrySendError::Closed(_))));
}

#[tokio::test]
async fn test_closed_signal_channel_is_fatal() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let state = lifecycle.subscribe();
	let (tx, rx) = signal_channel();
	drop(tx);

	let err = lifecycle.run(rx).await.unwrap_err();
	assert!(matches!(err, LifecycleError::SignalChannelClosed));
	assert_eq!(*state.borrow(), LifecycleState::FatalAborted);
}

// ============================================================================
// 致命错误
// ============================================================================

#[tokio::test]
async fn test_port_already_bound_fails_before_waiting() {
	let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
	let addr = occupied.local_addr().unwrap().to_string();

	let result = Lifecycle::start(test_settings(&addr), test_router(), Duration::from_secs(5)).await;
	match result {
		Err(LifecycleError::Listener(ServerError::Bind { addr: failed, .. })) => assert_eq!(failed, addr),
		Err(e) => panic!("unexpected error: {}", e),
		Ok(_) => panic!("bind on an occupied port should fail"),
	}
}

#[tokio::test]
async fn test_listener_failure_ends_wait_without_signal() {
	let (_tx, mut rx) = signal_channel();
	let mut serve_task = tokio::spawn(async { Err(ServerError::Accept(io::Error::other("accept exploded"))) });

	let outcome = tokio::time::timeout(Duration::from_secs(1), lifecycle::wait(&mut rx, &mut serve_task)).await.expect("wait should not block on a dead listener");
	match outcome {
		WaitOutcome::ListenerExited(Ok(Err(ServerError::Accept(e)))) => assert_eq!(e.to_string(), "accept exploded"),
		other => panic!("unexpected wait outcome: {:?}", other),
	}
}

#[tokio::test]
async fn test_wait_returns_the_first_signal() {
	let (tx, mut rx) = signal_channel();
	let mut serve_task = tokio::spawn(std::future::pending::<Result<(), ServerError>>());

	tx.send(ShutdownSignal::Terminate).await.unwrap();
	match lifecycle::wait(&mut rx, &mut serve_task).await {
		WaitOutcome::Signal(signal) => assert_eq!(signal, ShutdownSignal::Terminate),
		other => panic!("unexpected wait outcome: {:?}", other),
	}
	serve_task.abort();
}

// ============================================================================
// 单连接限制
// ============================================================================

#[tokio::test]
async fn test_oversized_header_is_rejected() {
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let url = format!("http://{}/ping", lifecycle.local_addr());

	let result = http_client().get(&url).header("x-large", "a".repeat(16 * 1024)).send().await;
	match result {
		Ok(resp) => assert_eq!(resp.status(), 431),
		// 服务端回 431 后直接关连接 客户端也可能只看到连接错误
		Err(e) => assert!(!e.is_timeout(), "unexpected timeout: {}", e),
	}

	let (tx, rx) = signal_channel();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	lifecycle.run(rx).await.unwrap();
}

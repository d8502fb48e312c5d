//! fd 耗尽时的 accept 行为
//!
//! 会调低整个测试进程的 fd 上限 所以单独放一个测试二进制

#![cfg(unix)]

mod test_utils;

use {
	common::graceful::ShutdownSignal,
	jipeng::lifecycle::{LifecycleState, ShutdownOutcome},
	std::time::Duration,
	test_utils::*,
	tokio::net::TcpStream,
};

/// 测试进程的 fd 软上限
const FD_SOFT_LIMIT: libc::rlim_t = 128;

fn lower_fd_limit(soft: libc::rlim_t) {
	let mut limit = libc::rlimit { rlim_cur: 0, rlim_max: 0 };
	assert_eq!(unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) }, 0);
	limit.rlim_cur = soft.min(limit.rlim_max);
	assert_eq!(unsafe { libc::setrlimit(libc::RLIMIT_NOFILE, &limit) }, 0);
}

#[tokio::test]
async fn test_listener_survives_fd_exhaustion() {
	let client = http_client();
	let lifecycle = start_lifecycle(Duration::from_secs(5)).await.unwrap();
	let addr = lifecycle.local_addr();

	lower_fd_limit(FD_SOFT_LIMIT);

	// 客户端和服务端连接共用同一个进程的 fd 一直连到建不了 socket 为止
	let mut held = Vec::new();
	for _ in 0..FD_SOFT_LIMIT * 2 {
		match TcpStream::connect(addr).await {
			Ok(stream) => held.push(stream),
			Err(_) => break,
		}
	}
	assert!(!held.is_empty());
	assert!(held.len() < FD_SOFT_LIMIT as usize, "fd limit was never reached ({} connections)", held.len());

	// 让 accept 在 fd 耗尽的状态下跑一会
	tokio::time::sleep(Duration::from_millis(300)).await;
	drop(held);

	// 等过一次重试间隔
	tokio::time::sleep(Duration::from_millis(1500)).await;

	let url = format!("http://{}/ping", addr);
	let resp = client.get(&url).send().await.unwrap();
	assert_eq!(resp.status(), 200);
	assert_eq!(resp.text().await.unwrap(), "pong");
	assert_eq!(lifecycle.state(), LifecycleState::Serving);

	let (tx, rx) = signal_channel();
	let mut state = lifecycle.subscribe();
	tx.send(ShutdownSignal::Interrupt).await.unwrap();
	assert_eq!(lifecycle.run(rx).await.unwrap(), ShutdownOutcome::Graceful);
	assert_eq!(*state.borrow_and_update(), LifecycleState::Stopped);
}

//! 致命错误输出位置 会安装全局 subscriber 所以单独一个测试二进制

use common::logging::{FatalSink, init_console_logging, report_fatal};

#[test]
fn test_fatal_goes_to_stderr_until_logging_is_initialized() {
	assert_eq!(report_fatal("[config] missing deploy/jipeng/dev.toml"), FatalSink::Stderr);

	init_console_logging("info").unwrap();
	assert_eq!(report_fatal("[start] failed to bind 127.0.0.1:7777"), FatalSink::Log);
}

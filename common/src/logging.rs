use {
	serde::{Deserialize, Serialize},
	std::{io, path::Path, sync::Mutex},
	tracing::{error, info},
	tracing_appender::{
		non_blocking::WorkerGuard,
		rolling::{RollingFileAppender, Rotation},
	},
};

// 保持 guard 存活，确保日志缓冲区被刷新到文件
// 进程被 fatal 路径直接退出前需要主动 drop 所以用 Mutex<Option> 而不是 OnceCell
static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// 日志配置结构体（用于从 TOML 配置文件反序列化）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
	pub level: String,
	pub file: Option<String>,
	pub console: bool,
	pub rotation_max_files: usize,
}

impl LoggingConfig {
	/// 检查配置是否有效
	pub fn check(&self) -> anyhow::Result<()> {
		if self.level.is_empty() {
			return Err(anyhow::anyhow!("Logging level is empty"));
		}
		if self.file.is_none() && !self.console {
			return Err(anyhow::anyhow!("Logging file and console are both empty"));
		}
		if self.file.is_some() && self.rotation_max_files == 0 {
			return Err(anyhow::anyhow!("Logging rotation_max_files must be greater than 0"));
		}
		Ok(())
	}
}

/// 终端和文件二选一
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
	if config.console {
		init_console_logging(&config.level)
	} else if let Some(file) = config.file.as_ref() {
		init_file_logging(&config.level, file, config.rotation_max_files)
	} else {
		Err(anyhow::anyhow!("Logging file and console are both empty"))
	}
}

pub fn init_console_logging(level: &str) -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(level)
		.with_writer(io::stdout)
		.with_file(true)
		.with_target(true)
		.with_line_number(true)
		.with_ansi(false)
		.try_init()
		.map_err(|e| anyhow::anyhow!("Failed to init console logging: {}", e))?;

	info!("Console logging system initialized");
	Ok(())
}

pub fn init_file_logging(level: &str, file_path: &str, rotation_max_files: usize) -> anyhow::Result<()> {
	let path = Path::new(file_path);
	let parent = path.parent().ok_or_else(|| anyhow::anyhow!("Failed to get parent directory of {}", file_path))?;
	if !parent.as_os_str().is_empty() {
		std::fs::create_dir_all(parent)?;
	}
	let file_name = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| anyhow::anyhow!("Invalid log file name: {}", file_path))?;
	let file_appender = RollingFileAppender::builder().rotation(Rotation::DAILY).max_log_files(rotation_max_files).filename_prefix(file_name).build(parent)?;
	let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
	tracing_subscriber::fmt()
		.with_env_filter(level)
		.with_writer(non_blocking)
		.with_file(true)
		.with_target(true)
		.with_line_number(true)
		.with_ansi(false)
		.try_init()
		.map_err(|e| anyhow::anyhow!("Failed to init file logging: {}", e))?;
	// 将 guard 存储在静态变量中，确保它在程序运行期间一直存活
	if let Ok(mut slot) = LOG_GUARD.lock() {
		*slot = Some(guard);
	}

	info!("File logging system initialized");
	Ok(())
}

/// 刷新并关闭文件日志的后台写线程 在 process::exit 之前调用
pub fn flush_logging() {
	if let Ok(mut slot) = LOG_GUARD.lock() {
		slot.take();
	}
}

/// 致命错误最终写到了哪里
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalSink {
	Log,
	Stderr,
}

/// 输出致命错误 日志已初始化就只写日志 否则 (加载配置阶段) 写 stderr
pub fn report_fatal(message: &str) -> FatalSink {
	if tracing::dispatcher::has_been_set() {
		error!("{}", message);
		FatalSink::Log
	} else {
		eprintln!("{}", message);
		FatalSink::Stderr
	}
}

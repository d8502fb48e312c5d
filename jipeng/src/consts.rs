/// HTTP 服务默认监听端口
pub const DEFAULT_PORT: u16 = 7777;

/// 单连接读 / 读头 / 写 / 空闲超时（秒）
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_READ_HEADER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 10;

/// 请求头最大字节数 1 MiB
pub const DEFAULT_MAX_HEADER_BYTES: usize = 1 << 20;
/// hyper 要求读缓冲不小于 8 KiB
pub const MIN_MAX_HEADER_BYTES: usize = 8192;
/// accept 因 fd / 内存耗尽失败后的重试间隔（毫秒）
pub const ACCEPT_RETRY_DELAY_MILLIS: u64 = 1000;

/// 收到信号后等待在途请求完成的最长时间（秒）
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;
/// 超时强制断开连接后 等待监听任务退出的最长时间（毫秒）
pub const FORCE_CLOSE_GRACE_MILLIS: u64 = 1000;

/// MongoDB 连接上报的 app name
pub const MONGO_APP_NAME: &str = "jipeng";

/// 微信接口默认地址和超时
pub const DEFAULT_WX_API_BASE: &str = "https://api.weixin.qq.com";
pub const DEFAULT_WX_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WX_CONNECT_TIMEOUT_SECS: u64 = 5;

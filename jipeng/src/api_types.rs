use serde::{Deserialize, Serialize};

/// API 错误码定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
	/// 成功
	Success = 0,
	/// 依赖服务不可用
	DependencyUnavailable = 2501,
}

impl ApiErrorCode {
	/// 获取错误消息
	pub fn message(&self) -> &'static str {
		match self {
			ApiErrorCode::Success => "success",
			ApiErrorCode::DependencyUnavailable => "Dependency unavailable",
		}
	}

	pub fn as_i32(&self) -> i32 {
		*self as i32
	}
}

/// API 统一响应格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	pub code: i32,
	pub msg: String,
	pub data: Option<T>,
}

impl<T> ApiResponse<T> {
	/// 创建成功响应
	pub fn success(data: T) -> Self {
		Self { code: ApiErrorCode::Success.as_i32(), msg: ApiErrorCode::Success.message().to_string(), data: Some(data) }
	}

	/// 创建失败响应 仍然带上数据便于排查
	pub fn error_with_data(error_code: ApiErrorCode, data: T) -> Self {
		Self { code: error_code.as_i32(), msg: error_code.message().to_string(), data: Some(data) }
	}
}

/// 健康检查结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
	pub cache: bool,
	pub mysql: bool,
	pub mongodb: bool,
	pub timestamp: i64,
}

impl HealthStatus {
	pub fn is_healthy(&self) -> bool {
		self.cache && self.mysql && self.mongodb
	}
}

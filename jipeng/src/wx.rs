use {
	crate::config::WxConfig,
	common::common_env::CommonEnv,
	reqwest::Client,
	std::{sync::Arc, time::Duration},
	tracing::info,
};

/// 微信开放平台凭据和共享的 HTTP 客户端
#[derive(Clone)]
pub struct WxClient {
	inner: Arc<WxInner>,
}

struct WxInner {
	app_id: String,
	app_secret: String,
	api_base: String,
	http: Client,
}

impl std::fmt::Debug for WxClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WxClient").field("app_id", &self.inner.app_id).field("api_base", &self.inner.api_base).finish_non_exhaustive()
	}
}

impl WxClient {
	pub fn new(app_id: &str, app_secret: &str, config: &WxConfig) -> anyhow::Result<Self> {
		if app_id.is_empty() {
			return Err(anyhow::anyhow!("Wx app id is empty"));
		}
		if app_secret.is_empty() {
			return Err(anyhow::anyhow!("Wx app secret is empty"));
		}
		config.check()?;

		let http = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).connect_timeout(Duration::from_secs(config.connect_timeout_secs)).build()?;

		Ok(Self {
			inner: Arc::new(WxInner {
				app_id: app_id.to_string(),
				app_secret: app_secret.to_string(),
				api_base: config.api_base.trim_end_matches('/').to_string(),
				http,
			}),
		})
	}

	pub fn app_id(&self) -> &str {
		&self.inner.app_id
	}

	pub fn app_secret(&self) -> &str {
		&self.inner.app_secret
	}

	pub fn http(&self) -> &Client {
		&self.inner.http
	}

	/// 拼接接口地址 path 需以 / 开头
	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.inner.api_base, path)
	}
}

/// 设置微信客户端 只做凭据校验和客户端构建 启动时不请求微信接口
pub fn set(env: &CommonEnv, config: &WxConfig) -> anyhow::Result<WxClient> {
	let client = WxClient::new(&env.wx_app_id, &env.wx_app_secret, config)?;
	info!("Wx client initialized (app_id: {}, api_base: {})", client.app_id(), config.api_base);
	Ok(client)
}

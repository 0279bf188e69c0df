use super::parsing::{
    env_optional, env_or_default, normalize_base_url, parse_bool, parse_cors_origins,
    parse_environment, parse_u64, parse_usize, validate_vapid_public_key,
};
use super::types::{
    ApiSettings, BackendSettings, ConfigError, CorsSettings, FeedbackSettings, PushSettings,
    RuntimeSettings, SecuritySettings, ServerHost, ServerPort, ServerSettings, Settings,
    TelemetrySettings,
};

const DEFAULT_VAPID_PUBLIC_KEY: &str =
    "BGUjqRdIyVFsVfZA6vGmHWSVksy9Wc5c70jtWep-W2TXdW9SGznYuA8RqErHnFEwSDC2evlXGII_Qir-L3sW-Zc";

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("ADVISING_HOST", "0.0.0.0");
        let port = env_or_default("ADVISING_PORT", "8080");

        let environment = parse_environment(
            env_optional("ADVISING_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config =
            env_optional("ADVISING_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Advising Gateway");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let token_secret = env_optional("SESSION_TOKEN_SECRET");
        let algorithm = env_or_default("SESSION_TOKEN_ALGORITHM", "HS256");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let base_url_raw = env_optional("BACKEND_BASE_URL");
        let base_url_explicit = base_url_raw.is_some();
        let base_url = normalize_base_url(
            base_url_raw.as_deref().unwrap_or("http://localhost:5000"),
        )?;
        let timeout_seconds =
            parse_u64("BACKEND_TIMEOUT_SECONDS", env_or_default("BACKEND_TIMEOUT_SECONDS", "30"))?;
        let connect_timeout_seconds = parse_u64(
            "BACKEND_CONNECT_TIMEOUT_SECONDS",
            env_or_default("BACKEND_CONNECT_TIMEOUT_SECONDS", "10"),
        )?;

        let fetch_concurrency = parse_usize(
            "FEEDBACK_FETCH_CONCURRENCY",
            env_or_default("FEEDBACK_FETCH_CONCURRENCY", "4"),
        )?;

        let vapid_public_key = env_or_default("VAPID_PUBLIC_KEY", DEFAULT_VAPID_PUBLIC_KEY);

        let log_level = env_or_default("ADVISING_LOG_LEVEL", "info");
        let json =
            env_optional("ADVISING_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            security: SecuritySettings { token_secret, algorithm },
            cors: CorsSettings { origins: cors_origins },
            backend: BackendSettings {
                base_url,
                base_url_explicit,
                timeout_seconds,
                connect_timeout_seconds,
            },
            feedback: FeedbackSettings { fetch_concurrency },
            push: PushSettings { vapid_public_key },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn backend(&self) -> &BackendSettings {
        &self.backend
    }

    pub(crate) fn feedback(&self) -> &FeedbackSettings {
        &self.feedback
    }

    pub(crate) fn push(&self) -> &PushSettings {
        &self.push
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feedback.fetch_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "FEEDBACK_FETCH_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "BACKEND_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.security.algorithm != "HS256" {
            return Err(ConfigError::InvalidValue {
                field: "SESSION_TOKEN_ALGORITHM",
                value: self.security.algorithm.clone(),
            });
        }

        validate_vapid_public_key(&self.push.vapid_public_key)?;

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.security.token_secret.is_none() {
            return Err(ConfigError::MissingSecret("SESSION_TOKEN_SECRET"));
        }
        if !self.backend.base_url_explicit {
            return Err(ConfigError::MissingSecret("BACKEND_BASE_URL"));
        }

        Ok(())
    }
}

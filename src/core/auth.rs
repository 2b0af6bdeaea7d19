//! 认证与角色门禁
//!
//! 受保护的路由在调用业务逻辑之前，按声明顺序依次执行 [`Gate`]。
//! 认证和角色检查都通过 trait 注入，拒绝时使用的状态码由 [`GatePolicy`] 决定。

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use std::{collections::HashMap, sync::Arc};
use tracing::warn;

use super::error::CoreError;
use crate::infrastructure::config::{AuthConfig, AuthMode};

/// 已认证的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// 门禁拒绝原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("Unauthorized")]
    MissingCredentials,
    #[error("Unauthorized")]
    InvalidCredentials,
    #[error("Forbidden resource")]
    MissingRole { role: String },
}

/// 认证门禁：从请求头中识别调用方
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, GateRejection>;
}

/// 角色门禁：判断已认证的调用方是否持有指定角色
pub trait RoleGate: Send + Sync {
    fn require(&self, identity: &Identity, role: &str) -> Result<(), GateRejection>;
}

/// 基于静态 Bearer token 表的认证
#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, GateRejection> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GateRejection::MissingCredentials)?;

        self.tokens
            .get(token)
            .cloned()
            .ok_or(GateRejection::InvalidCredentials)
    }
}

/// 放行所有请求的认证，总是返回同一个身份
#[derive(Debug, Clone)]
pub struct AllowAllAuthenticator {
    identity: Identity,
}

impl AllowAllAuthenticator {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl Authenticator for AllowAllAuthenticator {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<Identity, GateRejection> {
        Ok(self.identity.clone())
    }
}

/// 按身份携带的角色列表判断
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleMembershipGate;

impl RoleGate for RoleMembershipGate {
    fn require(&self, identity: &Identity, role: &str) -> Result<(), GateRejection> {
        if identity.has_role(role) {
            Ok(())
        } else {
            Err(GateRejection::MissingRole {
                role: role.to_string(),
            })
        }
    }
}

/// 拒绝原因到状态码的映射
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    pub missing_credentials: StatusCode,
    pub invalid_credentials: StatusCode,
    pub missing_role: StatusCode,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            missing_credentials: StatusCode::UNAUTHORIZED,
            invalid_credentials: StatusCode::UNAUTHORIZED,
            missing_role: StatusCode::FORBIDDEN,
        }
    }
}

impl GatePolicy {
    pub fn from_config(config: &AuthConfig) -> Result<Self, CoreError> {
        let status = |code: u16| {
            StatusCode::from_u16(code)
                .map_err(|_| CoreError::Internal(format!("无效的状态码: {}", code)))
        };

        Ok(Self {
            missing_credentials: status(config.missing_credentials_status)?,
            invalid_credentials: status(config.invalid_credentials_status)?,
            missing_role: status(config.missing_role_status)?,
        })
    }

    pub fn deny(&self, rejection: GateRejection) -> CoreError {
        let status = match rejection {
            GateRejection::MissingCredentials => self.missing_credentials,
            GateRejection::InvalidCredentials => self.invalid_credentials,
            GateRejection::MissingRole { .. } => self.missing_role,
        };

        CoreError::AccessDenied {
            status,
            message: rejection.to_string(),
        }
    }
}

/// 路由声明的单个门禁
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Authenticated,
    Role(&'static str),
}

/// 按顺序执行门禁链
#[derive(Clone)]
pub struct AccessGuard {
    authenticator: Arc<dyn Authenticator>,
    role_gate: Arc<dyn RoleGate>,
    policy: GatePolicy,
}

impl AccessGuard {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        role_gate: Arc<dyn RoleGate>,
        policy: GatePolicy,
    ) -> Self {
        Self {
            authenticator,
            role_gate,
            policy,
        }
    }

    /// 根据配置组装认证方式与策略
    pub fn from_config(config: &AuthConfig) -> Result<Self, CoreError> {
        let authenticator: Arc<dyn Authenticator> = match config.mode {
            AuthMode::Tokens => Arc::new(config.tokens.iter().fold(
                StaticTokenAuthenticator::new(),
                |auth, entry| {
                    auth.with_token(
                        entry.token.clone(),
                        Identity::new(entry.subject.clone(), entry.roles.clone()),
                    )
                },
            )),
            AuthMode::AllowAll => Arc::new(AllowAllAuthenticator::new(Identity::new(
                "anonymous",
                config.allow_all_roles.clone(),
            ))),
        };

        Ok(Self::new(
            authenticator,
            Arc::new(RoleMembershipGate),
            GatePolicy::from_config(config)?,
        ))
    }

    /// 依次执行 `gates`，全部通过时返回调用方身份（若有门禁要求认证）。
    ///
    /// 角色门禁隐含认证，若之前没有认证门禁会先完成认证。
    pub fn check(&self, headers: &HeaderMap, gates: &[Gate]) -> Result<Option<Identity>, CoreError> {
        let mut identity: Option<Identity> = None;

        for gate in gates {
            let caller = match identity.take() {
                Some(caller) => caller,
                None => self.authenticator.authenticate(headers).map_err(|rejection| {
                    warn!(?gate, %rejection, "认证失败");
                    self.policy.deny(rejection)
                })?,
            };

            if let Gate::Role(role) = gate {
                self.role_gate.require(&caller, role).map_err(|rejection| {
                    warn!(subject = %caller.subject, role, "缺少角色");
                    self.policy.deny(rejection)
                })?;
            }

            identity = Some(caller);
        }

        Ok(identity)
    }
}

/**
* filename : auth
* author : HAMA
* date: 2025. 5. 8.
* description: 사용자 가입, 로그인, 세션 관리
**/

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::accounts::token::{password_digest, TokenSigner};
use crate::config::AuthConfig;
use crate::error::SimError;
use crate::models::user::{AuthSession, LoginRequest, ProfileUpdate, RegisterRequest, User, UserRecord};
use crate::portfolio::PortfolioService;
use crate::storage::{self, keys, KeyValueStore, SharedStore};

const DUPLICATE_USER: &str = "User with this email or username already exists";

/// 인증 서비스
pub struct AuthService {
    store: SharedStore,
    portfolios: Arc<PortfolioService>,
    signer: TokenSigner,
    sessions: RwLock<HashMap<String, Uuid>>,
    demo_auto_register: bool,
}

impl AuthService {
    pub fn new(store: SharedStore, portfolios: Arc<PortfolioService>, config: &AuthConfig) -> Self {
        AuthService {
            store,
            portfolios,
            signer: TokenSigner::new(&config.token_secret),
            sessions: RwLock::new(HashMap::new()),
            demo_auto_register: config.demo_auto_register,
        }
    }

    /// 회원 가입 - 빈 포트폴리오 생성 후 세션 발급
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, SimError> {
        let email = normalize_email(&request.email);
        let username = request.username.trim().to_string();
        if email.is_empty() || username.is_empty() {
            return Err(SimError::InvalidParameter("Email and username are required".to_string()));
        }
        if request.password.is_empty() {
            return Err(SimError::InvalidParameter("Password is required".to_string()));
        }

        let user = {
            let mut store = self.store.write().await;
            let mut users = load_users(&*store).await?;

            if users.iter().any(|r| r.user.email.eq_ignore_ascii_case(&email) || r.user.username == username) {
                return Err(SimError::Duplicate(DUPLICATE_USER.to_string()));
            }

            let user = User {
                id: Uuid::new_v4(),
                email,
                username,
                first_name: request.first_name,
                last_name: request.last_name,
                created_at: Utc::now(),
            };
            users.push(UserRecord {
                user: user.clone(),
                password_digest: Some(password_digest(&request.password)),
            });
            save_users(&mut *store, &users).await?;
            user
        };

        self.portfolios.load_or_init(&user.id).await?;
        log::info!("회원 가입: {} ({})", user.username, user.id);

        self.open_session(user).await
    }

    /// 로그인 - 등록되지 않은 이메일은 설정에 따라 데모 계정 자동 생성
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, SimError> {
        let email = normalize_email(&request.email);
        let user = {
            let mut store = self.store.write().await;
            let mut users = load_users(&*store).await?;

            match users.iter().find(|r| r.user.email.eq_ignore_ascii_case(&email)) {
                Some(record) => {
                    if let Some(digest) = &record.password_digest {
                        if *digest != password_digest(&request.password) {
                            return Err(SimError::InvalidCredentials);
                        }
                    }
                    record.user.clone()
                }
                None if self.demo_auto_register && !email.is_empty() => {
                    let user = demo_user(&email);
                    users.push(UserRecord {
                        user: user.clone(),
                        password_digest: None,
                    });
                    save_users(&mut *store, &users).await?;
                    log::info!("데모 계정 자동 생성: {}", user.email);
                    user
                }
                None => return Err(SimError::InvalidCredentials),
            }
        };

        self.portfolios.load_or_init(&user.id).await?;
        log::info!("로그인: {} ({})", user.username, user.id);

        self.open_session(user).await
    }

    pub async fn logout(&self, token: &str) -> Result<(), SimError> {
        let removed = self.sessions.write().await.remove(token);
        if let Some(user_id) = removed {
            log::info!("로그아웃: {}", user_id);
        }
        Ok(())
    }

    /// 토큰 검증 후 사용자 ID 반환
    pub async fn authenticate(&self, token: &str) -> Result<Uuid, SimError> {
        let user_id = self.signer.verify(token)?;

        match self.sessions.read().await.get(token) {
            Some(session_user) if *session_user == user_id => Ok(user_id),
            _ => Err(SimError::NotAuthenticated),
        }
    }

    pub async fn current_user(&self, token: &str) -> Result<User, SimError> {
        let user_id = self.authenticate(token).await?;
        let store = self.store.read().await;

        load_users(&*store)
            .await?
            .into_iter()
            .find(|r| r.user.id == user_id)
            .map(|r| r.user)
            .ok_or(SimError::NotAuthenticated)
    }

    /// 프로필 변경 (이메일/사용자명 중복 불가)
    pub async fn update_profile(&self, token: &str, updates: ProfileUpdate) -> Result<User, SimError> {
        let user_id = self.authenticate(token).await?;
        let updates = ProfileUpdate {
            email: updates.email.as_deref().map(normalize_email),
            username: updates.username.as_deref().map(|u| u.trim().to_string()),
            ..updates
        };
        if updates.email.as_deref() == Some("") || updates.username.as_deref() == Some("") {
            return Err(SimError::InvalidParameter("Email and username are required".to_string()));
        }

        let mut store = self.store.write().await;
        let mut users = load_users(&*store).await?;

        let clash = users.iter().any(|r| {
            r.user.id != user_id
                && (updates.email.as_deref().map(|e| r.user.email.eq_ignore_ascii_case(e)).unwrap_or(false)
                    || updates.username.as_deref().map(|u| r.user.username == u).unwrap_or(false))
        });
        if clash {
            return Err(SimError::Duplicate(DUPLICATE_USER.to_string()));
        }

        let record = users
            .iter_mut()
            .find(|r| r.user.id == user_id)
            .ok_or(SimError::NotAuthenticated)?;
        updates.apply(&mut record.user);
        let user = record.user.clone();

        save_users(&mut *store, &users).await?;
        Ok(user)
    }

    async fn open_session(&self, user: User) -> Result<AuthSession, SimError> {
        let token = self.signer.issue(&user.id, Utc::now())?;

        // 사용자당 세션 하나. 다시 로그인하면 이전 토큰은 만료
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session_user| *session_user != user.id);
        sessions.insert(token.clone(), user.id);
        Ok(AuthSession { user, token })
    }
}

/// 저장과 조회에 같은 형태를 쓰도록 공백 제거 후 소문자화
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// 이메일 앞부분으로 만든 데모 사용자
fn demo_user(email: &str) -> User {
    let local = email.split('@').next().unwrap_or(email);
    let mut chars = local.chars();
    let first_name = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        username: local.to_string(),
        first_name,
        last_name: "User".to_string(),
        created_at: Utc::now(),
    }
}

async fn load_users(store: &dyn KeyValueStore) -> Result<Vec<UserRecord>, SimError> {
    Ok(storage::load(store, keys::USERS).await?.unwrap_or_default())
}

async fn save_users(store: &mut dyn KeyValueStore, users: &[UserRecord]) -> Result<(), SimError> {
    storage::save(store, keys::USERS, &users).await
}

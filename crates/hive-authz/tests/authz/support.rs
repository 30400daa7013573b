// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared fixtures for authorization tests.

use async_trait::async_trait;
use hive_authz::{
	hash_token, Action, ActionParams, ActionPattern, ActionRequest, AuthN, AuthzConfig, Effect,
	LegacyScope, LegacySelector, LegacyTokenRecord, LegacyTokenStore, LegacyTokenStrategy, OrgId,
	PolicyStatement, PolicyStatementLoader, Result, SessionCookieStrategy, TargetAccessScope,
	UserId, UserSessionResolver, Viewer,
};
use http::header::{AUTHORIZATION, COOKIE};
use http::{HeaderMap, HeaderValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const OWNER_SESSION: &str = "owner-session";
pub const MEMBER_SESSION: &str = "member-session";
pub const SUPPORT_SESSION: &str = "support-session";
pub const LEGACY_TOKEN: &str = "hvo1/legacy-registry-token";

/// How a test request authenticates.
#[derive(Debug, Clone, Copy)]
pub enum Credential {
	Anonymous,
	SessionCookie(&'static str),
	Bearer(&'static str),
}

impl Credential {
	pub fn headers(&self) -> HeaderMap {
		let mut headers = HeaderMap::new();
		match self {
			Credential::Anonymous => {}
			Credential::SessionCookie(token) => {
				let value = format!("theme=dark; hive_session={token}");
				headers.insert(COOKIE, HeaderValue::from_str(&value).unwrap());
			}
			Credential::Bearer(token) => {
				let value = format!("Bearer {token}");
				headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
			}
		}
		headers
	}
}

pub struct Fixtures {
	pub org_a: OrgId,
	pub org_b: OrgId,
	pub owner: Viewer,
	pub member: Viewer,
	pub support: Viewer,
}

/// Statements assigned per user; every organization sees the same assignment.
#[derive(Default)]
pub struct UserPolicies {
	statements: HashMap<UserId, Vec<PolicyStatement>>,
	pub loads: AtomicUsize,
}

impl UserPolicies {
	pub fn assign(&mut self, user: UserId, statements: Vec<PolicyStatement>) {
		self.statements.insert(user, statements);
	}
}

#[async_trait]
impl PolicyStatementLoader for UserPolicies {
	async fn load_policy_statements(
		&self,
		_organization_id: OrgId,
		viewer: &Viewer,
	) -> Result<Vec<PolicyStatement>> {
		self.loads.fetch_add(1, Ordering::SeqCst);
		Ok(self.statements.get(&viewer.id).cloned().unwrap_or_default())
	}
}

#[derive(Default)]
pub struct StaticSessions {
	sessions: HashMap<String, Viewer>,
}

#[async_trait]
impl UserSessionResolver for StaticSessions {
	async fn resolve(&self, session_token: &str) -> Result<Option<Viewer>> {
		Ok(self.sessions.get(session_token).cloned())
	}
}

#[derive(Default)]
pub struct StaticTokens {
	tokens: HashMap<String, LegacyTokenRecord>,
}

#[async_trait]
impl LegacyTokenStore for StaticTokens {
	async fn find_by_hash(&self, token_hash: &str) -> Result<Option<LegacyTokenRecord>> {
		Ok(self.tokens.get(token_hash).cloned())
	}
}

pub fn statement(effect: Effect, actions: &[&str], resource: String) -> PolicyStatement {
	let actions: Vec<ActionPattern> = actions
		.iter()
		.map(|action| ActionPattern::parse(action).unwrap())
		.collect();
	PolicyStatement::new(effect, actions, resource)
}

pub struct TestApp {
	pub fixtures: Fixtures,
	pub policies: Arc<UserPolicies>,
	pub authn: AuthN,
}

impl TestApp {
	pub fn new() -> Self {
		let org_a = OrgId::generate();
		let org_b = OrgId::generate();
		let owner = Viewer::new(UserId::generate(), "Owner User").with_email("owner@org-a.test");
		let member = Viewer::new(UserId::generate(), "Member User");
		let support = Viewer::new(UserId::generate(), "Support Staff");

		let mut policies = UserPolicies::default();
		policies.assign(
			owner.id,
			vec![statement(Effect::Allow, &["*"], format!("hrn:{org_a}:*"))],
		);
		policies.assign(
			member.id,
			vec![
				statement(
					Effect::Allow,
					&["organization:describe"],
					format!("hrn:{org_a}:organization/*"),
				),
				statement(
					Effect::Allow,
					&["project:describe", "appDeployment:describe"],
					format!("hrn:{org_a}:project/p1"),
				),
				statement(
					Effect::Allow,
					&["appDeployment:publish"],
					format!("hrn:{org_a}:target/t1/*"),
				),
				statement(
					Effect::Deny,
					&["appDeployment:*"],
					format!("hrn:{org_a}:target/t1/appDeployment/frozen"),
				),
			],
		);
		policies.assign(
			support.id,
			vec![statement(
				Effect::Allow,
				&["organization:describe", "support:manageTickets"],
				"hrn:*:organization/*".to_string(),
			)],
		);
		let policies = Arc::new(policies);

		let mut sessions = StaticSessions::default();
		sessions.sessions.insert(OWNER_SESSION.to_string(), owner.clone());
		sessions.sessions.insert(MEMBER_SESSION.to_string(), member.clone());
		sessions.sessions.insert(SUPPORT_SESSION.to_string(), support.clone());

		let mut tokens = StaticTokens::default();
		tokens.tokens.insert(
			hash_token(LEGACY_TOKEN),
			LegacyTokenRecord {
				selector: LegacySelector::new(org_a, "p1", "t1"),
				scopes: vec![
					LegacyScope::from(TargetAccessScope::Read),
					LegacyScope::from(TargetAccessScope::RegistryWrite),
				],
			},
		);

		let authn = AuthN::default()
			.with_strategy(Arc::new(SessionCookieStrategy::new(
				Arc::new(sessions),
				policies.clone(),
				AuthzConfig::default(),
			)))
			.with_strategy(Arc::new(LegacyTokenStrategy::new(Arc::new(tokens))));

		Self {
			fixtures: Fixtures {
				org_a,
				org_b,
				owner,
				member,
				support,
			},
			policies,
			authn,
		}
	}
}

pub struct AuthzCase {
	pub name: &'static str,
	pub credential: Credential,
	pub action: Action,
	pub params: ActionParams,
	/// `Ok(())` or the expected error code.
	pub expected: std::result::Result<(), &'static str>,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let request = ActionRequest::new(case.action, case.params.clone());
		let result = match app.authn.authenticate(&case.credential.headers()).await {
			Ok(session) => session.assert_perform_action(&request).await,
			Err(e) => Err(e),
		};

		let actual = result.as_ref().map(|_| ()).map_err(|e| e.code());
		if actual != case.expected {
			panic!(
				"Case '{}': {:?} {} - expected {:?}, got {:?}",
				case.name, case.credential, case.action, case.expected, result
			);
		}
	}
}

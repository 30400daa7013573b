// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use futures::future::join_all;
use hive_authz::{Action, ActionParams, ActionRequest, AuthzError, Session};
use std::sync::atomic::Ordering;

use super::support::{
	run_authz_cases, AuthzCase, Credential, TestApp, MEMBER_SESSION, OWNER_SESSION,
	SUPPORT_SESSION,
};

#[tokio::test]
async fn test_user_session_authorization() {
	let app = TestApp::new();
	let org_a = app.fixtures.org_a;
	let org_b = app.fixtures.org_b;

	let cases = vec![
		AuthzCase {
			name: "anonymous_cannot_describe_org",
			credential: Credential::Anonymous,
			action: Action::OrganizationDescribe,
			params: ActionParams::organization(org_a),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "unknown_session_is_unauthenticated",
			credential: Credential::SessionCookie("expired-session"),
			action: Action::OrganizationDescribe,
			params: ActionParams::organization(org_a),
			expected: Err("UNAUTHENTICATED"),
		},
		AuthzCase {
			name: "owner_can_delete_own_org",
			credential: Credential::SessionCookie(OWNER_SESSION),
			action: Action::OrganizationDelete,
			params: ActionParams::organization(org_a),
			expected: Ok(()),
		},
		AuthzCase {
			name: "owner_can_retire_app_deployment",
			credential: Credential::SessionCookie(OWNER_SESSION),
			action: Action::AppDeploymentRetire,
			params: ActionParams::target(org_a, "p9", "t9").with_app_deployment(Some("web".to_string())),
			expected: Ok(()),
		},
		AuthzCase {
			name: "owner_cannot_describe_other_org",
			credential: Credential::SessionCookie(OWNER_SESSION),
			action: Action::OrganizationDescribe,
			params: ActionParams::organization(org_b),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "member_can_describe_org",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::OrganizationDescribe,
			params: ActionParams::organization(org_a),
			expected: Ok(()),
		},
		AuthzCase {
			name: "member_can_describe_assigned_project",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::ProjectDescribe,
			params: ActionParams::project(org_a, "p1"),
			expected: Ok(()),
		},
		AuthzCase {
			name: "member_cannot_describe_other_project",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::ProjectDescribe,
			params: ActionParams::project(org_a, "p2"),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "member_cannot_delete_project",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::ProjectDelete,
			params: ActionParams::project(org_a, "p1"),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "member_can_publish_app_deployment",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::AppDeploymentPublish,
			params: ActionParams::target(org_a, "p1", "t1").with_app_deployment(Some("web".to_string())),
			expected: Ok(()),
		},
		AuthzCase {
			name: "member_cannot_publish_frozen_app_deployment",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::AppDeploymentPublish,
			params: ActionParams::target(org_a, "p1", "t1")
				.with_app_deployment(Some("frozen".to_string())),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "member_can_describe_app_deployments_of_project",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::AppDeploymentDescribe,
			params: ActionParams::target(org_a, "p1", "t1"),
			expected: Ok(()),
		},
		AuthzCase {
			name: "member_target_check_without_target_is_bad_request",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::AppDeploymentPublish,
			params: ActionParams::project(org_a, "p1"),
			expected: Err("BAD_REQUEST"),
		},
		AuthzCase {
			name: "member_cannot_describe_other_org",
			credential: Credential::SessionCookie(MEMBER_SESSION),
			action: Action::OrganizationDescribe,
			params: ActionParams::organization(org_b),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "support_can_describe_any_org",
			credential: Credential::SessionCookie(SUPPORT_SESSION),
			action: Action::OrganizationDescribe,
			params: ActionParams::organization(org_b),
			expected: Ok(()),
		},
		AuthzCase {
			name: "support_can_manage_tickets_in_any_org",
			credential: Credential::SessionCookie(SUPPORT_SESSION),
			action: Action::SupportManageTickets,
			params: ActionParams::organization(org_a),
			expected: Ok(()),
		},
		AuthzCase {
			name: "support_cannot_update_billing",
			credential: Credential::SessionCookie(SUPPORT_SESSION),
			action: Action::BillingUpdate,
			params: ActionParams::organization(org_a),
			expected: Err("FORBIDDEN"),
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_session_exposes_viewer() {
	let app = TestApp::new();

	let session = app
		.authn
		.authenticate(&Credential::SessionCookie(OWNER_SESSION).headers())
		.await
		.unwrap();
	assert_eq!(session.viewer().unwrap(), &app.fixtures.owner);
	assert!(matches!(
		session.legacy_selector(),
		Err(AuthzError::UnsupportedContext(_))
	));

	let anonymous = app
		.authn
		.authenticate(&Credential::Anonymous.headers())
		.await
		.unwrap();
	assert_eq!(anonymous.viewer().unwrap_err(), AuthzError::Unauthenticated);
}

#[tokio::test]
async fn test_sessions_are_independent() {
	let app = TestApp::new();
	let headers = Credential::SessionCookie(MEMBER_SESSION).headers();
	let request = ActionRequest::new(
		Action::ProjectDescribe,
		ActionParams::project(app.fixtures.org_a, "p1"),
	);

	for _ in 0..3 {
		let session = app.authn.authenticate(&headers).await.unwrap();
		session.assert_perform_action(&request).await.unwrap();
		session.assert_perform_action(&request).await.unwrap();
	}

	// One load per session, shared by the checks within it.
	assert_eq!(app.policies.loads.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_share_one_load() {
	let app = TestApp::new();
	let session = app
		.authn
		.authenticate(&Credential::SessionCookie(MEMBER_SESSION).headers())
		.await
		.unwrap();

	let allowed = ActionRequest::new(
		Action::ProjectDescribe,
		ActionParams::project(app.fixtures.org_a, "p1"),
	);
	let denied = ActionRequest::new(
		Action::ProjectDelete,
		ActionParams::project(app.fixtures.org_a, "p1"),
	);

	let checks = (0..32).map(|i| {
		let session = session.clone();
		let request = if i % 2 == 0 { allowed.clone() } else { denied.clone() };
		async move { (i, session.assert_perform_action(&request).await) }
	});

	for (i, result) in join_all(checks).await {
		if i % 2 == 0 {
			assert!(result.is_ok(), "check {i} should be allowed");
		} else {
			assert_eq!(
				result,
				Err(AuthzError::AccessDenied {
					action: Action::ProjectDelete
				})
			);
		}
	}

	assert_eq!(app.policies.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_trait_object_is_usable_directly() {
	let app = TestApp::new();
	let session: std::sync::Arc<dyn Session> = app
		.authn
		.authenticate(&Credential::SessionCookie(SUPPORT_SESSION).headers())
		.await
		.unwrap();

	assert_eq!(session.kind(), "user");
	assert_eq!(session.viewer().unwrap().id, app.fixtures.support.id);
	let statements = session
		.load_policy_statements_for_organization(app.fixtures.org_b)
		.await
		.unwrap();
	assert_eq!(statements.len(), 1);
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use hive_authz::{Action, ActionParams, AuthzError};

use super::support::{run_authz_cases, AuthzCase, Credential, TestApp, LEGACY_TOKEN};

#[tokio::test]
async fn test_legacy_token_authorization() {
	let app = TestApp::new();
	let org_a = app.fixtures.org_a;
	let org_b = app.fixtures.org_b;

	let cases = vec![
		AuthzCase {
			name: "registry_write_can_publish_app_deployment",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::AppDeploymentPublish,
			params: ActionParams::target(org_a, "p1", "t1").with_app_deployment(Some("web".to_string())),
			expected: Ok(()),
		},
		AuthzCase {
			name: "registry_write_can_create_and_retire_app_deployment",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::AppDeploymentRetire,
			params: ActionParams::target(org_a, "p1", "t1").with_app_deployment(Some("web".to_string())),
			expected: Ok(()),
		},
		AuthzCase {
			name: "registry_write_can_publish_schema",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::SchemaVersionPublish,
			params: ActionParams::target(org_a, "p1", "t1").with_service(Some("users".to_string())),
			expected: Ok(()),
		},
		AuthzCase {
			name: "target_read_can_describe_laboratory",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::LaboratoryDescribe,
			params: ActionParams::target(org_a, "p1", "t1"),
			expected: Ok(()),
		},
		AuthzCase {
			name: "token_cannot_delete_target",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::TargetDelete,
			params: ActionParams::target(org_a, "p1", "t1"),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "token_cannot_modify_contracts_without_settings_scope",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::SchemaContractCreate,
			params: ActionParams::target(org_a, "p1", "t1"),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "token_cannot_reach_other_org",
			credential: Credential::Bearer(LEGACY_TOKEN),
			action: Action::AppDeploymentPublish,
			params: ActionParams::target(org_b, "p1", "t1").with_app_deployment(Some("web".to_string())),
			expected: Err("FORBIDDEN"),
		},
		AuthzCase {
			name: "unknown_token_is_unauthenticated",
			credential: Credential::Bearer("hvo1/forged"),
			action: Action::AppDeploymentPublish,
			params: ActionParams::target(org_a, "p1", "t1"),
			expected: Err("UNAUTHENTICATED"),
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_legacy_session_exposes_selector() {
	let app = TestApp::new();
	let session = app
		.authn
		.authenticate(&Credential::Bearer(LEGACY_TOKEN).headers())
		.await
		.unwrap();

	assert_eq!(session.kind(), "legacy_token");
	let selector = session.legacy_selector().unwrap();
	assert_eq!(selector.organization_id, app.fixtures.org_a);
	assert_eq!(selector.project_id, "p1");
	assert_eq!(selector.target_id, "t1");
	assert_eq!(session.viewer().unwrap_err(), AuthzError::Unauthenticated);
}

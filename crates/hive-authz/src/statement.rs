// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy statements.
//!
//! A statement binds action patterns to resource patterns with an allow or
//! deny effect. Statements use the JSON shape of the policy documents:
//!
//! ```json
//! {
//!   "effect": "allow",
//!   "action": ["project:describe", "target:*"],
//!   "resource": "hrn:11111111-1111-1111-1111-111111111111:project/*"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::action::Action;
use crate::error::{AuthzError, Result};
use crate::hrn::{ResourceIdentifier, WILDCARD};
use crate::matcher::action_matches;

/// Effect of a matching statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
	Allow,
	Deny,
}

/// A single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
	One(T),
	Many(Vec<T>),
}

impl<T> OneOrMany<T> {
	pub fn as_slice(&self) -> &[T] {
		match self {
			OneOrMany::One(value) => std::slice::from_ref(value),
			OneOrMany::Many(values) => values,
		}
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.as_slice().iter()
	}
}

impl From<ActionPattern> for OneOrMany<ActionPattern> {
	fn from(value: ActionPattern) -> Self {
		OneOrMany::One(value)
	}
}

impl From<String> for OneOrMany<String> {
	fn from(value: String) -> Self {
		OneOrMany::One(value)
	}
}

impl<T> From<Vec<T>> for OneOrMany<T> {
	fn from(values: Vec<T>) -> Self {
		OneOrMany::Many(values)
	}
}

/// Action side of a statement: `*`, `<scope>:*` or a registered action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionPattern(String);

impl ActionPattern {
	pub fn parse(pattern: &str) -> Result<Self> {
		if pattern == WILDCARD {
			return Ok(Self(pattern.to_string()));
		}

		match pattern.split_once(':') {
			Some((scope, WILDCARD)) if Action::is_known_scope(scope) => Ok(Self(pattern.to_string())),
			Some(_) if pattern.parse::<Action>().is_ok() => Ok(Self(pattern.to_string())),
			_ => Err(AuthzError::InvalidActionPattern(pattern.to_string())),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn matches(&self, action: Action) -> bool {
		action_matches(&self.0, action.as_str())
	}
}

impl From<Action> for ActionPattern {
	fn from(action: Action) -> Self {
		Self(action.as_str().to_string())
	}
}

impl TryFrom<String> for ActionPattern {
	type Error = AuthzError;

	fn try_from(value: String) -> Result<Self> {
		Self::parse(&value)
	}
}

impl From<ActionPattern> for String {
	fn from(pattern: ActionPattern) -> Self {
		pattern.0
	}
}

impl FromStr for ActionPattern {
	type Err = AuthzError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl fmt::Display for ActionPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One allow or deny rule.
///
/// Resources are kept as raw strings and parsed during evaluation, so a
/// malformed resource fails the check that reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
	pub effect: Effect,
	pub action: OneOrMany<ActionPattern>,
	pub resource: OneOrMany<String>,
}

impl PolicyStatement {
	pub fn new(
		effect: Effect,
		action: impl Into<OneOrMany<ActionPattern>>,
		resource: impl Into<OneOrMany<String>>,
	) -> Self {
		Self {
			effect,
			action: action.into(),
			resource: resource.into(),
		}
	}

	/// An allow statement for the given actions on the given resources.
	pub fn allow(actions: &[Action], resources: Vec<String>) -> Self {
		Self::new(
			Effect::Allow,
			actions.iter().copied().map(ActionPattern::from).collect::<Vec<_>>(),
			resources,
		)
	}

	pub fn actions(&self) -> &[ActionPattern] {
		self.action.as_slice()
	}

	pub fn resources(&self) -> &[String] {
		self.resource.as_slice()
	}

	/// Parses every resource of the statement.
	pub fn parsed_resources(&self) -> Result<Vec<ResourceIdentifier>> {
		self
			.resources()
			.iter()
			.map(|resource| ResourceIdentifier::parse(resource).map_err(AuthzError::from))
			.collect()
	}

	/// Checks the statement eagerly, for loaders that want to reject bad data up front.
	pub fn validate(&self) -> Result<()> {
		self.parsed_resources().map(|_| ())
	}

	/// Returns true if any of the statement's action patterns matches.
	pub fn matches_action(&self, action: Action) -> bool {
		self.actions().iter().any(|pattern| pattern.matches(action))
	}
}

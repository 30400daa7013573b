// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hive resource names (HRNs).
//!
//! A resource identifier has the form `hrn:<organization>:<resource path>`, e.g.
//! `hrn:aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa:target/bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb`.
//! The organization segment is a lower-case hyphenated UUID or `*`; the
//! resource path is a slash-delimited sequence of segments that may end in `*`.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::InvalidResourceIdentifier;
use crate::types::OrgId;

pub const HRN_PREFIX: &str = "hrn";
pub const WILDCARD: &str = "*";

/// Organization segment of a resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationScope {
	/// `*`, any organization.
	Any,
	Id(OrgId),
}

impl OrganizationScope {
	/// Returns true if this scope covers the given organization.
	pub fn matches(&self, organization_id: OrgId) -> bool {
		match self {
			OrganizationScope::Any => true,
			OrganizationScope::Id(id) => *id == organization_id,
		}
	}
}

impl fmt::Display for OrganizationScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrganizationScope::Any => f.write_str(WILDCARD),
			OrganizationScope::Id(id) => write!(f, "{id}"),
		}
	}
}

/// A parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
	pub organization: OrganizationScope,
	pub resource_path: String,
}

impl ResourceIdentifier {
	pub fn new(organization: OrganizationScope, resource_path: impl Into<String>) -> Self {
		Self {
			organization,
			resource_path: resource_path.into(),
		}
	}

	/// Identifier for the organization resource itself, `hrn:<org>:organization/<org>`.
	pub fn organization(organization_id: OrgId) -> Self {
		Self::new(
			OrganizationScope::Id(organization_id),
			format!("organization/{organization_id}"),
		)
	}

	/// Parses a resource identifier.
	///
	/// Only the first three `:`-separated segments are considered.
	pub fn parse(resource: &str) -> Result<Self, InvalidResourceIdentifier> {
		let parts: Vec<&str> = resource.split(':').collect();
		if parts.len() < 2 {
			return Err(InvalidResourceIdentifier::MissingParts(resource.to_string()));
		}
		if parts[0] != HRN_PREFIX {
			return Err(InvalidResourceIdentifier::InvalidPrefix(resource.to_string()));
		}

		let organization = match parts[1] {
			WILDCARD => OrganizationScope::Any,
			segment => parse_organization_id(segment)
				.map(OrganizationScope::Id)
				.ok_or_else(|| InvalidResourceIdentifier::InvalidOrganization(resource.to_string()))?,
		};

		let resource_path = match parts.get(2) {
			Some(path) if !path.is_empty() => *path,
			_ => {
				return Err(InvalidResourceIdentifier::MissingResourcePath(
					resource.to_string(),
				))
			}
		};

		Ok(Self::new(organization, resource_path))
	}
}

/// Accepts only the 8-4-4-4-12 lower-case form that [`OrgId`] displays as, so
/// a parsed identifier always renders back to its input.
fn parse_organization_id(segment: &str) -> Option<OrgId> {
	let canonical = segment.len() == 36
		&& segment.bytes().enumerate().all(|(i, b)| match i {
			8 | 13 | 18 | 23 => b == b'-',
			_ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
		});
	if !canonical {
		return None;
	}
	Uuid::try_parse(segment).ok().map(OrgId::new)
}

impl FromStr for ResourceIdentifier {
	type Err = InvalidResourceIdentifier;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for ResourceIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{HRN_PREFIX}:{}:{}",
			self.organization, self.resource_path
		)
	}
}

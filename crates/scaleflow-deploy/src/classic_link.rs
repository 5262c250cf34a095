//! Classic-link security groups
//!
//! Classic (non-VPC) deployments in a region with a classic-link VPC get a set of
//! that VPC's security groups attached. The set merges explicit groups, the
//! account default and, optionally, groups derived from the application identity,
//! and never exceeds the configured maximum.

use crate::description::DeployRequest;
use crate::error::{DeployError, Result};
use crate::names::{ClusterName, derived_group_names};
use regex::Regex;
use scaleflow_cloud::{ClassicLinkPlan, RegionClient, SecurityGroupFilter, TaskSink};
use scaleflow_config::DeployDefaults;
use std::collections::HashMap;
use std::sync::LazyLock;

static GROUP_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^sg-[0-9a-f]+$").unwrap());

const PHASE: &str = "DEPLOY";

/// Whether an entry is a raw security group id rather than a group name
pub fn looks_like_group_id(name: &str) -> bool {
    GROUP_ID.is_match(name)
}

fn push_unique(groups: &mut Vec<String>, name: String) {
    if !groups.contains(&name) {
        groups.push(name);
    }
}

pub struct ClassicLinkResolver<'a> {
    defaults: &'a DeployDefaults,
    task: &'a dyn TaskSink,
}

impl<'a> ClassicLinkResolver<'a> {
    pub fn new(defaults: &'a DeployDefaults, task: &'a dyn TaskSink) -> Self {
        Self { defaults, task }
    }

    /// Compute the classic-link plan for one region
    ///
    /// `source` is a client for the cloned group's account and region. Group ids
    /// carried over from the source are resolved there, or in `target` when absent.
    pub async fn resolve(
        &self,
        target: &dyn RegionClient,
        source: Option<&dyn RegionClient>,
        request: &DeployRequest,
    ) -> Result<ClassicLinkPlan> {
        if request.subnet_type().is_some() {
            return Ok(ClassicLinkPlan::empty());
        }

        let vpcs = target.describe_classic_link_vpcs().await?;
        let Some(vpc_id) = vpcs
            .into_iter()
            .find(|vpc| vpc.classic_link_enabled)
            .map(|vpc| vpc.vpc_id)
        else {
            tracing::debug!(region = target.region(), "No classic-link VPC in region");
            return Ok(ClassicLinkPlan::empty());
        };

        let mut groups = Vec::new();
        for name in &request.classic_link_vpc_security_groups {
            push_unique(&mut groups, name.clone());
        }
        if let Some(default_group) = &self.defaults.classic_link_security_group_name {
            push_unique(&mut groups, default_group.clone());
        }

        if let Some(source_vpc_id) = &request.classic_link_vpc_id {
            if !request.classic_link_vpc_security_groups.is_empty() {
                let lookup = source.unwrap_or(target);
                groups = self
                    .resolve_group_ids(lookup, source_vpc_id, groups)
                    .await?;
            }
        }

        if self.defaults.add_app_groups_to_classic_link {
            self.remove_stale_source_groups(request, &mut groups);
            self.add_app_groups(target, &vpc_id, request, &mut groups)
                .await?;
        }

        let max = self.defaults.max_classic_link_security_groups;
        if groups.len() > max {
            return Err(DeployError::Resolution(format!(
                "{} classic-link security groups requested, at most {} allowed: {}",
                groups.len(),
                max,
                groups.join(", ")
            )));
        }

        Ok(ClassicLinkPlan {
            vpc_id: Some(vpc_id),
            security_groups: groups,
        })
    }

    /// Replace raw group ids with their names, in place
    async fn resolve_group_ids(
        &self,
        lookup: &dyn RegionClient,
        vpc_id: &str,
        groups: Vec<String>,
    ) -> Result<Vec<String>> {
        let ids: Vec<String> = groups
            .iter()
            .filter(|g| looks_like_group_id(g))
            .cloned()
            .collect();
        if ids.is_empty() {
            return Ok(groups);
        }

        let found = lookup
            .describe_security_groups(&SecurityGroupFilter::ByIds(ids.clone()))
            .await?;
        let names: HashMap<String, String> = found
            .into_iter()
            .filter(|sg| sg.vpc_id.as_deref() == Some(vpc_id))
            .map(|sg| (sg.group_id, sg.group_name))
            .collect();

        let unresolved: Vec<&String> = ids.iter().filter(|id| !names.contains_key(*id)).collect();
        if !unresolved.is_empty() {
            return Err(DeployError::Resolution(format!(
                "could not resolve classic-link security group ids in {}: {}",
                vpc_id,
                unresolved
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let mut resolved = Vec::with_capacity(groups.len());
        for group in groups {
            let name = names.get(&group).cloned().unwrap_or(group);
            push_unique(&mut resolved, name);
        }
        Ok(resolved)
    }

    /// Drop the source cluster's derived groups that no longer match the target identity
    fn remove_stale_source_groups(&self, request: &DeployRequest, groups: &mut Vec<String>) {
        let Some(source_asg) = request
            .source
            .as_ref()
            .and_then(|s| s.location())
            .map(|(_, asg)| asg)
        else {
            return;
        };

        let source = ClusterName::parse(source_asg);
        let target_stack = request.stack.as_deref().filter(|s| !s.is_empty());
        let target_detail = request.free_form_details.as_deref().filter(|s| !s.is_empty());

        let app_match = source.app == request.application;
        let stack_match = app_match && source.stack.as_deref() == target_stack;
        let detail_match = stack_match && source.detail.as_deref() == target_detail;

        let mut stale = Vec::new();
        if !app_match {
            stale.push(source.app.clone());
        }
        if !stack_match {
            stale.extend(source.app_stack());
        }
        if !detail_match {
            stale.extend(source.app_stack_detail());
        }

        if !stale.is_empty() {
            tracing::debug!(?stale, "Removing source cluster groups from classic link");
            groups.retain(|g| !stale.contains(g));
        }
    }

    async fn add_app_groups(
        &self,
        target: &dyn RegionClient,
        vpc_id: &str,
        request: &DeployRequest,
        groups: &mut Vec<String>,
    ) -> Result<()> {
        let missing: Vec<String> = derived_group_names(
            &request.application,
            request.stack.as_deref(),
            request.free_form_details.as_deref(),
        )
        .into_iter()
        .filter(|name| !groups.contains(name))
        .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let found = target
            .describe_security_groups(&SecurityGroupFilter::ByNames {
                names: missing.clone(),
                vpc_id: Some(vpc_id.to_string()),
            })
            .await?;

        let max = self.defaults.max_classic_link_security_groups;
        for name in missing {
            let exists = found
                .iter()
                .any(|sg| sg.group_name == name && sg.vpc_id.as_deref() == Some(vpc_id));
            if !exists {
                continue;
            }
            if groups.len() < max {
                groups.push(name);
            } else {
                self.task.update_status(
                    PHASE,
                    &format!(
                        "Not adding {} to classic-link security groups, already at max of {}",
                        name, max
                    ),
                );
            }
        }
        Ok(())
    }
}

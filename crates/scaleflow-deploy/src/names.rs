//! Cluster naming
//!
//! Group names follow `app[-stack[-detail]][-vNNN]`.

use regex::Regex;
use std::sync::LazyLock;

static PUSH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<cluster>.+?)-v(?P<sequence>\d{3,})$").unwrap());

/// Parsed group name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterName {
    pub app: String,
    pub stack: Option<String>,
    pub detail: Option<String>,
    pub sequence: Option<u32>,
}

impl ClusterName {
    pub fn parse(name: &str) -> Self {
        let (cluster, sequence) = match PUSH_SUFFIX.captures(name) {
            Some(caps) => (
                caps.name("cluster").map_or(name, |m| m.as_str()),
                caps.name("sequence").and_then(|m| m.as_str().parse().ok()),
            ),
            None => (name, None),
        };

        let mut parts = cluster.splitn(3, '-');
        let app = parts.next().unwrap_or_default().to_string();
        let stack = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        let detail = parts.next().filter(|s| !s.is_empty()).map(str::to_string);

        Self {
            app,
            stack,
            detail,
            sequence,
        }
    }

    /// `app-stack` group name, when a stack is present
    pub fn app_stack(&self) -> Option<String> {
        self.stack
            .as_ref()
            .map(|stack| format!("{}-{}", self.app, stack))
    }

    /// `app-stack-detail` group name, when a detail is present
    pub fn app_stack_detail(&self) -> Option<String> {
        self.detail.as_ref().map(|detail| {
            format!(
                "{}-{}-{}",
                self.app,
                self.stack.as_deref().unwrap_or_default(),
                detail
            )
        })
    }
}

/// Security group names derived from an application identity, most general first
pub fn derived_group_names(app: &str, stack: Option<&str>, detail: Option<&str>) -> Vec<String> {
    let cluster = ClusterName {
        app: app.to_string(),
        stack: stack.filter(|s| !s.is_empty()).map(str::to_string),
        detail: detail.filter(|s| !s.is_empty()).map(str::to_string),
        sequence: None,
    };
    std::iter::once(cluster.app.clone())
        .chain(cluster.app_stack())
        .chain(cluster.app_stack_detail())
        .collect()
}

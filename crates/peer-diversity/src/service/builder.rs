//! Step-by-step filter construction.

use std::sync::Arc;

use crate::adapters::NoAsnLookup;
use crate::domain::{DiversityError, LegacyClassA, NodeId, LEGACY_CLASS_A};
use crate::ports::{AsnLookup, CplLookup, GroupingPolicy, LocalCplLookup};

use super::filter::DiversityFilter;

/// Builder for [`DiversityFilter`].
///
/// A policy and a CPL source are required. The ASN source defaults to
/// [`NoAsnLookup`], which puts every native IPv6 peer in one group.
///
/// # Example
///
/// ```rust,ignore
/// let filter = DiversityFilterBuilder::new()
///     .policy(policy)
///     .local_node(local_id)
///     .asn_lookup(Arc::new(asn_table))
///     .log_key("rt/diversity")
///     .whitelist(bootstrap_ids)
///     .build()?;
/// ```
pub struct DiversityFilterBuilder {
    policy: Option<Arc<dyn GroupingPolicy>>,
    cpl_lookup: Option<Arc<dyn CplLookup>>,
    asn_lookup: Option<Arc<dyn AsnLookup>>,
    log_key: String,
    legacy_networks: Vec<String>,
    whitelist: Vec<NodeId>,
}

impl Default for DiversityFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiversityFilterBuilder {
    /// Empty builder with the built-in legacy Class A list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: None,
            cpl_lookup: None,
            asn_lookup: None,
            log_key: String::new(),
            legacy_networks: LEGACY_CLASS_A.iter().map(|s| s.to_string()).collect(),
            whitelist: Vec::new(),
        }
    }

    /// Diversity policy (required).
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn GroupingPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// CPL source (required unless `local_node` is used).
    #[must_use]
    pub fn cpl_lookup(mut self, lookup: Arc<dyn CplLookup>) -> Self {
        self.cpl_lookup = Some(lookup);
        self
    }

    /// Compute CPL against `local` with [`LocalCplLookup`].
    #[must_use]
    pub fn local_node(self, local: NodeId) -> Self {
        self.cpl_lookup(Arc::new(LocalCplLookup::new(local)))
    }

    /// ASN source for IPv6 grouping.
    #[must_use]
    pub fn asn_lookup(mut self, lookup: Arc<dyn AsnLookup>) -> Self {
        self.asn_lookup = Some(lookup);
        self
    }

    /// Diagnostic key attached to every log event.
    #[must_use]
    pub fn log_key(mut self, key: impl Into<String>) -> Self {
        self.log_key = key.into();
        self
    }

    /// Replace the networks grouped at /8.
    #[must_use]
    pub fn legacy_networks<I, S>(mut self, networks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legacy_networks = networks.into_iter().map(Into::into).collect();
        self
    }

    /// Peers to whitelist as soon as the filter exists.
    #[must_use]
    pub fn whitelist(mut self, peers: impl IntoIterator<Item = NodeId>) -> Self {
        self.whitelist.extend(peers);
        self
    }

    /// Build the filter.
    ///
    /// # Errors
    ///
    /// `DiversityError::Configuration` when the policy or CPL source is
    /// missing, or a legacy network literal does not parse.
    pub fn build(self) -> Result<DiversityFilter, DiversityError> {
        let policy = self.policy.ok_or_else(|| {
            DiversityError::Configuration("grouping policy must not be missing".to_string())
        })?;
        let cpl_lookup = self.cpl_lookup.ok_or_else(|| {
            DiversityError::Configuration("CPL lookup must not be missing".to_string())
        })?;
        let asn_lookup = self
            .asn_lookup
            .unwrap_or_else(|| Arc::new(NoAsnLookup) as Arc<dyn AsnLookup>);

        let literals: Vec<&str> = self.legacy_networks.iter().map(String::as_str).collect();
        let legacy = LegacyClassA::from_literals(&literals)?;

        let filter =
            DiversityFilter::with_legacy(policy, self.log_key, cpl_lookup, asn_lookup, legacy);
        if !self.whitelist.is_empty() {
            filter.whitelist_peers(&self.whitelist);
        }
        Ok(filter)
    }
}

//! Config-backed account store

use scaleflow_cloud::{AccountCredentials, AccountLookup, StaticAccount};
use std::collections::HashMap;
use std::sync::Arc;

/// [`AccountLookup`] over the accounts listed in the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigAccountLookup {
    accounts: HashMap<String, Arc<StaticAccount>>,
}

impl ConfigAccountLookup {
    pub fn new(accounts: impl IntoIterator<Item = StaticAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|a| (a.name.clone(), Arc::new(a)))
            .collect();
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountLookup for ConfigAccountLookup {
    fn get_by_name(&self, name: &str) -> Option<Arc<dyn AccountCredentials>> {
        self.accounts
            .get(name)
            .map(|a| Arc::clone(a) as Arc<dyn AccountCredentials>)
    }
}

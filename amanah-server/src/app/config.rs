use serde::{Deserialize, Serialize};

use amanah_ledger::kas::RetryPolicy;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_exec_migrations")]
    pub exec_migrations: bool,
    #[serde(default)]
    pub balance_read_retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exec_migrations: default_exec_migrations(),
            balance_read_retry: RetryPolicy::default(),
        }
    }
}

fn default_exec_migrations() -> bool {
    true
}

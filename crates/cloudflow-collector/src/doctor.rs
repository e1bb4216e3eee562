// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use owo_colors::OwoColorize;

use crate::errors::ConfigError;

/// Master switch the AWS SDKs look at before emitting CSM events.
pub const CSM_ENABLED_VAR: &str = "AWS_CSM_ENABLED";
/// Host the SDKs send CSM datagrams to. Defaults to 127.0.0.1 when unset.
pub const CSM_HOST_VAR: &str = "AWS_CSM_HOST";
/// Port the SDKs send CSM datagrams to. Defaults to 31000 when unset.
pub const CSM_PORT_VAR: &str = "AWS_CSM_PORT";

/// Snapshot of the client-side monitoring variables in the environment.
/// Unset and empty both count as missing, matching how the SDKs read them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CsmEnvironment {
    pub enabled: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl CsmEnvironment {
    pub fn from_env() -> Self {
        Self {
            enabled: read_var(CSM_ENABLED_VAR),
            host: read_var(CSM_HOST_VAR),
            port: read_var(CSM_PORT_VAR),
        }
    }

    /// The one hard requirement: without the master switch no SDK will
    /// send anything, so there is nothing to collect.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.enabled.is_none() {
            return Err(ConfigError::MissingVar(CSM_ENABLED_VAR));
        }
        Ok(())
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Inspects the environment and prints a short health report.
///
/// A missing `AWS_CSM_ENABLED` is returned as an error for the caller to
/// report and exit on. Missing host or port only earns a warning, since
/// the SDK defaults happen to line up with this collector's defaults.
pub fn run() -> Result<(), ConfigError> {
    let csm = CsmEnvironment::from_env();
    csm.check()?;

    if let Some(enabled) = &csm.enabled {
        println!("{}", format!("{CSM_ENABLED_VAR} is set to {enabled}").green());
    }
    match (&csm.host, &csm.port) {
        (Some(host), Some(port)) => {
            println!("{}", format!("{CSM_HOST_VAR} is set to {host}").green());
            println!("{}", format!("{CSM_PORT_VAR} is set to {port}").green());
        }
        _ => {
            println!(
                "{}",
                format!("Warning: {CSM_HOST_VAR} or {CSM_PORT_VAR} is not set").yellow()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_csm_vars() {
        env::remove_var(CSM_ENABLED_VAR);
        env::remove_var(CSM_HOST_VAR);
        env::remove_var(CSM_PORT_VAR);
    }

    #[test]
    #[serial]
    fn from_env_reads_all_three_variables() {
        clear_csm_vars();
        env::set_var(CSM_ENABLED_VAR, "true");
        env::set_var(CSM_HOST_VAR, "127.0.0.1");
        env::set_var(CSM_PORT_VAR, "31000");

        let csm = CsmEnvironment::from_env();
        assert_eq!(csm.enabled.as_deref(), Some("true"));
        assert_eq!(csm.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(csm.port.as_deref(), Some("31000"));

        clear_csm_vars();
    }

    #[test]
    #[serial]
    fn empty_variables_count_as_missing() {
        clear_csm_vars();
        env::set_var(CSM_ENABLED_VAR, "  ");

        let csm = CsmEnvironment::from_env();
        assert_eq!(csm.enabled, None);
        assert_eq!(csm.check(), Err(ConfigError::MissingVar(CSM_ENABLED_VAR)));

        clear_csm_vars();
    }

    #[test]
    #[serial]
    fn run_fails_without_the_master_switch() {
        clear_csm_vars();
        env::set_var(CSM_HOST_VAR, "127.0.0.1");
        env::set_var(CSM_PORT_VAR, "31000");

        assert_eq!(run(), Err(ConfigError::MissingVar(CSM_ENABLED_VAR)));

        clear_csm_vars();
    }

    #[test]
    #[serial]
    fn run_passes_with_only_the_master_switch() {
        clear_csm_vars();
        env::set_var(CSM_ENABLED_VAR, "true");

        assert_eq!(run(), Ok(()));

        clear_csm_vars();
    }

    #[test]
    #[serial]
    fn run_passes_with_the_full_environment() {
        clear_csm_vars();
        env::set_var(CSM_ENABLED_VAR, "true");
        env::set_var(CSM_HOST_VAR, "127.0.0.1");
        env::set_var(CSM_PORT_VAR, "31000");

        assert_eq!(run(), Ok(()));

        clear_csm_vars();
    }
}

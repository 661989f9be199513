//! Host-header and IP allowlists, parsed from the CSV environment inputs
//! spec.md §6 names (`allowed-hosts list`, `IP allow-list`). An empty list
//! means "allow everything" — the lists are opt-in hardening, not a
//! default-deny posture.

use std::net::IpAddr;

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    allowed_hosts: Vec<String>,
    ip_allow_list: Vec<IpAddr>,
}

impl AccessControl {
    pub fn parse(allowed_hosts: &str, ip_allow_list: &str) -> Self {
        Self {
            allowed_hosts: split_csv(allowed_hosts),
            ip_allow_list: split_csv(ip_allow_list)
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect(),
        }
    }

    pub fn host_allowed(&self, host: &str) -> bool {
        self.allowed_hosts.is_empty() || self.allowed_hosts.iter().any(|h| h == host)
    }

    pub fn ip_allowed(&self, ip: IpAddr) -> bool {
        self.ip_allow_list.is_empty() || self.ip_allow_list.contains(&ip)
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_allow_everything() {
        let access = AccessControl::parse("", "");
        assert!(access.host_allowed("anything.example"));
        assert!(access.ip_allowed("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn host_allowlist_rejects_unlisted_host() {
        let access = AccessControl::parse("casino.example, api.casino.example", "");
        assert!(access.host_allowed("casino.example"));
        assert!(access.host_allowed("api.casino.example"));
        assert!(!access.host_allowed("evil.example"));
    }

    #[test]
    fn ip_allowlist_rejects_unlisted_ip() {
        let access = AccessControl::parse("", "127.0.0.1, 10.0.0.5");
        assert!(access.ip_allowed("127.0.0.1".parse().unwrap()));
        assert!(!access.ip_allowed("10.0.0.6".parse().unwrap()));
    }
}

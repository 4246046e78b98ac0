//! Node address definitions

use std::fmt;
use std::str::FromStr;

use crate::error::MeshError;

/// Stable address of one cluster node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeAddr {
    pub host: String,
    pub port: u16,
}

impl NodeAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for NodeAddr {
    type Err = MeshError;

    /// Parse `host:port`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| MeshError::Config(format!("invalid node address: {:?}", s)))?;

        if host.is_empty() {
            return Err(MeshError::Config(format!("invalid node address: {:?}", s)));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| MeshError::Config(format!("invalid port in node address: {:?}", s)))?;

        Ok(Self::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let addr: NodeAddr = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(addr.host, "127.0.0.1");
        assert_eq!(addr.port, 9000);
        assert_eq!(addr.to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn rejects_missing_or_bad_port() {
        assert!("localhost".parse::<NodeAddr>().is_err());
        assert!("localhost:banana".parse::<NodeAddr>().is_err());
        assert!(":9000".parse::<NodeAddr>().is_err());
    }
}

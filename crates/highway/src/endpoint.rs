//! Transfer server endpoints.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::error::HighwayError;

/// A highway server address as handed out by the login server.
///
/// `address` is the integer form of an IPv4 address with the first octet in
/// the least-significant byte, so `0x0100_007F` is `127.0.0.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub address: u32,
    pub port: u16,
}

impl Endpoint {
    pub fn new(address: u32, port: u16) -> Self {
        Self { address, port }
    }

    /// Builds an endpoint from a regular IPv4 address.
    pub fn from_ipv4(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            address: u32::from_le_bytes(ip.octets()),
            port,
        }
    }

    pub fn ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address.to_le_bytes())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip(), self.port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip(), self.port)
    }
}

/// Ordered, read-only set of interchangeable endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// Pairs `addresses[i]` with `ports[i]`.
    pub fn from_parallel(addresses: &[u32], ports: &[u16]) -> Result<Self, HighwayError> {
        if addresses.len() != ports.len() {
            return Err(HighwayError::EndpointMismatch {
                addresses: addresses.len(),
                ports: ports.len(),
            });
        }
        let endpoints = addresses
            .iter()
            .zip(ports)
            .map(|(&address, &port)| Endpoint::new(address, port))
            .collect();
        Ok(Self { endpoints })
    }

    /// Endpoint for the payload at batch position `index`.
    ///
    /// # Panics
    ///
    /// Panics if the pool is empty.
    pub fn assign(&self, index: usize) -> Endpoint {
        self.endpoints[index % self.endpoints.len()]
    }

    /// First endpoint of the pool.
    ///
    /// # Panics
    ///
    /// Panics if the pool is empty.
    pub fn first(&self) -> Endpoint {
        self.endpoints[0]
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}

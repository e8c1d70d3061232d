pub mod configuration;
pub mod device;
pub mod ip_services;
pub mod routing;
pub mod security;
pub mod switching;
pub mod vpn;
pub mod wireless;

pub use configuration::Configuration;
pub use device::{ports_by_peer, Connection, Device, DeviceType, Endpoint, Port, Vendor};
pub use ip_services::*;
pub use routing::*;
pub use security::*;
pub use switching::*;
pub use vpn::*;
pub use wireless::*;

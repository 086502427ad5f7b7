//! BlueZ-backed transport: bonded-device lookup and RFCOMM stream setup.

use crate::infrastructure::link::transport::{
    Connector, IoByteSource, IoLinkWriter, LinkError, LinkPair, Peer,
};
use async_trait::async_trait;
use bluer::rfcomm::{SocketAddr, Stream};
use tracing::{debug, info, warn};

/// Connector backed by the system BlueZ daemon.
pub struct BluezConnector {
    channel: u8,
    service_uuid: Option<bluer::Uuid>,
}

impl BluezConnector {
    pub fn new(channel: u8, service_uuid: &str) -> Self {
        let service_uuid = match service_uuid.parse() {
            Ok(uuid) => Some(uuid),
            Err(e) => {
                warn!(service_uuid, "unparsable SPP UUID, skipping service check: {e}");
                None
            }
        };
        Self {
            channel,
            service_uuid,
        }
    }
}

#[async_trait]
impl Connector for BluezConnector {
    async fn resolve(&self, device_name: &str) -> Result<Peer, LinkError> {
        let session = bluer::Session::new()
            .await
            .map_err(|e| LinkError::PlatformUnsupported(e.to_string()))?;
        let adapter = session
            .default_adapter()
            .await
            .map_err(|e| LinkError::PlatformUnsupported(e.to_string()))?;
        let powered = adapter
            .is_powered()
            .await
            .map_err(|e| LinkError::PlatformUnsupported(e.to_string()))?;
        if !powered {
            return Err(LinkError::RadioDisabled);
        }

        let addresses = adapter
            .device_addresses()
            .await
            .map_err(|e| LinkError::PlatformUnsupported(e.to_string()))?;
        for address in addresses {
            let device = adapter
                .device(address)
                .map_err(|e| LinkError::PlatformUnsupported(e.to_string()))?;
            let paired = device.is_paired().await.unwrap_or(false);
            let name = device.name().await.ok().flatten();
            if paired && name.as_deref() == Some(device_name) {
                if let (Some(expected), Ok(Some(uuids))) =
                    (self.service_uuid, device.uuids().await)
                {
                    if !uuids.contains(&expected) {
                        warn!(%address, "peer does not advertise the SPP service");
                    }
                }
                debug!(%address, "bonded peer resolved");
                return Ok(Peer {
                    name: device_name.to_string(),
                    address: address.to_string(),
                });
            }
        }
        Err(LinkError::PeerNotFound(device_name.to_string()))
    }

    async fn open(&self, peer: &Peer) -> Result<LinkPair, LinkError> {
        let address: bluer::Address = peer
            .address
            .parse()
            .map_err(|_| LinkError::SocketCreateFailed(format!("bad peer address {}", peer.address)))?;
        let target = SocketAddr::new(address, self.channel);

        info!(peer = %peer.name, channel = self.channel, "opening RFCOMM stream");
        let stream = Stream::connect(target)
            .await
            .map_err(|e| LinkError::ConnectFailed(e.to_string()))?;

        let (read_half, write_half) = tokio::io::split(stream);
        Ok(LinkPair {
            writer: Box::new(IoLinkWriter::new(write_half)),
            source: Box::new(IoByteSource::new(read_half)),
        })
    }
}

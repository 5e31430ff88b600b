//! The client engine: broadcast discovery plus confirmed present-value
//! transactions over any [`DataLink`].

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{timeout_at, Instant};

use bacport_core::apdu::{ApduType, ComplexAckHeader, SimpleAck, UnconfirmedRequestHeader};
use bacport_core::encoding::{reader::Reader, writer::Writer};
use bacport_core::npdu::Npdu;
use bacport_core::services::{
    IAmRequest, ReadPropertyAck, ReadPropertyRequest, WhoIsRequest, WritePropertyRequest,
    SERVICE_I_AM, SERVICE_READ_PROPERTY, SERVICE_WRITE_PROPERTY,
};
use bacport_core::types::{ObjectId, ObjectType, PropertyId, TagValue};
use bacport_datalink::{BacnetIpTransport, DataLink, DataLinkError, MAX_BIP_FRAME_LEN};

use crate::device::Device;
use crate::error::ClientError;
use crate::value::{PresentValue, PropertyValue};

/// BACnet command priority used for writes unless overridden.
///
/// Priority 8 is the manual-operator slot, below life-safety and critical
/// equipment control but above scheduling.
pub const DEFAULT_WRITE_PRIORITY: u8 = 8;

/// Tuning knobs for the transaction engine and the discovery windows.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Send attempts per confirmed transaction, minimum 1.
    pub attempts: u8,
    /// How long each attempt waits for a matching ack.
    pub attempt_timeout: Duration,
    /// A full sweep ends once this long passes without a new I-Am.
    pub discovery_idle_window: Duration,
    /// Hard upper bound on a full sweep, busy networks included.
    pub discovery_budget: Duration,
    /// How long a targeted lookup waits for its device to answer.
    pub targeted_budget: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            attempts: 2,
            attempt_timeout: Duration::from_millis(200),
            discovery_idle_window: Duration::from_secs(3),
            discovery_budget: Duration::from_secs(15),
            targeted_budget: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_discovery_idle_window(mut self, window: Duration) -> Self {
        self.discovery_idle_window = window;
        self
    }

    pub fn with_discovery_budget(mut self, budget: Duration) -> Self {
        self.discovery_budget = budget;
        self
    }

    pub fn with_targeted_budget(mut self, budget: Duration) -> Self {
        self.targeted_budget = budget;
        self
    }
}

/// Async BACnet/IP client for device discovery and present-value access.
///
/// One discovery sweep or confirmed transaction runs at a time; concurrent
/// calls from other tasks queue on an internal lock, so a single client
/// can be shared behind an `Arc`. Invoke IDs come from one wrapping
/// eight-bit counter across all services.
pub struct BacnetClient<D: DataLink> {
    datalink: D,
    config: ClientConfig,
    invoke_id: Mutex<u8>,
    registry: Mutex<Vec<Device>>,
    request_io_lock: Mutex<()>,
    retries: AtomicU64,
}

impl BacnetClient<BacnetIpTransport> {
    /// Binds the standard two-socket BACnet/IP transport and wraps it in
    /// a client with default tuning.
    pub async fn new() -> Result<Self, ClientError> {
        Ok(Self::with_datalink(BacnetIpTransport::bind().await?))
    }

    /// [`new`](Self::new) with explicit tuning.
    pub async fn new_with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_config(BacnetIpTransport::bind().await?, config))
    }
}

impl<D: DataLink> BacnetClient<D> {
    pub fn with_datalink(datalink: D) -> Self {
        Self::with_config(datalink, ClientConfig::default())
    }

    pub fn with_config(datalink: D, config: ClientConfig) -> Self {
        Self {
            datalink,
            config,
            invoke_id: Mutex::new(0),
            registry: Mutex::new(Vec::new()),
            request_io_lock: Mutex::new(()),
            retries: AtomicU64::new(0),
        }
    }

    /// Devices recorded by the last full sweep, in arrival order.
    pub async fn devices(&self) -> Vec<Device> {
        self.registry.lock().await.clone()
    }

    /// Count of transaction attempts that timed out and were sent again.
    pub fn retry_count(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Next invoke ID. A plain wrapping counter: all 256 values are used,
    /// 0 and 255 included.
    async fn next_invoke_id(&self) -> u8 {
        let mut counter = self.invoke_id.lock().await;
        let id = *counter;
        *counter = counter.wrapping_add(1);
        id
    }

    /// Waits for the next frame on either receive path. Devices answer a
    /// Who-Is broadcast-wide on the BACnet port or by unicasting straight
    /// back to the socket the request left from, so a sweep watches both.
    async fn recv_discovery(&self) -> Result<(Vec<u8>, SocketAddr), DataLinkError> {
        let mut broadcast_rx = [0u8; MAX_BIP_FRAME_LEN];
        let mut unicast_rx = [0u8; MAX_BIP_FRAME_LEN];
        tokio::select! {
            recv = self.datalink.recv_broadcast(&mut broadcast_rx) => {
                recv.map(|(len, src)| (broadcast_rx[..len].to_vec(), src))
            }
            recv = self.datalink.recv_unicast(&mut unicast_rx) => {
                recv.map(|(len, src)| (unicast_rx[..len].to_vec(), src))
            }
        }
    }

    /// Broadcasts a global Who-Is and collects I-Am replies until the
    /// network goes quiet.
    ///
    /// The collection window restarts on every accepted I-Am, so slow
    /// responders behind routers still make the list; the overall sweep is
    /// capped by [`ClientConfig::discovery_budget`]. The result replaces
    /// the registry served by [`devices`](Self::devices). Duplicate I-Ams
    /// are kept as they arrive.
    pub async fn discover(&self) -> Result<Vec<Device>, ClientError> {
        let _io = self.request_io_lock.lock().await;
        self.registry.lock().await.clear();

        let mut tx = [0u8; 16];
        let mut w = Writer::new(&mut tx);
        Npdu::global_broadcast().encode(&mut w)?;
        WhoIsRequest::global().encode(&mut w)?;
        self.datalink.send_broadcast(w.as_written()).await?;
        log::debug!("sent global Who-Is, collecting replies");

        let hard_deadline = Instant::now() + self.config.discovery_budget;
        let mut idle_deadline = Instant::now() + self.config.discovery_idle_window;

        loop {
            let deadline = idle_deadline.min(hard_deadline);
            let (frame, src) = match timeout_at(deadline, self.recv_discovery()).await {
                Err(_) => break,
                Ok(Err(err @ DataLinkError::Io(_))) => return Err(err.into()),
                Ok(Err(err)) => {
                    log::debug!("ignoring frame during discovery: {err}");
                    continue;
                }
                Ok(Ok(pair)) => pair,
            };
            let Some(device) = parse_i_am(&frame, src) else {
                continue;
            };
            log::debug!("I-Am: {device}");
            self.registry.lock().await.push(device);
            idle_deadline = Instant::now() + self.config.discovery_idle_window;
        }

        let devices = self.registry.lock().await.clone();
        log::info!("discovery sweep found {} device(s)", devices.len());
        Ok(devices)
    }

    /// Broadcasts a Who-Is limited to one instance and returns as soon as
    /// that device answers, or `None` once the targeted budget runs out.
    ///
    /// The device registry is left untouched; this is a point query.
    pub async fn discover_instance(&self, instance: u32) -> Result<Option<Device>, ClientError> {
        if instance > ObjectId::MAX_INSTANCE {
            return Err(ClientError::InvalidArgument("object instance exceeds 22 bits"));
        }
        let _io = self.request_io_lock.lock().await;

        let mut tx = [0u8; 16];
        let mut w = Writer::new(&mut tx);
        Npdu::global_broadcast().encode(&mut w)?;
        WhoIsRequest::for_instance(instance).encode(&mut w)?;
        self.datalink.send_broadcast(w.as_written()).await?;
        log::debug!("sent targeted Who-Is for instance {instance}");

        let deadline = Instant::now() + self.config.targeted_budget;
        loop {
            let (frame, src) = match timeout_at(deadline, self.recv_discovery()).await {
                Err(_) => return Ok(None),
                Ok(Err(err @ DataLinkError::Io(_))) => return Err(err.into()),
                Ok(Err(err)) => {
                    log::debug!("ignoring frame during discovery: {err}");
                    continue;
                }
                Ok(Ok(pair)) => pair,
            };
            match parse_i_am(&frame, src) {
                Some(device) if device.instance == instance => return Ok(Some(device)),
                _ => continue,
            }
        }
    }

    /// Runs a full sweep and picks the device with the given instance out
    /// of the result.
    pub async fn find_device(&self, instance: u32) -> Result<Option<Device>, ClientError> {
        let devices = self.discover().await?;
        Ok(devices.into_iter().find(|d| d.instance == instance))
    }

    /// Reads the present value of one object.
    ///
    /// `value` is `None` when every attempt went unanswered or the reply
    /// carried something other than a usable present value; the call only
    /// errs on transport or argument faults.
    pub async fn read_present_value(
        &self,
        device: &Device,
        object_type: ObjectType,
        instance: u32,
    ) -> Result<PropertyValue, ClientError> {
        let endpoint = device.endpoint.ok_or(ClientError::DeviceUnreachable)?;
        if instance > ObjectId::MAX_INSTANCE {
            return Err(ClientError::InvalidArgument("object instance exceeds 22 bits"));
        }

        let invoke_id = self.next_invoke_id().await;
        let request = ReadPropertyRequest {
            object_id: ObjectId::new(object_type, instance),
            property_id: PropertyId::PresentValue,
            array_index: None,
            invoke_id,
        };
        let mut tx = [0u8; 96];
        let mut w = Writer::new(&mut tx);
        npdu_for(device).encode(&mut w)?;
        request.encode(&mut w)?;

        let Some(payload) = self
            .confirmed_transaction(
                endpoint,
                w.as_written(),
                invoke_id,
                SERVICE_READ_PROPERTY,
                ApduType::ComplexAck,
            )
            .await?
        else {
            return Ok(PropertyValue::unread(object_type, instance));
        };

        let mut r = Reader::new(&payload);
        let value = match ReadPropertyAck::decode_after_header(&mut r) {
            Ok(ack) => PresentValue::decode_for(object_type, ack.value),
            Err(err) => {
                log::warn!("unusable ReadProperty ack from {endpoint}: {err}");
                None
            }
        };
        Ok(PropertyValue {
            object_type,
            instance,
            value,
        })
    }

    /// Commands a present value at the default priority.
    ///
    /// When the write goes unanswered, the point is prodded out of service
    /// (a best-effort write of true to its OutOfService property) and the
    /// original write is retried exactly once. Returns `Ok(false)` when
    /// the device never acknowledged.
    pub async fn write_present_value(
        &self,
        device: &Device,
        object_type: ObjectType,
        instance: u32,
        value: PresentValue,
    ) -> Result<bool, ClientError> {
        self.write_present_value_with_priority(
            device,
            object_type,
            instance,
            value,
            DEFAULT_WRITE_PRIORITY,
        )
        .await
    }

    /// Same as [`write_present_value`](Self::write_present_value) at an
    /// explicit command priority. Priorities run 1 (highest) to 16.
    ///
    /// The out-of-service prod in the fallback sequence carries no
    /// priority tag of its own. Some client stacks attach the command
    /// priority to that write, so packet captures of the middle request
    /// differ between implementations.
    pub async fn write_present_value_with_priority(
        &self,
        device: &Device,
        object_type: ObjectType,
        instance: u32,
        value: PresentValue,
        priority: u8,
    ) -> Result<bool, ClientError> {
        if self
            .write_once(device, object_type, instance, value, priority)
            .await?
        {
            return Ok(true);
        }

        log::info!(
            "write to {object_type:?} {instance} on {device} unacknowledged, prodding out-of-service"
        );
        if !self.write_out_of_service(device, object_type, instance).await? {
            log::debug!("out-of-service prod went unanswered");
        }
        self.write_once(device, object_type, instance, value, priority)
            .await
    }

    /// Plain write without the out-of-service fallback.
    ///
    /// Some controllers refuse or misbehave on OutOfService writes; this
    /// variant sends the write alone and reports the outcome.
    pub async fn write_present_value_no_fallback(
        &self,
        device: &Device,
        object_type: ObjectType,
        instance: u32,
        value: PresentValue,
        priority: u8,
    ) -> Result<bool, ClientError> {
        self.write_once(device, object_type, instance, value, priority)
            .await
    }

    async fn write_once(
        &self,
        device: &Device,
        object_type: ObjectType,
        instance: u32,
        value: PresentValue,
        priority: u8,
    ) -> Result<bool, ClientError> {
        let endpoint = device.endpoint.ok_or(ClientError::DeviceUnreachable)?;
        if !(1..=16).contains(&priority) {
            return Err(ClientError::InvalidArgument("write priority must be 1..=16"));
        }
        if instance > ObjectId::MAX_INSTANCE {
            return Err(ClientError::InvalidArgument("object instance exceeds 22 bits"));
        }

        let invoke_id = self.next_invoke_id().await;
        let request = WritePropertyRequest {
            object_id: ObjectId::new(object_type, instance),
            property_id: PropertyId::PresentValue,
            value: value.to_tag_value(),
            array_index: None,
            priority: Some(priority),
            invoke_id,
        };
        let mut tx = [0u8; 96];
        let mut w = Writer::new(&mut tx);
        npdu_for(device).encode(&mut w)?;
        request.encode(&mut w)?;

        Ok(self
            .confirmed_transaction(
                endpoint,
                w.as_written(),
                invoke_id,
                SERVICE_WRITE_PROPERTY,
                ApduType::SimpleAck,
            )
            .await?
            .is_some())
    }

    /// Writes true to the point's OutOfService property, releasing it from
    /// local automatic control. No command priority applies; OutOfService
    /// is not a commandable property.
    async fn write_out_of_service(
        &self,
        device: &Device,
        object_type: ObjectType,
        instance: u32,
    ) -> Result<bool, ClientError> {
        let endpoint = device.endpoint.ok_or(ClientError::DeviceUnreachable)?;

        let invoke_id = self.next_invoke_id().await;
        let request = WritePropertyRequest {
            object_id: ObjectId::new(object_type, instance),
            property_id: PropertyId::OutOfService,
            value: TagValue::from_bool(true),
            array_index: None,
            priority: None,
            invoke_id,
        };
        let mut tx = [0u8; 96];
        let mut w = Writer::new(&mut tx);
        npdu_for(device).encode(&mut w)?;
        request.encode(&mut w)?;

        Ok(self
            .confirmed_transaction(
                endpoint,
                w.as_written(),
                invoke_id,
                SERVICE_WRITE_PROPERTY,
                ApduType::SimpleAck,
            )
            .await?
            .is_some())
    }

    /// Sends one confirmed request and waits for its ack, resending on
    /// timeout up to the configured attempt count.
    ///
    /// Returns the bytes following the ack header (empty for a simple
    /// ack), or `None` once every attempt has gone unanswered. Frames on
    /// the unicast path that do not match the outstanding invoke ID and
    /// service are dropped; errors, rejects and aborts fall under the
    /// same rule and surface as a timeout.
    async fn confirmed_transaction(
        &self,
        endpoint: SocketAddr,
        frame: &[u8],
        invoke_id: u8,
        service_choice: u8,
        expect: ApduType,
    ) -> Result<Option<Vec<u8>>, ClientError> {
        let _io = self.request_io_lock.lock().await;

        // The builder floors attempts at one; a literal config can hold zero.
        let attempts = self.config.attempts.max(1);
        for attempt in 1..=attempts {
            self.datalink.send_unicast(endpoint, frame).await?;
            log::trace!(
                "invoke {invoke_id} service 0x{service_choice:02X} attempt {attempt} to {endpoint}"
            );

            let deadline = Instant::now() + self.config.attempt_timeout;
            loop {
                let mut rx = [0u8; MAX_BIP_FRAME_LEN];
                let (len, src) =
                    match timeout_at(deadline, self.datalink.recv_unicast(&mut rx)).await {
                        Err(_) => break,
                        Ok(Err(err @ DataLinkError::Io(_))) => return Err(err.into()),
                        Ok(Err(err)) => {
                            log::debug!("ignoring frame on the ack path: {err}");
                            continue;
                        }
                        Ok(Ok(pair)) => pair,
                    };
                if src != endpoint {
                    continue;
                }
                if let Some(payload) = match_ack(&rx[..len], invoke_id, service_choice, expect) {
                    return Ok(Some(payload));
                }
            }

            if attempt < attempts {
                self.retries.fetch_add(1, Ordering::Relaxed);
                log::debug!("invoke {invoke_id} timed out, resending");
            }
        }

        log::warn!(
            "invoke {invoke_id} service 0x{service_choice:02X} went unanswered by {endpoint}"
        );
        Ok(None)
    }
}

/// Request NPDU for a device: routed with a destination section when the
/// device sits behind a router, plain local otherwise.
fn npdu_for(device: &Device) -> Npdu {
    if device.requires_routing() {
        Npdu::routed_expecting_reply(device.npdu_destination())
    } else {
        Npdu::local_expecting_reply()
    }
}

/// Parses one received datagram as an I-Am and builds the device record.
/// Anything else, Who-Is echoes included, yields `None`.
fn parse_i_am(frame: &[u8], src: SocketAddr) -> Option<Device> {
    let mut r = Reader::new(frame);
    let npdu = Npdu::decode(&mut r).ok()?;
    if ApduType::from_first_byte(r.peek_u8().ok()?)? != ApduType::UnconfirmedRequest {
        return None;
    }
    let header = UnconfirmedRequestHeader::decode(&mut r).ok()?;
    if header.service_choice != SERVICE_I_AM {
        return None;
    }

    let mut body = r;
    match IAmRequest::decode_after_header(&mut body) {
        Ok(i_am) => Some(Device::discovered(
            src,
            i_am.device_id,
            i_am.vendor_id,
            npdu.source,
        )),
        // Some stacks truncate the I-Am body; settle for the device id.
        Err(_) => {
            let device_id = IAmRequest::decode_device_id(&mut r).ok()?;
            Some(Device::discovered(src, device_id, 0, npdu.source))
        }
    }
}

/// Matches one received frame against the outstanding transaction,
/// returning the bytes after the ack header when it belongs to it.
fn match_ack(frame: &[u8], invoke_id: u8, service_choice: u8, expect: ApduType) -> Option<Vec<u8>> {
    let mut r = Reader::new(frame);
    Npdu::decode(&mut r).ok()?;
    if ApduType::from_first_byte(r.peek_u8().ok()?)? != expect {
        return None;
    }
    match expect {
        ApduType::SimpleAck => {
            let ack = SimpleAck::decode(&mut r).ok()?;
            if ack.invoke_id != invoke_id || ack.service_choice != service_choice {
                return None;
            }
            Some(Vec::new())
        }
        ApduType::ComplexAck => {
            let ack = ComplexAckHeader::decode(&mut r).ok()?;
            if ack.invoke_id != invoke_id || ack.service_choice != service_choice {
                return None;
            }
            Some(r.read_exact(r.remaining()).ok()?.to_vec())
        }
        _ => None,
    }
}

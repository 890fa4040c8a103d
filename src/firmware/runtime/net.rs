//! Wi-Fi association and the broker session task. The session task owns the
//! TCP socket and MQTT client; the control loop talks to it exclusively
//! through `BUS_COMMANDS` and reads link state back from atomics.

use core::sync::atomic::Ordering;

use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_net::{
    dns::DnsQueryType, tcp::TcpSocket, Config as NetConfig, IpAddress, Stack, StackResources,
};
use embassy_time::{Duration, Timer};
use embedded_io_async::{ErrorType, Read, Write};
use esp_println::println;
use heapless::Vec;
use rust_mqtt::{
    client::{
        client::MqttClient,
        client_config::{ClientConfig, MqttVersion},
    },
    packet::v5::publish_packet::QualityOfService,
    utils::rng_generator::CountingRng,
};
use static_cell::StaticCell;

use crate::firmware::config::{BusIdentity, BROKER_PORT, DEFAULT_SUBSCRIBE_TOPIC};
use crate::firmware::link::MessageBus;
use crate::firmware::types::bounded_topic;

use super::channels::{
    BusCommand, InboundMessage, BUS_COMMANDS, BUS_CONNECTED, INBOUND_MESSAGES, NETWORK_CONNECTED,
    PAYLOAD_MAX,
};

const KEEP_ALIVE_SECS: u16 = 60;
const PING_INTERVAL_SECS: u64 = 30;

static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
static NET_STACK: StaticCell<Stack<'static>> = StaticCell::new();

/// Control-loop side of the broker link. A dial request only nudges the
/// session task, so `connect` reports the outcome of the previous attempt;
/// the bounded retry cycle driving it already tolerates that lag.
pub(crate) struct QueuedBus;

impl MessageBus for QueuedBus {
    fn is_connected(&self) -> bool {
        BUS_CONNECTED.load(Ordering::Relaxed)
    }

    fn connect(&mut self, _client_id: &str, _username: &str) -> bool {
        let _ = BUS_COMMANDS.try_send(BusCommand::Dial);
        BUS_CONNECTED.load(Ordering::Relaxed)
    }

    fn subscribe(&mut self, topic: &str) -> bool {
        BUS_COMMANDS
            .try_send(BusCommand::Subscribe {
                topic: bounded_topic(topic),
            })
            .is_ok()
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        let take = payload.len().min(PAYLOAD_MAX);
        let Ok(payload) = Vec::from_slice(&payload[..take]) else {
            return false;
        };
        BUS_COMMANDS
            .try_send(BusCommand::Publish {
                topic: bounded_topic(topic),
                payload,
            })
            .is_ok()
    }
}

/// Points the session task at a new inbound topic after a portal rewrite.
pub(crate) fn request_subscribe(topic: &str) {
    let _ = BUS_COMMANDS.try_send(BusCommand::Subscribe {
        topic: bounded_topic(topic),
    });
}

pub(crate) fn start(spawner: &Spawner, wifi: esp_hal::peripherals::WIFI<'static>) {
    let ssid = option_env!("WIFI_SSID").unwrap_or("");
    let pass = option_env!("WIFI_PASS").unwrap_or("");
    if ssid.is_empty() {
        println!("net: set WIFI_SSID/WIFI_PASS at build time to bring the radio up");
        return;
    }

    let radio = match esp_radio::init() {
        Ok(radio) => radio,
        Err(e) => {
            println!("net: radio init failed: {e:?}");
            return;
        }
    };
    let radio: &'static _ = alloc::boxed::Box::leak(alloc::boxed::Box::new(radio));

    let (wifi, ifaces) =
        match esp_radio::wifi::new(radio, wifi, esp_radio::wifi::Config::default()) {
            Ok(parts) => parts,
            Err(e) => {
                println!("net: wifi init failed: {e:?}");
                return;
            }
        };
    let client = esp_radio::wifi::ClientConfig::default()
        .with_ssid(ssid.into())
        .with_password(pass.into());

    let resources = STACK_RESOURCES.init(StackResources::new());
    let (stack, runner) = embassy_net::new(
        ifaces.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        embassy_time::Instant::now().as_millis(),
    );
    let stack = NET_STACK.init(stack);

    spawner.must_spawn(net_runner_task(runner));
    spawner.must_spawn(wifi_task(wifi, client, stack));
    spawner.must_spawn(broker_task(stack));
}

#[embassy_executor::task]
async fn net_runner_task(
    mut runner: embassy_net::Runner<'static, esp_radio::wifi::WifiDevice<'static>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn wifi_task(
    mut wifi: esp_radio::wifi::WifiController<'static>,
    client: esp_radio::wifi::ClientConfig,
    stack: &'static Stack<'static>,
) {
    if let Err(e) = wifi.set_config(&esp_radio::wifi::ModeConfig::Client(client)) {
        println!("net: wifi set_config failed: {e:?}");
        return;
    }
    if let Err(e) = wifi.start() {
        println!("net: wifi start failed: {e:?}");
        return;
    }
    if let Err(e) = wifi.connect() {
        println!("net: wifi connect failed: {e:?}");
        return;
    }

    wait_associated(&mut wifi).await;
    while !stack.is_config_up() {
        Timer::after(Duration::from_millis(100)).await;
    }
    NETWORK_CONNECTED.store(true, Ordering::Relaxed);
    println!("net: associated, dhcp lease up");

    loop {
        Timer::after(Duration::from_secs(5)).await;
        if !wifi.is_connected().unwrap_or(true) {
            NETWORK_CONNECTED.store(false, Ordering::Relaxed);
            println!("net: association lost, reconnecting");
            if wifi.connect().is_ok() {
                wait_associated(&mut wifi).await;
                NETWORK_CONNECTED.store(true, Ordering::Relaxed);
                println!("net: reassociated");
            }
        }
    }
}

async fn wait_associated(wifi: &mut esp_radio::wifi::WifiController<'static>) {
    while !wifi.is_connected().unwrap_or(false) {
        Timer::after(Duration::from_millis(100)).await;
    }
}

/// One owned step of the session loop; borrows from the client's receive
/// buffer are dropped before the step is applied.
enum SessionStep {
    Command(BusCommand),
    Ping,
    Idle,
    Lost,
}

#[embassy_executor::task]
async fn broker_task(stack: &'static Stack<'static>) {
    let broker = option_env!("MQTT_HOST").unwrap_or("");
    let identity = BusIdentity::defaults();
    let mut subscribe_topic = bounded_topic(DEFAULT_SUBSCRIBE_TOPIC);

    if broker.is_empty() {
        println!("bus: set MQTT_HOST at build time to enable the broker link");
        // Keep draining so the command queue never backs up.
        loop {
            let _ = BUS_COMMANDS.receive().await;
        }
    }

    loop {
        // Idle until the control loop asks for a dial; topic rewrites are
        // absorbed meanwhile, triggers have nowhere to go yet.
        loop {
            match BUS_COMMANDS.receive().await {
                BusCommand::Dial => break,
                BusCommand::Subscribe { topic } => subscribe_topic = topic,
                BusCommand::Publish { .. } => {}
            }
        }

        let Some(address) = resolve_broker(stack, broker).await else {
            continue;
        };

        let mut tcp_rx = [0u8; 1024];
        let mut tcp_tx = [0u8; 1024];
        let mut socket = TcpSocket::new(*stack, &mut tcp_rx, &mut tcp_tx);
        if let Err(e) = socket.connect((address, BROKER_PORT)).await {
            println!("bus: tcp connect to {broker}:{BROKER_PORT} failed: {e:?}");
            continue;
        }

        let mut mqtt_config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(0));
        mqtt_config.add_client_id(identity.client_id);
        mqtt_config.keep_alive = KEEP_ALIVE_SECS;
        if !identity.username.is_empty() {
            mqtt_config.add_username(identity.username);
        }

        let mut recv_buffer = [0u8; 512];
        let mut write_buffer = [0u8; 512];
        let mut client = MqttClient::<_, 5, _>::new(
            BrokerLink::new(socket),
            &mut write_buffer,
            512,
            &mut recv_buffer,
            512,
            mqtt_config,
        );

        if let Err(code) = client.connect_to_broker().await {
            println!("bus: broker handshake failed: {code:?}");
            continue;
        }
        if let Err(code) = client.subscribe_to_topic(subscribe_topic.as_str()).await {
            println!("bus: subscribe failed: {code:?}");
            continue;
        }
        BUS_CONNECTED.store(true, Ordering::Relaxed);
        println!("bus: connected, subscribed to {}", subscribe_topic.as_str());

        loop {
            let step = match select3(
                BUS_COMMANDS.receive(),
                client.receive_message(),
                Timer::after(Duration::from_secs(PING_INTERVAL_SECS)),
            )
            .await
            {
                Either3::First(command) => SessionStep::Command(command),
                Either3::Second(Ok((topic, payload))) => {
                    forward_inbound(topic, payload);
                    SessionStep::Idle
                }
                Either3::Second(Err(code)) => {
                    println!("bus: receive failed: {code:?}");
                    SessionStep::Lost
                }
                Either3::Third(()) => SessionStep::Ping,
            };

            match step {
                SessionStep::Command(BusCommand::Dial) => {}
                SessionStep::Command(BusCommand::Subscribe { topic }) => {
                    subscribe_topic = topic;
                    if let Err(code) = client.subscribe_to_topic(subscribe_topic.as_str()).await {
                        println!("bus: resubscribe failed: {code:?}");
                        break;
                    }
                    println!("bus: subscribed to {}", subscribe_topic.as_str());
                }
                SessionStep::Command(BusCommand::Publish { topic, payload }) => {
                    if let Err(code) = client
                        .send_message(topic.as_str(), &payload, QualityOfService::QoS0, false)
                        .await
                    {
                        println!("bus: publish failed: {code:?}");
                        break;
                    }
                }
                SessionStep::Ping => {
                    if client.send_ping().await.is_err() {
                        break;
                    }
                }
                SessionStep::Idle => {}
                SessionStep::Lost => break,
            }
        }

        BUS_CONNECTED.store(false, Ordering::Relaxed);
        println!("bus: session closed");
    }
}

fn forward_inbound(topic: &str, payload: &[u8]) {
    let take = payload.len().min(PAYLOAD_MAX);
    let Ok(payload) = Vec::from_slice(&payload[..take]) else {
        return;
    };
    let message = InboundMessage {
        topic: bounded_topic(topic),
        payload,
    };
    if INBOUND_MESSAGES.try_send(message).is_err() {
        println!("bus: inbound mailbox full, delivery dropped");
    }
}

async fn resolve_broker(stack: &'static Stack<'static>, host: &str) -> Option<IpAddress> {
    if let Ok(address) = host.parse::<core::net::Ipv4Addr>() {
        return Some(IpAddress::Ipv4(address));
    }
    match stack.dns_query(host, DnsQueryType::A).await {
        Ok(addresses) => addresses.first().copied(),
        Err(e) => {
            println!("bus: dns lookup for {host} failed: {e:?}");
            None
        }
    }
}

struct BrokerLink<'a> {
    socket: TcpSocket<'a>,
}

impl<'a> BrokerLink<'a> {
    fn new(socket: TcpSocket<'a>) -> Self {
        Self { socket }
    }
}

impl ErrorType for BrokerLink<'_> {
    type Error = embassy_net::tcp::Error;
}

impl Read for BrokerLink<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.socket.read(buf).await
    }
}

impl Write for BrokerLink<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.socket.write(buf).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.socket.flush().await
    }
}

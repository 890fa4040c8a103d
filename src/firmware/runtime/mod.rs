//! Board bring-up and the cooperative control loop. All controller state is
//! mutated from the single tick task; the radio tasks only feed the mailbox
//! statics in `channels`.

mod bench;
mod channels;
#[cfg(feature = "net-mqtt")]
mod net;
mod touch_pad;

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Ticker, Timer};
use esp_hal::{
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    timer::timg::TimerGroup,
    touch::Touch,
};
use esp_println::println;
use static_cell::StaticCell;

use crate::firmware::{
    config::{default_topics, BusIdentity, ControllerConfig},
    controller::{Controller, Services},
    link::{mode::StartupAssociation, NetworkLink},
    telemetry,
};

#[cfg(not(feature = "net-mqtt"))]
use self::bench::LoggerBus;
use self::{
    bench::{AtomicNetwork, ImmediatePortal, LedActuator},
    channels::INBOUND_MESSAGES,
    touch_pad::{PadProbe, TouchProbe},
};

#[cfg(feature = "net-mqtt")]
use crate::firmware::types::TOPIC_MAX;
#[cfg(feature = "net-mqtt")]
use heapless::String;

/// Control-loop cadence. Well under the 50 ms debounce window, so no edge
/// can slip between ticks.
const TICK_MS: u64 = 20;

/// Counter summary on the UART roughly every five minutes.
const TELEMETRY_REPORT_TICKS: u32 = 15_000;

static TOUCH: StaticCell<Touch<'static>> = StaticCell::new();

pub async fn run(spawner: Spawner) -> ! {
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    #[cfg(feature = "net-mqtt")]
    esp_alloc::heap_allocator!(size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    println!("touchlink: boot");

    let led = Output::new(peripherals.GPIO18, Level::Low, OutputConfig::default());
    let mut actuator = LedActuator::new(led);

    let touch = TOUCH.init(Touch::continuous_mode(peripherals.TOUCH, None));
    let mut probe = PadProbe::new(touch, peripherals.GPIO32);

    #[cfg(feature = "net-mqtt")]
    net::start(&spawner, peripherals.WIFI);

    // Without the radio stack the link reads as associated, so the online
    // paths run against the log-only bus.
    #[cfg(not(feature = "net-mqtt"))]
    {
        let _ = &spawner;
        channels::NETWORK_CONNECTED.store(true, core::sync::atomic::Ordering::Relaxed);
        println!("link: log-only mode active (enable net-mqtt for the real transport)");
    }

    let config = ControllerConfig::defaults().sanitized();
    let boot = Instant::now();
    let mut network = AtomicNetwork;

    // Bounded wait for the auto-connect association before committing to a
    // mode for this power cycle.
    let startup = StartupAssociation::new(0, config.startup_assoc_window_ms);
    let initial_mode = loop {
        let now_ms = boot.elapsed().as_millis();
        if let Some(mode) = startup.poll(now_ms, network.is_connected()) {
            break mode;
        }
        Timer::after(Duration::from_millis(config.startup_assoc_poll_ms)).await;
    };
    println!("link: startup resolved {}", initial_mode.as_str());

    let mut controller = Controller::new(
        config,
        BusIdentity::defaults(),
        default_topics(),
        initial_mode,
    );

    #[cfg(feature = "net-mqtt")]
    let mut bus = net::QueuedBus;
    #[cfg(not(feature = "net-mqtt"))]
    let mut bus = LoggerBus;
    let mut portal = ImmediatePortal::new();

    let mut lamp_was_on = controller.lamp_is_on();
    let mut last_mode = controller.mode();
    #[cfg(feature = "net-mqtt")]
    let mut subscribed: String<TOPIC_MAX> = controller.topics().subscribe_topic.clone();

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    let mut ticks: u32 = 0;
    loop {
        ticker.next().await;
        let now_ms = boot.elapsed().as_millis();

        // Drain deliveries queued by the transport since the last tick. The
        // controller only flags them; the toggle happens on its tick path.
        while let Ok(message) = INBOUND_MESSAGES.try_receive() {
            controller.notify_inbound(message.topic.as_str(), &message.payload);
        }

        let raw = probe.read_raw();
        let mut services = Services {
            network: &mut network,
            bus: &mut bus,
            portal: &mut portal,
            actuator: &mut actuator,
        };
        controller.tick(now_ms, raw, &mut services);

        if controller.lamp_is_on() != lamp_was_on {
            lamp_was_on = controller.lamp_is_on();
            println!("lamp: {}", if lamp_was_on { "on" } else { "off" });
        }
        if controller.mode() != last_mode {
            last_mode = controller.mode();
            println!("link: mode {}", last_mode.as_str());
        }

        // Mirror portal reconfiguration to the session task.
        #[cfg(feature = "net-mqtt")]
        if controller.topics().subscribe_topic != subscribed {
            subscribed = controller.topics().subscribe_topic.clone();
            net::request_subscribe(subscribed.as_str());
        }

        ticks = ticks.wrapping_add(1);
        if ticks % TELEMETRY_REPORT_TICKS == 0 {
            let t = telemetry::snapshot();
            println!(
                "telemetry: taps={} long={} ext={} dials={} dial_err={} inbound={} echoes={} portal={}",
                t.gesture_taps,
                t.gesture_long_presses,
                t.gesture_extended_presses,
                t.bus_dial_attempts,
                t.bus_dial_failures,
                t.inbound_messages,
                t.echoes_fired,
                t.portal_runs
            );
        }
    }
}

// Steckdose: schaltet ein Relais nach der PV-Leistung der Wechselrichter-Bridge
// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use defmt::info;
use home_core::socket::SocketController;
use home_firmware::config::{
    EXTRA_HEAP_SIZE, SOCKET_NAME, SOCKET_RELAY_GPIO_PIN, SOCKET_SWITCH_MODE, WIFI_HEAP_SIZE,
};
use home_firmware::hal::GpioRelay;
use home_firmware::network::start_network;
use home_firmware::tasks::{socket_http_task, socket_task, status_led_task};
use home_firmware::{ActivityWatch, LinkWatch, SharedSocket};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Relais und WiFi, spawnt alle Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!(
        "Socket: '{}' starting ({} mode, relay on GPIO{})",
        SOCKET_NAME,
        SOCKET_SWITCH_MODE.as_str(),
        SOCKET_RELAY_GPIO_PIN
    );

    // Relais startet aus
    let relay = GpioRelay::new(Output::new(
        peripherals.GPIO5,
        Level::Low,
        OutputConfig::default(),
    ));

    // Steckdose (geteilt zwischen Abfrage und HTTP)
    static SOCKET: StaticCell<SharedSocket> = StaticCell::new();
    let socket = &*SOCKET.init(SharedSocket::new(SocketController::new(
        SOCKET_SWITCH_MODE,
        relay,
    )));

    // WLAN-Status (WiFi → Status-LED + Steckdose)
    static LINK: StaticCell<LinkWatch> = StaticCell::new();
    let link = &*LINK.init(LinkWatch::new());

    // Die Steckdose meldet keine lokale Aktivität
    static ACTIVITY: StaticCell<ActivityWatch> = StaticCell::new();
    let activity = &*ACTIVITY.init(ActivityWatch::new());

    spawner
        .spawn(status_led_task(
            peripherals.GPIO8,
            peripherals.RMT,
            link.receiver().unwrap(),
            activity.receiver().unwrap(),
        ))
        .unwrap();

    // Spawn WiFi Tasks
    let stack = start_network(&spawner, peripherals.WIFI, link.sender());

    spawner
        .spawn(socket_task(stack, socket, link.receiver().unwrap()))
        .unwrap();

    for task_id in 0..2 {
        spawner
            .spawn(socket_http_task(task_id, stack, socket))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

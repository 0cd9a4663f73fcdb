// Wechselrichter-Bridge: serielles Protokoll → HTTP
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
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use home_core::inverter::Inverter;
use home_firmware::config::{
    EXTRA_HEAP_SIZE, INVERTER_BAUDRATE, INVERTER_TIMEOUT_MS, WIFI_HEAP_SIZE,
};
use home_firmware::hal::UartInverterLink;
use home_firmware::network::start_network;
use home_firmware::tasks::{inverter_http_task, sntp_task};
use home_firmware::{LinkWatch, SharedClock, SharedInverter};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert UART1 (TX GPIO10, RX GPIO11) und WiFi, spawnt
/// SNTP und HTTP Tasks.
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

    // Wechselrichter: 2400 Baud, 8N1
    let uart = Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(INVERTER_BAUDRATE),
    )
    .expect("Failed to configure UART1")
    .with_tx(peripherals.GPIO10)
    .with_rx(peripherals.GPIO11)
    .into_async();

    static INVERTER: StaticCell<SharedInverter> = StaticCell::new();
    let inverter = &*INVERTER.init(SharedInverter::new(Inverter::new(UartInverterLink::new(
        uart,
        Duration::from_millis(INVERTER_TIMEOUT_MS),
    ))));

    // Uhrzeit für die Energie-Statistik (leer bis zur ersten SNTP-Antwort)
    static CLOCK: StaticCell<SharedClock> = StaticCell::new();
    let clock = &*CLOCK.init(SharedClock::new(None));

    static LINK: StaticCell<LinkWatch> = StaticCell::new();
    let link = &*LINK.init(LinkWatch::new());

    // Spawn WiFi Tasks
    let stack = start_network(&spawner, peripherals.WIFI, link.sender());

    spawner.spawn(sntp_task(stack, clock)).unwrap();

    // Spawn HTTP Server Tasks (2x, der Wechselrichter ist ohnehin seriell)
    for task_id in 0..2 {
        spawner
            .spawn(inverter_http_task(task_id, stack, inverter, clock))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

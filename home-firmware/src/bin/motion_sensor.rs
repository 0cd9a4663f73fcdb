// Bewegungsmelder: PIR-Sensor, meldet an den LED-Server
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
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use defmt::info;
use home_firmware::config::{EXTRA_HEAP_SIZE, MOTION_SENSOR_NAME, PIR_GPIO_PIN, WIFI_HEAP_SIZE};
use home_firmware::network::start_network;
use home_core::motion::MotionStatus;
use home_firmware::tasks::{motion_http_task, pir_task, reporter_task, status_led_task};
use home_firmware::{ActivityWatch, LinkWatch, MotionChannel, SharedMotionStatus};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert PIR-Eingang und WiFi, spawnt alle Tasks
/// (PIR, Reporter, Status-LED, HTTP-Statusseite).
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
        "Motion: Sensor '{}' starting (PIR on GPIO{})",
        MOTION_SENSOR_NAME, PIR_GPIO_PIN
    );

    // PIR-Ausgang ist aktiv-high, Pull-down hält den Pegel ohne Sensor stabil
    let pir = Input::new(
        peripherals.GPIO5,
        InputConfig::default().with_pull(Pull::Down),
    );

    // Bewegungs-Ereignisse (PIR → Reporter)
    static MOTION_CHANNEL: StaticCell<MotionChannel> = StaticCell::new();
    let motion_channel = &*MOTION_CHANNEL.init(MotionChannel::new());

    // WLAN-Status (WiFi → Status-LED + Reporter)
    static LINK: StaticCell<LinkWatch> = StaticCell::new();
    let link = &*LINK.init(LinkWatch::new());

    // Bewegung (PIR → Status-LED)
    static ACTIVITY: StaticCell<ActivityWatch> = StaticCell::new();
    let activity = &*ACTIVITY.init(ActivityWatch::new());

    // Zustand für die Statusseite (PIR + Reporter → HTTP)
    static STATUS: StaticCell<SharedMotionStatus> = StaticCell::new();
    let status = &*STATUS.init(SharedMotionStatus::new(MotionStatus::new()));

    spawner
        .spawn(status_led_task(
            peripherals.GPIO8,
            peripherals.RMT,
            link.receiver().unwrap(),
            activity.receiver().unwrap(),
        ))
        .unwrap();

    spawner
        .spawn(pir_task(pir, motion_channel.sender(), activity.sender(), status))
        .unwrap();

    // Spawn WiFi Tasks
    let stack = start_network(&spawner, peripherals.WIFI, link.sender());

    spawner
        .spawn(reporter_task(
            stack,
            motion_channel.receiver(),
            link.receiver().unwrap(),
            status,
        ))
        .unwrap();

    for task_id in 0..2 {
        spawner
            .spawn(motion_http_task(task_id, stack, status))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

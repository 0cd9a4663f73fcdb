// LED-Server: LED-Streifen mit Bewegungsautomatik und HTTP-API
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
use esp_hal::ledc::channel::Number;
use esp_hal::ledc::timer::Timer as LedcTimer;
use esp_hal::ledc::{Ledc, LowSpeed};
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use home_core::automation::{AutomationEngine, AutomationSettings};
use home_firmware::config::{EXTRA_HEAP_SIZE, ITEMS, WIFI_HEAP_SIZE};
use home_firmware::hal::LedcDimmer;
use home_firmware::hal::ledc_dimmer::configure_timer;
use home_firmware::network::start_network;
use home_firmware::tasks::{automation_task, dimmer_task, led_http_task, status_led_task};
use home_firmware::{ActivityWatch, DimmerChannel, LinkWatch, SharedAutomation};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert LEDC, Automatik und WiFi, spawnt alle Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
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

    // LEDC: ein Timer, ein Kanal pro LED-Streifen (Reihenfolge wie ITEMS)
    static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
    let ledc = LEDC.init(Ledc::new(peripherals.LEDC));

    static PWM_TIMER: StaticCell<LedcTimer<'static, LowSpeed>> = StaticCell::new();
    let pwm_timer = &*PWM_TIMER.init(configure_timer(ledc).expect("Failed to configure LEDC timer"));
    let ledc: &'static Ledc<'static> = ledc;

    let mut dimmer_output = LedcDimmer::new(ledc, pwm_timer);
    dimmer_output
        .add_channel(Number::Channel0, peripherals.GPIO2)
        .expect("Failed to configure LEDC channel 0");
    dimmer_output
        .add_channel(Number::Channel1, peripherals.GPIO3)
        .expect("Failed to configure LEDC channel 1");
    dimmer_output
        .add_channel(Number::Channel2, peripherals.GPIO4)
        .expect("Failed to configure LEDC channel 2");

    // Automatik-Zustand (geteilt zwischen HTTP und Automatik Task)
    static ENGINE: StaticCell<SharedAutomation> = StaticCell::new();
    let engine = &*ENGINE.init(SharedAutomation::new(
        AutomationEngine::new(ITEMS, AutomationSettings::default())
            .expect("Invalid item configuration"),
    ));

    // Dimmer-Channel (Automatik + HTTP → Dimmer)
    static DIMMER_CHANNEL: StaticCell<DimmerChannel> = StaticCell::new();
    let dimmer_channel = &*DIMMER_CHANNEL.init(DimmerChannel::new());

    // WLAN-Status (WiFi → Status-LED + Automatik)
    static LINK: StaticCell<LinkWatch> = StaticCell::new();
    let link = &*LINK.init(LinkWatch::new());

    // Der LED-Server meldet keine lokale Aktivität
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

    spawner
        .spawn(dimmer_task(dimmer_output, dimmer_channel.receiver()))
        .unwrap();

    spawner
        .spawn(automation_task(
            engine,
            dimmer_channel.sender(),
            link.receiver().unwrap(),
        ))
        .unwrap();

    // Spawn WiFi Tasks
    let stack = start_network(&spawner, peripherals.WIFI, link.sender());

    // Spawn HTTP Server Tasks (4x für concurrent connections)
    for task_id in 0..4 {
        spawner
            .spawn(led_http_task(
                task_id,
                stack,
                engine,
                dimmer_channel.sender(),
            ))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

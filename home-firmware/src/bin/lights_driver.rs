// Lichtsteuerung: dimmbare Lichter (Aquarium, Pflanzen) nach Tageszeit
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
use esp_hal::delay::Delay;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::ledc::channel::Number;
use esp_hal::ledc::timer::Timer as LedcTimer;
use esp_hal::ledc::{Ledc, LowSpeed};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use home_core::lights::{LightSchedule, LightsController};
use home_firmware::config::{
    EEPROM_ADDRESS, EEPROM_CAPACITY, EXTRA_HEAP_SIZE, LIGHT_CHANNELS, LIGHT_DAY_END_HOUR,
    LIGHT_DAY_START_HOUR, WIFI_HEAP_SIZE,
};
use home_firmware::hal::ledc_dimmer::configure_timer;
use home_firmware::hal::{Eeprom24, LedcDimmer};
use home_firmware::network::start_network;
use home_firmware::tasks::{lights_http_task, lights_task, sntp_task, status_led_task};
use home_firmware::{ActivityWatch, LightsSignal, LinkWatch, SharedClock, SharedLights};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Pinbelegung:
/// - Lichter: GPIO2, GPIO3 (LEDC, Reihenfolge wie `LIGHT_NAMES`)
/// - EEPROM: SDA GPIO6, SCL GPIO7
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

    // LEDC: ein Timer, ein Kanal pro Licht
    static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
    let ledc = LEDC.init(Ledc::new(peripherals.LEDC));

    static PWM_TIMER: StaticCell<LedcTimer<'static, LowSpeed>> = StaticCell::new();
    let pwm_timer = &*PWM_TIMER.init(configure_timer(ledc).expect("Failed to configure LEDC timer"));
    let ledc: &'static Ledc<'static> = ledc;

    let mut light_outputs: LedcDimmer<LIGHT_CHANNELS> = LedcDimmer::new(ledc, pwm_timer);
    light_outputs
        .add_channel(Number::Channel0, peripherals.GPIO2)
        .expect("Failed to configure LEDC channel 0");
    light_outputs
        .add_channel(Number::Channel1, peripherals.GPIO3)
        .expect("Failed to configure LEDC channel 1");

    // Gespeicherte Helligkeit und Automatik aus dem EEPROM
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("Failed to configure I2C0")
    .with_sda(peripherals.GPIO6)
    .with_scl(peripherals.GPIO7);
    let eeprom = Eeprom24::new(i2c, Delay::new(), EEPROM_ADDRESS);

    let schedule = LightSchedule {
        start_hour: LIGHT_DAY_START_HOUR,
        end_hour: LIGHT_DAY_END_HOUR,
    };
    static LIGHTS: StaticCell<SharedLights> = StaticCell::new();
    let lights = &*LIGHTS.init(SharedLights::new(
        LightsController::new(eeprom, EEPROM_CAPACITY, LIGHT_CHANNELS, schedule)
            .expect("EEPROM too small for light settings"),
    ));

    // HTTP → Licht-Task
    static CHANGED: StaticCell<LightsSignal> = StaticCell::new();
    let changed = &*CHANGED.init(LightsSignal::new());

    // Uhrzeit für den Zeitplan (leer bis zur ersten SNTP-Antwort)
    static CLOCK: StaticCell<SharedClock> = StaticCell::new();
    let clock = &*CLOCK.init(SharedClock::new(None));

    static LINK: StaticCell<LinkWatch> = StaticCell::new();
    let link = &*LINK.init(LinkWatch::new());

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
        .spawn(lights_task(light_outputs, lights, clock, changed))
        .unwrap();

    // Spawn WiFi Tasks
    let stack = start_network(&spawner, peripherals.WIFI, link.sender());

    spawner.spawn(sntp_task(stack, clock)).unwrap();

    for task_id in 0..2 {
        spawner
            .spawn(lights_http_task(task_id, stack, lights, clock, changed))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

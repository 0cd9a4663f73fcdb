// UV-Box: Belichtungs-Timer mit Tastatur, Display und EEPROM
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

// Heap Allocator (picoserve/serde im Library-Teil sind mit `alloc` gebaut)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::spi::Mode;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use defmt::error;
use home_core::uvbox::UvBox;
use home_firmware::config::{DISPLAY_SPI_KHZ, EEPROM_ADDRESS, EEPROM_CAPACITY, EXTRA_HEAP_SIZE};
use home_firmware::hal::{Eeprom24, GpioUvOutputs, Pcd8544};
use home_firmware::tasks::uv_box_task;

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Pinbelegung:
/// - Tasten Hoch/Runter/Links/Rechts/Enter: GPIO0..GPIO4 (gegen GND)
/// - Relais UV-Röhren: GPIO5, Display-Beleuchtung: GPIO15 (low-aktiv)
/// - EEPROM: SDA GPIO6, SCL GPIO7
/// - PCD8544: SCK GPIO19, MOSI GPIO18, CS GPIO20, DC GPIO21, RST GPIO22
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Tasten mit internem Pull-up
    let key_config = InputConfig::default().with_pull(Pull::Up);
    let keys = [
        Input::new(peripherals.GPIO0, key_config),
        Input::new(peripherals.GPIO1, key_config),
        Input::new(peripherals.GPIO2, key_config),
        Input::new(peripherals.GPIO3, key_config),
        Input::new(peripherals.GPIO4, key_config),
    ];

    // Relais aus, Beleuchtung aus (low-aktiv)
    let outputs = GpioUvOutputs::new(
        Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO15, Level::High, OutputConfig::default()),
    );

    // EEPROM am I²C-Bus
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("Failed to configure I2C0")
    .with_sda(peripherals.GPIO6)
    .with_scl(peripherals.GPIO7);
    let eeprom = Eeprom24::new(i2c, Delay::new(), EEPROM_ADDRESS);

    let uv_box = UvBox::new(eeprom, EEPROM_CAPACITY, outputs).expect("EEPROM too small for settings");

    // Display am SPI-Bus
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_khz(DISPLAY_SPI_KHZ))
            .with_mode(Mode::_0),
    )
    .expect("Failed to configure SPI2")
    .with_sck(peripherals.GPIO19)
    .with_mosi(peripherals.GPIO18);
    let cs = Output::new(peripherals.GPIO20, Level::High, OutputConfig::default());
    let spi_device = ExclusiveDevice::new(spi, cs, Delay::new()).expect("Failed to set up SPI device");

    let mut display = Pcd8544::new(
        spi_device,
        Output::new(peripherals.GPIO21, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO22, Level::High, OutputConfig::default()),
    );
    if let Err(e) = display.init(&mut Delay::new()) {
        error!("UV: Display init failed: {}", e);
    }

    spawner.spawn(uv_box_task(uv_box, keys, display)).unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

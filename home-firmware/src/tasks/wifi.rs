// WiFi Task - Verbindet mit WLAN und managed Connection
use core::future::pending;

use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice};

use crate::LinkSender;
use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// WLAN-Zugangsdaten vorhanden
pub fn is_configured() -> bool {
    !WIFI_SSID.is_empty()
}

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Verbindet mit Access Point
/// - Holt IP-Adresse via DHCP
/// - Überwacht Verbindung und reconnected bei Bedarf
///
/// Ohne SSID bleibt der Task untätig, das Gerät gilt als unkonfiguriert.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    if !is_configured() {
        warn!("WiFi: No SSID configured, staying offline");
        pending::<()>().await;
    }

    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            // Configure WiFi station mode
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Scan for networks (optional, für Debugging)
        match controller
            .scan_with_config_async(ScanConfig::default())
            .await
        {
            Ok(ap_infos) => {
                info!("WiFi: Found {} access points", ap_infos.len());
                for ap_info in &ap_infos {
                    if ap_info.ssid.as_str() == WIFI_SSID {
                        info!(
                            "WiFi: Target AP found - SSID: {}, Signal: {} dBm",
                            WIFI_SSID, ap_info.signal_strength
                        );
                    }
                }
            }
            Err(e) => {
                warn!("WiFi: Scan failed: {}", Debug2Format(&e));
            }
        }

        // Connect to AP
        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }
        }

        // Wait for disconnect
        info!("WiFi: Waiting for disconnect event...");
        controller
            .wait_for_event(esp_radio::wifi::WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Link Monitor Task
///
/// Meldet den Netzwerk-Status an alle Interessenten:
/// - `true` sobald eine IP-Adresse per DHCP vorliegt
/// - `false` wenn die Konfiguration wieder verloren geht
#[embassy_executor::task]
pub async fn link_task(stack: &'static Stack<'static>, link_sender: LinkSender) {
    link_sender.send(false);

    loop {
        stack.wait_config_up().await;

        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            info!("  DNS:     {}", Debug2Format(&config.dns_servers));
        }
        link_sender.send(true);

        stack.wait_config_down().await;
        warn!("WiFi: Lost IP configuration");
        link_sender.send(false);
    }
}

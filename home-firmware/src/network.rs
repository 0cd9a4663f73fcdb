// Netzwerk-Start für die Images mit WLAN
//
// Initialisiert Funk, embassy-net Stack und die drei WLAN-Tasks.
// Der Heap muss vorher im `main` des Images angelegt sein.

use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use static_cell::StaticCell;

use crate::LinkSender;
use crate::tasks::{connection_task, link_task, net_task};

/// Sockets im Stack
/// Reicht für 4 HTTP-Listener + DNS + SNTP bzw. Meldungs-Client
pub const SOCKET_COUNT: usize = 8;

/// Startet WLAN und Netzwerk-Stack, liefert den Stack für weitere Tasks
///
/// Gespawnt werden:
/// - `connection_task` (Verbinden, Reconnect)
/// - `net_task` (Paketverarbeitung)
/// - `link_task` (DHCP-Status → `link_sender`)
pub fn start_network(
    spawner: &Spawner,
    wifi: WIFI<'static>,
    link_sender: LinkSender,
) -> &'static Stack<'static> {
    // WiFi Hardware initialisieren
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) = esp_radio::wifi::new(radio_init, wifi, Default::default())
        .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<SOCKET_COUNT>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(link_task(stack, link_sender)).unwrap();

    stack
}

// Serielle Verbindung zum Wechselrichter (UART, async)

use embassy_time::{Duration, with_timeout};
use esp_hal::Async;
use esp_hal::uart::Uart;
use home_core::InverterLink;
use home_core::inverter::{FrameAssembler, InverterError};

/// `InverterLink` über einen esp-hal UART
///
/// Jede Antwort muss innerhalb von `timeout` vollständig sein, auch wenn
/// sie in vielen kleinen Stücken eintrifft.
pub struct UartInverterLink {
    uart: Uart<'static, Async>,
    timeout: Duration,
}

impl UartInverterLink {
    pub fn new(uart: Uart<'static, Async>, timeout: Duration) -> Self {
        Self { uart, timeout }
    }
}

/// Liest bis einschließlich `\r`, ohne eigene Zeitgrenze
async fn read_until_end(
    uart: &mut Uart<'static, Async>,
    buf: &mut [u8],
) -> Result<usize, InverterError> {
    let mut frame = FrameAssembler::new();
    loop {
        let start = frame.filled();
        let received = uart
            .read_async(&mut buf[start..])
            .await
            .map_err(|_| InverterError::Io)?;

        if let Some(len) = frame.push(buf, received)? {
            return Ok(len);
        }
    }
}

impl InverterLink for UartInverterLink {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), InverterError> {
        let mut rest = data;
        while !rest.is_empty() {
            let written = self
                .uart
                .write_async(rest)
                .await
                .map_err(|_| InverterError::Io)?;
            rest = &rest[written..];
        }
        Ok(())
    }

    async fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, InverterError> {
        if buf.is_empty() {
            return Err(InverterError::Overflow);
        }
        // Eine Frist für den ganzen Frame
        with_timeout(self.timeout, read_until_end(&mut self.uart, buf))
            .await
            .map_err(|_| InverterError::Timeout)?
    }
}

//! PCD8544 (Nokia 5110) Display: 84×48 Pixel, monochrom, SPI
//!
//! Gezeichnet wird in einen RAM-Framebuffer (`DrawTarget<Color = BinaryColor>`),
//! `Pcd8544::flush` überträgt ihn komplett. Der Speicher des Controllers ist
//! in 6 Bänke zu je 8 Pixelzeilen organisiert, ein Byte = eine Spalte einer Bank.

use core::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use home_core::uvbox::TextScreen;

pub const DISPLAY_WIDTH_PX: usize = 84;
pub const DISPLAY_HEIGHT_PX: usize = 48;
const BANKS: usize = DISPLAY_HEIGHT_PX / 8;
const BUFFER_SIZE: usize = DISPLAY_WIDTH_PX * BANKS;

/// Zeichenraster des Textbildschirms
const CHAR_WIDTH_PX: i32 = 6;
const LINE_HEIGHT_PX: i32 = 8;

// Befehle (H = 0: Basis-Befehlssatz, H = 1: erweiterter Befehlssatz)
const CMD_FUNCTION_EXTENDED: u8 = 0x21;
const CMD_FUNCTION_BASIC: u8 = 0x20;
const CMD_SET_VOP: u8 = 0xB1;
const CMD_TEMP_COEFF: u8 = 0x04;
const CMD_BIAS: u8 = 0x14;
const CMD_DISPLAY_NORMAL: u8 = 0x0C;
const CMD_SET_X: u8 = 0x80;
const CMD_SET_Y: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    Spi,
    Pin,
}

impl defmt::Format for DisplayError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DisplayError::Spi => defmt::write!(fmt, "Display SPI error"),
            DisplayError::Pin => defmt::write!(fmt, "Display pin error"),
        }
    }
}

/// Framebuffer im Speicherformat des Controllers
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let index = (y / 8) * DISPLAY_WIDTH_PX + x;
        let mask = 1 << (y % 8);
        match color {
            BinaryColor::On => self.bytes[index] |= mask,
            BinaryColor::Off => self.bytes[index] &= !mask,
        }
    }

    /// Zeichnet einen `TextScreen` (6 Zeilen × 14 Zeichen)
    pub fn draw_screen(&mut self, screen: &TextScreen) {
        self.bytes = [0; BUFFER_SIZE];
        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);

        for (row, line) in screen.rows().enumerate() {
            let mut utf8 = [0u8; 4];
            for (col, c) in line.chars().enumerate() {
                if c == ' ' {
                    continue;
                }
                let position = Point::new(col as i32 * CHAR_WIDTH_PX, row as i32 * LINE_HEIGHT_PX);
                // Zeichnen in den RAM-Puffer kann nicht fehlschlagen
                let _ = Text::with_baseline(c.encode_utf8(&mut utf8), position, style, Baseline::Top)
                    .draw(self);
            }
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < DISPLAY_WIDTH_PX && (y as usize) < DISPLAY_HEIGHT_PX {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }
}

/// Treiber über ein `SpiDevice` (CS verwaltet das Device) und die D/C-Leitung
pub struct Pcd8544<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
}

impl<SPI: SpiDevice, DC: OutputPin, RST: OutputPin> Pcd8544<SPI, DC, RST> {
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Reset-Puls und Grundeinstellung (Kontrast, Bias, Normalmodus)
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;

        self.command(&[
            CMD_FUNCTION_EXTENDED,
            CMD_SET_VOP,
            CMD_TEMP_COEFF,
            CMD_BIAS,
            CMD_FUNCTION_BASIC,
            CMD_DISPLAY_NORMAL,
        ])
    }

    /// Überträgt den kompletten Framebuffer
    pub fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.command(&[CMD_SET_X, CMD_SET_Y])?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.spi.write(frame.as_bytes()).map_err(|_| DisplayError::Spi)
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(bytes).map_err(|_| DisplayError::Spi)
    }
}

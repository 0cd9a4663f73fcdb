// I²C-EEPROM (24C32/24C64) als `ByteStore` für die UV-Box
//
// 16-Bit Wortadresse, Seiten-Schreibzugriffe überschreiten nie eine
// Seitengrenze, nach jeder Seite wird der Schreibzyklus abgewartet.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;
use home_core::{ByteStore, StorageError};

use crate::config::{EEPROM_PAGE_SIZE, EEPROM_WRITE_CYCLE_MS};

pub struct Eeprom24<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Eeprom24<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    fn write_page(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        let mut frame: Vec<u8, { 2 + EEPROM_PAGE_SIZE }> = Vec::new();
        frame
            .extend_from_slice(&addr.to_be_bytes())
            .map_err(|_| StorageError::Io)?;
        frame.extend_from_slice(data).map_err(|_| StorageError::Io)?;

        self.i2c
            .write(self.address, &frame)
            .map_err(|_| StorageError::Io)?;
        self.delay.delay_ms(EEPROM_WRITE_CYCLE_MS);
        Ok(())
    }
}

impl<I2C: I2c, D: DelayNs> ByteStore for Eeprom24<I2C, D> {
    fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        self.i2c
            .write_read(self.address, &addr.to_be_bytes(), buf)
            .map_err(|_| StorageError::Io)
    }

    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        let mut cur_addr = addr as usize;
        let mut offset = 0;

        while offset < data.len() {
            let page_rem = EEPROM_PAGE_SIZE - cur_addr % EEPROM_PAGE_SIZE;
            let chunk_len = (data.len() - offset).min(page_rem);

            self.write_page(cur_addr as u16, &data[offset..offset + chunk_len])?;

            cur_addr += chunk_len;
            offset += chunk_len;
        }
        Ok(())
    }
}

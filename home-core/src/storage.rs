// Byte-gepackte Ablage von Einstellungen im EEPROM (UV-Box, Lichtsteuerung)
//
// Jede Einstellung registriert sich einmal und bekommt den nächsten freien
// Bereich. Die Reihenfolge der Registrierung bestimmt also das Layout.

use crate::traits::{ByteStore, StorageError};

/// Bereich einer registrierten Einstellung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId {
    offset: u16,
    len: u8,
}

impl SlotId {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct DataStorage<S: ByteStore> {
    store: S,
    capacity: u16,
    next: u16,
}

impl<S: ByteStore> DataStorage<S> {
    pub fn new(store: S, capacity: u16) -> Self {
        Self {
            store,
            capacity,
            next: 0,
        }
    }

    /// Reserviert `len` Bytes direkt hinter dem letzten Slot
    pub fn register(&mut self, len: u8) -> Result<SlotId, StorageError> {
        let end = self
            .next
            .checked_add(u16::from(len))
            .filter(|&end| end <= self.capacity)
            .ok_or(StorageError::Full)?;
        let slot = SlotId {
            offset: self.next,
            len,
        };
        self.next = end;
        Ok(slot)
    }

    /// Belegte Bytes
    pub fn used(&self) -> u16 {
        self.next
    }

    fn check(&self, slot: SlotId, len: usize) -> Result<(), StorageError> {
        if slot.offset + u16::from(slot.len) > self.next {
            return Err(StorageError::UnknownSlot);
        }
        if usize::from(slot.len) != len {
            return Err(StorageError::SizeMismatch);
        }
        Ok(())
    }

    pub fn load_u8(&mut self, slot: SlotId) -> Result<u8, StorageError> {
        self.check(slot, 1)?;
        let mut buf = [0u8; 1];
        self.store.read(slot.offset, &mut buf)?;
        Ok(buf[0])
    }

    /// Jeder Wert ungleich 0 gilt als `true`
    pub fn load_bool(&mut self, slot: SlotId) -> Result<bool, StorageError> {
        self.load_u8(slot).map(|value| value != 0)
    }

    /// Big-Endian, 4 Bytes
    pub fn load_u32(&mut self, slot: SlotId) -> Result<u32, StorageError> {
        self.check(slot, 4)?;
        let mut buf = [0u8; 4];
        self.store.read(slot.offset, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn save_u8(&mut self, slot: SlotId, value: u8) -> Result<(), StorageError> {
        self.check(slot, 1)?;
        self.store.write(slot.offset, &[value])
    }

    pub fn save_bool(&mut self, slot: SlotId, value: bool) -> Result<(), StorageError> {
        self.save_u8(slot, u8::from(value))
    }

    pub fn save_u32(&mut self, slot: SlotId, value: u32) -> Result<(), StorageError> {
        self.check(slot, 4)?;
        self.store.write(slot.offset, &value.to_be_bytes())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RamStore([u8; 16]);

    impl ByteStore for RamStore {
        fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
            let start = addr as usize;
            buf.copy_from_slice(&self.0[start..start + buf.len()]);
            Ok(())
        }

        fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
            let start = addr as usize;
            self.0[start..start + data.len()].copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn test_slots_are_consecutive() {
        let mut storage = DataStorage::new(RamStore([0; 16]), 16);
        let a = storage.register(4).unwrap();
        let b = storage.register(1).unwrap();
        assert_eq!((a.offset(), a.len()), (0, 4));
        assert_eq!((b.offset(), b.len()), (4, 1));
        assert_eq!(storage.used(), 5);
    }

    #[test]
    fn test_register_beyond_capacity() {
        let mut storage = DataStorage::new(RamStore([0; 16]), 6);
        storage.register(4).unwrap();
        assert_eq!(storage.register(4), Err(StorageError::Full));
        assert!(storage.register(2).is_ok());
    }

    #[test]
    fn test_u32_big_endian() {
        let mut storage = DataStorage::new(RamStore([0; 16]), 16);
        let slot = storage.register(4).unwrap();
        storage.save_u32(slot, 0x0102_0304).unwrap();
        assert_eq!(&storage.store().0[..4], &[1, 2, 3, 4]);
        assert_eq!(storage.load_u32(slot), Ok(0x0102_0304));
    }

    #[test]
    fn test_unknown_slot_and_size_mismatch() {
        let mut other = DataStorage::new(RamStore([0; 16]), 16);
        other.register(8).unwrap();
        let foreign = other.register(1).unwrap();

        let mut storage = DataStorage::new(RamStore([0; 16]), 16);
        let slot = storage.register(4).unwrap();
        assert_eq!(storage.load_u8(foreign), Err(StorageError::UnknownSlot));
        assert_eq!(storage.save_u8(slot, 1), Err(StorageError::SizeMismatch));
    }
}

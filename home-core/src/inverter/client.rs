// Wechselrichter-Client über eine beliebige serielle Verbindung

use super::InverterError;
use super::command::{Command, EnergyPeriod, HELLO_SEQUENCE, OutputPriority};
use super::response::{GeneralStatus, is_ack, parse_energy, parse_frame, parse_output_priority};
use crate::calendar::DateTime;
use crate::traits::InverterLink;

/// Empfangspuffer, QPIGS liefert ca. 110 Bytes
pub const RESPONSE_BUFFER_SIZE: usize = 160;

/// Energie-Zähler in Wh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnergyStatistics {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub total: u32,
}

/// Client für einen Wechselrichter
///
/// Vor jeder Abfrage wird die Hello-Sequenz gesendet, ohne sie
/// springen manche Geräte nicht an.
pub struct Inverter<L: InverterLink> {
    link: L,
    buffer: [u8; RESPONSE_BUFFER_SIZE],
}

impl<L: InverterLink> Inverter<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            buffer: [0; RESPONSE_BUFFER_SIZE],
        }
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    /// Sendet QPI, QMN, QID; Antworten und Timeouts werden ignoriert
    pub async fn hello(&mut self) -> Result<(), InverterError> {
        for command in HELLO_SEQUENCE {
            self.link.write_all(&command.encode()).await?;
            if let Err(InverterError::Io) = self.link.read_frame(&mut self.buffer).await {
                return Err(InverterError::Io);
            }
        }
        Ok(())
    }

    /// Sendet einen Befehl und liefert den Datenteil der Antwort
    pub async fn query(&mut self, command: Command) -> Result<&str, InverterError> {
        self.link.write_all(&command.encode()).await?;
        let len = self.link.read_frame(&mut self.buffer).await?;
        parse_frame(&self.buffer[..len])
    }

    /// Rohe QPIGS-Antwort ohne `(`
    pub async fn general_status_raw(&mut self) -> Result<&str, InverterError> {
        self.hello().await?;
        self.query(Command::Qpigs).await
    }

    pub async fn general_status(&mut self) -> Result<GeneralStatus, InverterError> {
        let data = self.general_status_raw().await?;
        GeneralStatus::parse(data)
    }

    pub async fn energy(&mut self, period: EnergyPeriod) -> Result<u32, InverterError> {
        self.hello().await?;
        let data = self.query(period.command()).await?;
        parse_energy(data)
    }

    /// Jahres-, Monats-, Tages- und Gesamtwert für das Datum
    pub async fn statistics(&mut self, date: &DateTime) -> Result<EnergyStatistics, InverterError> {
        self.hello().await?;

        let [year, month, day] = EnergyPeriod::of_date(date);
        let year = parse_energy(self.query(year.command()).await?)?;
        let month = parse_energy(self.query(month.command()).await?)?;
        let day = parse_energy(self.query(day.command()).await?)?;
        let total = parse_energy(self.query(Command::Qet).await?)?;

        Ok(EnergyStatistics {
            year,
            month,
            day,
            total,
        })
    }

    pub async fn output_priority(&mut self) -> Result<OutputPriority, InverterError> {
        self.hello().await?;
        let data = self.query(Command::Qpiri).await?;
        parse_output_priority(data)
    }

    pub async fn set_output_priority(
        &mut self,
        priority: OutputPriority,
    ) -> Result<(), InverterError> {
        self.hello().await?;
        let data = self.query(Command::SetOutputPriority(priority)).await?;
        if is_ack(data) {
            Ok(())
        } else {
            Err(InverterError::Malformed)
        }
    }
}

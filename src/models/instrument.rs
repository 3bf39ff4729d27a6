use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// The fixed set of reservable slots every room exposes. The set is identical
/// for every room and never extended at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Drums,
    Bass,
    Lead,
    Rhythm,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::Drums,
        Instrument::Bass,
        Instrument::Lead,
        Instrument::Rhythm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Drums => "drums",
            Instrument::Bass => "bass",
            Instrument::Lead => "lead",
            Instrument::Rhythm => "rhythm",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an identifier names no known instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownInstrument;

impl FromStr for Instrument {
    type Err = UnknownInstrument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drums" => Ok(Instrument::Drums),
            "bass" => Ok(Instrument::Bass),
            "lead" => Ok(Instrument::Lead),
            "rhythm" => Ok(Instrument::Rhythm),
            _ => Err(UnknownInstrument),
        }
    }
}

/// Reservation state of one slot. The holder is the connection that claimed
/// the reservation; a reservation made over plain HTTP starts with no holder
/// until a connection claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Reservation {
    #[default]
    Free,
    Reserved { holder: Option<Uuid> },
}

impl Reservation {
    pub fn is_reserved(&self) -> bool {
        matches!(self, Reservation::Reserved { .. })
    }
}

/// Reservation state of every slot in a room. One field per instrument, so
/// the map can never gain or lose a slot no matter how many reserve/release
/// cycles have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstrumentMap {
    drums: Reservation,
    bass: Reservation,
    lead: Reservation,
    rhythm: Reservation,
}

impl InstrumentMap {
    pub fn slot(&self, instrument: Instrument) -> &Reservation {
        match instrument {
            Instrument::Drums => &self.drums,
            Instrument::Bass => &self.bass,
            Instrument::Lead => &self.lead,
            Instrument::Rhythm => &self.rhythm,
        }
    }

    pub fn slot_mut(&mut self, instrument: Instrument) -> &mut Reservation {
        match instrument {
            Instrument::Drums => &mut self.drums,
            Instrument::Bass => &mut self.bass,
            Instrument::Lead => &mut self.lead,
            Instrument::Rhythm => &mut self.rhythm,
        }
    }

    /// The boolean view sent over the wire: `true` means reserved.
    pub fn states(&self) -> InstrumentStates {
        InstrumentStates {
            drums: self.drums.is_reserved(),
            bass: self.bass.is_reserved(),
            lead: self.lead.is_reserved(),
            rhythm: self.rhythm.is_reserved(),
        }
    }

    /// The instrument currently held by `connection`, if any. A connection
    /// holds at most one instrument.
    pub fn held_by(&self, connection: Uuid) -> Option<Instrument> {
        Instrument::ALL.into_iter().find(|instrument| {
            matches!(
                self.slot(*instrument),
                Reservation::Reserved { holder: Some(holder) } if *holder == connection
            )
        })
    }

    /// Drop `connection` as holder of whatever slot it holds. The slot stays
    /// reserved, it just no longer belongs to anyone.
    pub fn detach(&mut self, connection: Uuid) -> Option<Instrument> {
        let instrument = self.held_by(connection)?;
        if let Reservation::Reserved { holder } = self.slot_mut(instrument) {
            *holder = None;
        }
        Some(instrument)
    }
}

/// Wire representation of a room's instrument map, e.g.
/// `{"drums": false, "bass": false, "lead": false, "rhythm": false}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InstrumentStates {
    pub drums: bool,
    pub bass: bool,
    pub lead: bool,
    pub rhythm: bool,
}
